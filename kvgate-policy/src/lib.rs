#![deny(missing_docs)]
//! Authorization gate for kvgate.
//!
//! Secrets describe who may read them. Alongside the value keys, a payload
//! carries reserved attribute keys (`x-k8s-*`, `x-github-*`) whose values are
//! glob patterns. The caller supplies only *who it is* as an
//! [`IdentityContext`]; the [`AuthorizationGate`] matches each identity
//! attribute against the payload's pattern.
//!
//! The checklist is fixed and runs in order, stopping at the first failure:
//!
//! | Payload key | Identity attribute |
//! |-------------|--------------------|
//! | `x-k8s-podname` | pod name |
//! | `x-k8s-podnamespace` | pod namespace |
//! | `x-k8s-serviceaccount` | pod service account |
//! | `x-github-actor` | actor |
//! | `x-github-repository` | repository |
//!
//! A payload that omits any of these keys is denied.

use glob::Pattern;
use kvgate_types::IdentityContext;
use serde_json::Value;

/// Key prefixes reserved for authorization attributes. Keys with these
/// prefixes are never emitted as secret values.
pub const RESERVED_PREFIXES: [&str; 2] = ["x-k8s-", "x-github-"];

/// Returns true if `key` is an authorization attribute rather than a value.
pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_PREFIXES.iter().any(|prefix| key.starts_with(prefix))
}

/// One entry of the authorization checklist.
#[derive(Clone, Copy)]
pub struct Attribute {
    /// Payload key holding the glob pattern.
    pub key: &'static str,
    subject: fn(&IdentityContext) -> Option<&str>,
}

impl Attribute {
    /// The caller's value for this attribute, if set.
    pub fn subject<'a>(&self, context: &'a IdentityContext) -> Option<&'a str> {
        (self.subject)(context)
    }
}

impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attribute").field("key", &self.key).finish()
    }
}

fn pod_name(c: &IdentityContext) -> Option<&str> {
    c.pod_name.as_deref()
}

fn pod_namespace(c: &IdentityContext) -> Option<&str> {
    c.pod_namespace.as_deref()
}

fn pod_service_account(c: &IdentityContext) -> Option<&str> {
    c.pod_service_account.as_deref()
}

fn actor(c: &IdentityContext) -> Option<&str> {
    c.actor.as_deref()
}

fn repository(c: &IdentityContext) -> Option<&str> {
    c.repository.as_deref()
}

/// The checklist, in evaluation order. New attributes are appended here.
pub const ATTRIBUTES: [Attribute; 5] = [
    Attribute {
        key: "x-k8s-podname",
        subject: pod_name,
    },
    Attribute {
        key: "x-k8s-podnamespace",
        subject: pod_namespace,
    },
    Attribute {
        key: "x-k8s-serviceaccount",
        subject: pod_service_account,
    },
    Attribute {
        key: "x-github-actor",
        subject: actor,
    },
    Attribute {
        key: "x-github-repository",
        subject: repository,
    },
];

/// Why a check failed.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// The payload does not carry the attribute key.
    Missing,
    /// The attribute value is not a JSON string.
    NotAString,
    /// The attribute value is not a valid glob pattern.
    InvalidPattern(String),
    /// The caller's identity does not set this attribute.
    SubjectUnset,
    /// The caller's value does not match the pattern.
    Mismatch,
}

/// Outcome of running the checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Every check passed.
    Allow,
    /// A check failed; later checks did not run.
    Deny {
        /// Payload key of the failing check.
        attribute: &'static str,
        /// Why it failed.
        reason: DenyReason,
    },
}

impl Decision {
    /// True for [`Decision::Allow`].
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Matches secret payloads against a fixed caller identity.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationGate {
    context: IdentityContext,
}

impl AuthorizationGate {
    /// Create a gate for the given caller.
    pub fn new(context: IdentityContext) -> Self {
        Self { context }
    }

    /// The caller identity this gate checks against.
    pub fn context(&self) -> &IdentityContext {
        &self.context
    }

    /// Returns true if the caller may read the secret whose data object is `data`.
    pub fn is_allowed(&self, data: &Value) -> bool {
        self.evaluate(data).is_allow()
    }

    /// Run the checklist against the secret's data object.
    pub fn evaluate(&self, data: &Value) -> Decision {
        for attribute in &ATTRIBUTES {
            let outcome = check(attribute, data, &self.context);
            let pattern = data
                .get(attribute.key)
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default();
            let subject = attribute.subject(&self.context).unwrap_or_default();
            tracing::debug!(
                attribute = attribute.key,
                pattern,
                subject,
                allowed = outcome.is_ok(),
                "authorization check"
            );
            if let Err(reason) = outcome {
                return Decision::Deny {
                    attribute: attribute.key,
                    reason,
                };
            }
        }
        Decision::Allow
    }
}

fn check(attribute: &Attribute, data: &Value, context: &IdentityContext) -> Result<(), DenyReason> {
    let raw = data.get(attribute.key).ok_or(DenyReason::Missing)?;
    let pattern = raw.as_str().ok_or(DenyReason::NotAString)?;
    let pattern = Pattern::new(pattern).map_err(|e| DenyReason::InvalidPattern(e.msg.to_string()))?;
    let subject = attribute.subject(context).ok_or(DenyReason::SubjectUnset)?;
    if pattern.matches(subject) {
        Ok(())
    } else {
        Err(DenyReason::Mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> IdentityContext {
        IdentityContext::new()
            .with_pod_name("pod-123")
            .with_pod_namespace("ci")
            .with_pod_service_account("runner")
            .with_actor("octocat")
            .with_repository("acme/api")
    }

    fn payload() -> Value {
        json!({
            "x-k8s-podname": "pod-*",
            "x-k8s-podnamespace": "ci",
            "x-k8s-serviceaccount": "runner",
            "x-github-actor": "*",
            "x-github-repository": "acme/*",
            "password": "hunter2"
        })
    }

    #[test]
    fn allows_when_all_attributes_match() {
        let gate = AuthorizationGate::new(context());
        assert_eq!(gate.evaluate(&payload()), Decision::Allow);
        assert!(gate.is_allowed(&payload()));
    }

    #[test]
    fn pod_glob_allows_and_rejects() {
        let allowed = AuthorizationGate::new(context());
        assert!(allowed.is_allowed(&payload()));

        let other = AuthorizationGate::new(context().with_pod_name("other-123"));
        assert_eq!(
            other.evaluate(&payload()),
            Decision::Deny {
                attribute: "x-k8s-podname",
                reason: DenyReason::Mismatch
            }
        );
    }

    #[test]
    fn missing_attribute_denies() {
        let mut data = payload();
        data.as_object_mut().unwrap().remove("x-github-actor");
        let gate = AuthorizationGate::new(context());
        assert_eq!(
            gate.evaluate(&data),
            Decision::Deny {
                attribute: "x-github-actor",
                reason: DenyReason::Missing
            }
        );
    }

    #[test]
    fn first_failure_short_circuits_in_fixed_order() {
        // Both namespace and repository fail; namespace is checked first.
        let gate = AuthorizationGate::new(
            context()
                .with_pod_namespace("prod")
                .with_repository("evil/api"),
        );
        match gate.evaluate(&payload()) {
            Decision::Deny { attribute, .. } => assert_eq!(attribute, "x-k8s-podnamespace"),
            Decision::Allow => panic!("expected deny"),
        }
    }

    #[test]
    fn unset_subject_denies_even_for_star() {
        let mut ctx = context();
        ctx.actor = None;
        let gate = AuthorizationGate::new(ctx);
        assert_eq!(
            gate.evaluate(&payload()),
            Decision::Deny {
                attribute: "x-github-actor",
                reason: DenyReason::SubjectUnset
            }
        );
    }

    #[test]
    fn non_string_attribute_denies() {
        let mut data = payload();
        data["x-k8s-serviceaccount"] = json!(["runner"]);
        let gate = AuthorizationGate::new(context());
        assert_eq!(
            gate.evaluate(&data),
            Decision::Deny {
                attribute: "x-k8s-serviceaccount",
                reason: DenyReason::NotAString
            }
        );
    }

    #[test]
    fn invalid_pattern_denies() {
        let mut data = payload();
        data["x-k8s-podname"] = json!("pod-[");
        let gate = AuthorizationGate::new(context());
        assert!(matches!(
            gate.evaluate(&data),
            Decision::Deny {
                attribute: "x-k8s-podname",
                reason: DenyReason::InvalidPattern(_)
            }
        ));
    }

    #[test]
    fn glob_classes_and_single_char() {
        let mut data = payload();
        data["x-k8s-podname"] = json!("pod-1?[0-9]");
        let gate = AuthorizationGate::new(context());
        assert!(gate.is_allowed(&data));

        let gate = AuthorizationGate::new(context().with_pod_name("pod-12x"));
        assert!(!gate.is_allowed(&data));
    }

    #[test]
    fn star_spans_repository_separator() {
        let mut data = payload();
        data["x-github-repository"] = json!("*");
        let gate = AuthorizationGate::new(context());
        assert!(gate.is_allowed(&data));
    }

    #[test]
    fn non_object_payload_denies() {
        let gate = AuthorizationGate::new(context());
        assert!(!gate.is_allowed(&json!("just a string")));
        assert!(!gate.is_allowed(&json!({})));
    }

    #[test]
    fn reserved_keys() {
        assert!(is_reserved_key("x-k8s-podname"));
        assert!(is_reserved_key("x-github-anything"));
        assert!(!is_reserved_key("x-other"));
        assert!(!is_reserved_key("password"));
        assert!(!is_reserved_key("X-K8S-podname"));
    }

    #[test]
    fn checklist_order_is_fixed() {
        let keys: Vec<_> = ATTRIBUTES.iter().map(|a| a.key).collect();
        assert_eq!(
            keys,
            [
                "x-k8s-podname",
                "x-k8s-podnamespace",
                "x-k8s-serviceaccount",
                "x-github-actor",
                "x-github-repository"
            ]
        );
        assert!(ATTRIBUTES.iter().all(|a| is_reserved_key(a.key)));
    }
}
