//! Identity attributes of the caller.

/// Environment variable holding the pod name.
pub const POD_NAME_VAR: &str = "POD_NAME";
/// Environment variable holding the pod namespace.
pub const POD_NAMESPACE_VAR: &str = "POD_NAMESPACE";
/// Environment variable holding the pod service account.
pub const POD_SERVICE_ACCOUNT_VAR: &str = "POD_SERVICE_ACCOUNT";
/// Environment variable holding the CI actor.
pub const ACTOR_VAR: &str = "GITHUB_ACTOR";
/// Environment variable holding the CI repository (`owner/name`).
pub const REPOSITORY_VAR: &str = "GITHUB_REPOSITORY";

/// Who is asking for secrets. A read-only snapshot taken once per run.
///
/// Every attribute is optional. An unset attribute never satisfies an
/// authorization check, so secrets that constrain it stay locked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityContext {
    /// Kubernetes pod name.
    pub pod_name: Option<String>,
    /// Kubernetes pod namespace.
    pub pod_namespace: Option<String>,
    /// Kubernetes service account the pod runs as.
    pub pod_service_account: Option<String>,
    /// CI actor (the user that triggered the run).
    pub actor: Option<String>,
    /// CI repository, `owner/name`.
    pub repository: Option<String>,
}

impl IdentityContext {
    /// An empty context; every check against it fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the five attributes from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the five attributes through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        Self {
            pod_name: get(POD_NAME_VAR),
            pod_namespace: get(POD_NAMESPACE_VAR),
            pod_service_account: get(POD_SERVICE_ACCOUNT_VAR),
            actor: get(ACTOR_VAR),
            repository: get(REPOSITORY_VAR),
        }
    }

    /// Set the pod name.
    pub fn with_pod_name(mut self, value: impl Into<String>) -> Self {
        self.pod_name = Some(value.into());
        self
    }

    /// Set the pod namespace.
    pub fn with_pod_namespace(mut self, value: impl Into<String>) -> Self {
        self.pod_namespace = Some(value.into());
        self
    }

    /// Set the pod service account.
    pub fn with_pod_service_account(mut self, value: impl Into<String>) -> Self {
        self.pod_service_account = Some(value.into());
        self
    }

    /// Set the actor.
    pub fn with_actor(mut self, value: impl Into<String>) -> Self {
        self.actor = Some(value.into());
        self
    }

    /// Set the repository.
    pub fn with_repository(mut self, value: impl Into<String>) -> Self {
        self.repository = Some(value.into());
        self
    }
}
