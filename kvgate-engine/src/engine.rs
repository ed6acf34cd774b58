//! The batch resolution engine.

use crate::error::EngineError;
use crate::payload::{data_prefix, secret_data};
use crate::wildcard;
use kvgate_policy::AuthorizationGate;
use kvgate_selector::{field_ref, select_data};
use kvgate_types::{
    SecretRequest, SecretResult, SecretValue, Selector, Transport, TransportError,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Default prefix joined in front of every request path (the Vault API version).
pub const DEFAULT_PATH_PREFIX: &str = "v1/";

/// Per-invocation engine settings.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Skip requests whose path does not exist instead of failing the batch.
    pub ignore_not_found: bool,
    /// Prefix joined in front of every request path.
    pub path_prefix: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            ignore_not_found: false,
            path_prefix: DEFAULT_PATH_PREFIX.into(),
        }
    }
}

impl EngineOptions {
    /// Default options: fail on not-found, `v1/` prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the not-found policy.
    pub fn ignore_not_found(mut self, ignore: bool) -> Self {
        self.ignore_not_found = ignore;
        self
    }

    /// Set the path prefix.
    pub fn path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = prefix.into();
        self
    }
}

/// Resolves batches of secret requests.
///
/// One engine holds one transport, one caller identity and one set of
/// options; every call to [`SecretEngine::get_secrets`] is independent and
/// starts with an empty response cache.
pub struct SecretEngine {
    transport: Arc<dyn Transport>,
    gate: AuthorizationGate,
    options: EngineOptions,
}

impl SecretEngine {
    /// Create an engine with default options.
    pub fn new(transport: Arc<dyn Transport>, gate: AuthorizationGate) -> Self {
        Self {
            transport,
            gate,
            options: EngineOptions::default(),
        }
    }

    /// Replace the options.
    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// The active options.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// The store path requested for a request path.
    pub fn store_path(&self, path: &str) -> String {
        format!("{}{}", self.options.path_prefix, path.trim_start_matches('/'))
    }

    /// Resolve `requests` in order.
    ///
    /// Each distinct store path is fetched once; later requests for the same
    /// path reuse the body and report `cached_response = true`. A path skipped
    /// as not found is not requested again either. Every payload
    /// passes the authorization gate before anything is extracted from it,
    /// cached or not.
    ///
    /// # Fail-closed authorization
    ///
    /// If the caller is denied access to *any* secret in the batch, the whole
    /// batch resolves to `Ok(vec![])`: no error, and no results, not even for
    /// secrets that would have been allowed on their own. Callers that expect
    /// per-secret filtering should note that a denial anywhere withholds
    /// everything.
    ///
    /// # Errors
    ///
    /// Any transport failure, a not-found path (unless
    /// [`EngineOptions::ignore_not_found`] is set), an unparsable body, or an
    /// unresolvable selector aborts the batch. No partial results are returned.
    pub async fn get_secrets(
        &self,
        requests: &[SecretRequest],
    ) -> Result<Vec<SecretResult>, EngineError> {
        // A skipped not-found path is cached as `None`.
        let mut cache: HashMap<String, Option<String>> = HashMap::new();
        let mut results = Vec::with_capacity(requests.len());

        for request in requests {
            let path = self.store_path(&request.path);
            let cached_response = cache.contains_key(&path);
            if cached_response {
                tracing::debug!(path = %path, "using cached response");
            } else {
                let body = self.fetch(request, &path).await?;
                cache.insert(path.clone(), body);
            }
            let Some(Some(body)) = cache.get(&path) else {
                continue;
            };
            let payload: Value =
                serde_json::from_str(body).map_err(|e| EngineError::InvalidPayload {
                    path: path.clone(),
                    message: e.to_string(),
                })?;

            if !self.gate.is_allowed(secret_data(&payload)) {
                tracing::warn!(
                    path = %request.path,
                    "access denied, withholding every secret in this batch"
                );
                return Ok(Vec::new());
            }

            match &request.selector {
                Selector::Wildcard(case) => {
                    results.extend(wildcard::expand(request, *case, &payload, cached_response)?);
                }
                Selector::Query(query) => {
                    let selector = concrete_selector(query, &payload);
                    let value =
                        select_data(&payload, &selector).map_err(|source| EngineError::Selector {
                            path: request.path.clone(),
                            source,
                        })?;
                    results.push(SecretResult::new(
                        request.clone(),
                        SecretValue::new(value),
                        cached_response,
                    ));
                }
            }
            tracing::info!(
                path = %request.path,
                selector = %request.selector,
                cached = cached_response,
                "resolved secret"
            );
        }

        Ok(results)
    }

    async fn fetch(
        &self,
        request: &SecretRequest,
        path: &str,
    ) -> Result<Option<String>, EngineError> {
        tracing::debug!(path, "fetching secret");
        match self.transport.get(path).await {
            Ok(body) => Ok(Some(body)),
            Err(TransportError::Status { status: 404, body }) => {
                let err = EngineError::SecretNotFound {
                    path: request.path.clone(),
                    body: body.trim().to_owned(),
                };
                if self.options.ignore_not_found {
                    tracing::error!(path = %request.path, "{err}, skipping");
                    Ok(None)
                } else {
                    Err(err)
                }
            }
            Err(source) => Err(EngineError::Transport {
                path: path.to_owned(),
                source,
            }),
        }
    }
}

/// The selector a query request is evaluated with, relative to the
/// payload's innermost data object.
///
/// Dot-free queries are quoted so keys with dashes and other operator
/// characters resolve literally; queries with a `.` are paths and are kept
/// as written.
pub fn query_selector(query: &str) -> String {
    if query.contains('.') {
        query.to_owned()
    } else {
        field_ref(query)
    }
}

/// Anchor a request's query at the payload's innermost data object.
fn concrete_selector(query: &str, payload: &Value) -> String {
    format!("{}{}", data_prefix(payload), query_selector(query))
}
