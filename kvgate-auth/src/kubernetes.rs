//! Vault Kubernetes auth method.

use crate::{AuthError, AuthToken, TokenProvider};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

/// Where Kubernetes mounts the pod's service account token.
pub const DEFAULT_SERVICE_ACCOUNT_TOKEN_PATH: &str =
    "/var/run/secrets/kubernetes.io/serviceaccount/token";

/// Mount path of the Kubernetes auth method when none is configured.
pub const DEFAULT_AUTH_MOUNT: &str = "kubernetes";

/// Logs in with the pod's service account JWT.
///
/// Each call to [`TokenProvider::token`] reads the token file and performs a
/// fresh login: `POST {addr}/v1/auth/{mount}/login` with `{"role", "jwt"}`.
/// Callers that make several requests should hold on to the returned token.
///
/// ```no_run
/// use kvgate_auth::KubernetesLogin;
///
/// let login = KubernetesLogin::new("https://vault.internal:8200", "ci-runner")
///     .mount("k8s-prod")
///     .namespace("team-a");
/// ```
#[derive(Debug)]
pub struct KubernetesLogin {
    addr: String,
    role: String,
    mount: String,
    token_path: PathBuf,
    namespace: Option<String>,
    timeout: Option<Duration>,
    client: reqwest::Client,
}

impl KubernetesLogin {
    /// Log in to the store at `addr` as `role`.
    #[must_use]
    pub fn new(addr: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            role: role.into(),
            mount: DEFAULT_AUTH_MOUNT.into(),
            token_path: DEFAULT_SERVICE_ACCOUNT_TOKEN_PATH.into(),
            namespace: None,
            timeout: None,
            client: reqwest::Client::new(),
        }
    }

    /// Override the auth method mount path.
    #[must_use]
    pub fn mount(mut self, mount: impl Into<String>) -> Self {
        self.mount = mount.into();
        self
    }

    /// Override the service account token file.
    #[must_use]
    pub fn token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = path.into();
        self
    }

    /// Send the login to a Vault Enterprise namespace.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Bound the login request.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a preconfigured HTTP client (proxies, roots).
    #[must_use]
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub(crate) fn login_url(&self) -> String {
        format!(
            "{}/v1/auth/{}/login",
            self.addr.trim_end_matches('/'),
            self.mount.trim_matches('/')
        )
    }

    async fn read_jwt(&self) -> Result<String, AuthError> {
        let jwt = tokio::fs::read_to_string(&self.token_path)
            .await
            .map_err(|source| AuthError::TokenFile {
                path: self.token_path.clone(),
                source,
            })?;
        let jwt = jwt.trim();
        if jwt.is_empty() {
            return Err(AuthError::AuthFailed(format!(
                "service account token file {} is empty",
                self.token_path.display()
            )));
        }
        Ok(jwt.to_owned())
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    auth: Option<LoginAuth>,
}

#[derive(Deserialize)]
struct LoginAuth {
    client_token: String,
    #[serde(default)]
    lease_duration: u64,
}

#[async_trait]
impl TokenProvider for KubernetesLogin {
    async fn token(&self) -> Result<AuthToken, AuthError> {
        let jwt = self.read_jwt().await?;
        let url = self.login_url();
        tracing::debug!(url = %url, role = %self.role, "logging in with kubernetes service account");

        let mut request = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "role": self.role, "jwt": jwt }));
        if let Some(namespace) = &self.namespace {
            request = request.header("X-Vault-Namespace", namespace);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        let response = request
            .send()
            .await
            .map_err(|e| AuthError::Backend(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Backend(e.to_string()))?;
        match status.as_u16() {
            200..=299 => {}
            400 | 401 | 403 => return Err(AuthError::AuthFailed(body.trim().to_owned())),
            _ => return Err(AuthError::Backend(format!("HTTP {status}: {}", body.trim()))),
        }

        let parsed: LoginResponse = serde_json::from_str(&body)
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        let auth = parsed
            .auth
            .ok_or_else(|| AuthError::InvalidResponse("missing auth block".into()))?;
        if auth.client_token.is_empty() {
            return Err(AuthError::InvalidResponse("empty client_token".into()));
        }

        let expires_at = (auth.lease_duration > 0)
            .then(|| SystemTime::now() + Duration::from_secs(auth.lease_duration));
        tracing::debug!(lease_secs = auth.lease_duration, "kubernetes login succeeded");
        Ok(AuthToken::new(auth.client_token, expires_at))
    }
}
