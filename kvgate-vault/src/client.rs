//! Vault API client struct and builder.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use kvgate_auth::{AuthToken, TokenProvider};
use kvgate_types::{Transport, TransportError};
use tokio::sync::OnceCell;

use crate::error::{map_auth_error, map_http_status, map_reqwest_error};

/// Per-request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const TOKEN_HEADER: &str = "X-Vault-Token";
const NAMESPACE_HEADER: &str = "X-Vault-Namespace";

/// Client for the Vault HTTP API.
///
/// The token is requested from the [`TokenProvider`] on the first call and
/// reused for the client's lifetime.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use kvgate_auth::StaticToken;
/// use kvgate_vault::VaultClient;
///
/// let client = VaultClient::new("https://vault.internal:8200", Arc::new(StaticToken::new("hvs.x")))
///     .namespace("team-a")
///     .timeout(Duration::from_secs(10));
/// ```
pub struct VaultClient {
    addr: String,
    auth: Arc<dyn TokenProvider>,
    namespace: Option<String>,
    headers: Vec<(String, String)>,
    timeout: Duration,
    token: OnceCell<AuthToken>,
    client: reqwest::Client,
}

impl VaultClient {
    /// Create a client for the store at `addr`.
    #[must_use]
    pub fn new(addr: impl Into<String>, auth: Arc<dyn TokenProvider>) -> Self {
        Self {
            addr: addr.into(),
            auth,
            namespace: None,
            headers: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            token: OnceCell::new(),
            client: reqwest::Client::new(),
        }
    }

    /// Send every request to a Vault Enterprise namespace.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Add a header to every request.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Override the per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a preconfigured HTTP client.
    #[must_use]
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.addr.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn token(&self) -> Result<&AuthToken, TransportError> {
        self.token
            .get_or_try_init(|| async {
                tracing::debug!("requesting vault token");
                self.auth.token().await
            })
            .await
            .map_err(map_auth_error)
    }
}

impl std::fmt::Debug for VaultClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultClient")
            .field("addr", &self.addr)
            .field("namespace", &self.namespace)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for VaultClient {
    async fn get(&self, path: &str) -> Result<String, TransportError> {
        let token = self.token().await?;
        let url = self.url(path);
        tracing::debug!(url = %url, "reading from vault");

        let mut request = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .header(TOKEN_HEADER, token.expose());
        if let Some(namespace) = &self.namespace {
            request = request.header(NAMESPACE_HEADER, namespace);
        }
        for (name, value) in &self.headers {
            request = request.header(name, value);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;
        tracing::debug!(url = %url, status = status.as_u16(), "vault responded");

        if !status.is_success() {
            return Err(map_http_status(status, body));
        }
        Ok(body)
    }
}
