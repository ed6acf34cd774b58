#![deny(missing_docs)]
//! Vault login for kvgate.
//!
//! This crate defines the [`TokenProvider`] trait for obtaining the Vault
//! token every store request carries, and the two ways kvgate logs in:
//!
//! - [`StaticToken`]: a token handed over directly (`VAULT_TOKEN`).
//! - [`KubernetesLogin`]: exchanges the pod's service account JWT for a
//!   token via Vault's Kubernetes auth method.
//!
//! ## Separation of Concerns
//!
//! Token providers produce credentials. The HTTP transport in `kvgate-vault`
//! consumes them through an `Arc<dyn TokenProvider>` and never knows how the
//! token was obtained.

mod kubernetes;
mod static_token;

pub use kubernetes::{DEFAULT_AUTH_MOUNT, DEFAULT_SERVICE_ACCOUNT_TOKEN_PATH, KubernetesLogin};
pub use static_token::StaticToken;

use async_trait::async_trait;
use kvgate_types::SecretValue;
use std::path::PathBuf;
use std::time::SystemTime;
use thiserror::Error;

/// Errors from token providers.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AuthError {
    /// The store rejected the credentials (bad role, bad JWT, ...).
    #[error("auth failed: {0}")]
    AuthFailed(String),

    /// The service account token file could not be read.
    #[error("failed to read token file {}: {source}", path.display())]
    TokenFile {
        /// The file that was read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Communication with the store failed, or it answered with an
    /// unexpected status.
    #[error("backend error: {0}")]
    Backend(String),

    /// The login response could not be understood.
    #[error("invalid login response: {0}")]
    InvalidResponse(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// An opaque store token with optional expiry.
/// Uses [`SecretValue`] internally for in-memory protection.
pub struct AuthToken {
    inner: SecretValue,
    expires_at: Option<SystemTime>,
}

impl AuthToken {
    /// Create a new token.
    pub fn new(token: impl Into<String>, expires_at: Option<SystemTime>) -> Self {
        Self {
            inner: SecretValue::new(token),
            expires_at,
        }
    }

    /// A token with no known expiry.
    pub fn permanent(token: impl Into<String>) -> Self {
        Self::new(token, None)
    }

    /// The token text, for the request header.
    pub fn expose(&self) -> &str {
        self.inner.expose()
    }

    /// Check if this token has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|exp| SystemTime::now() > exp)
            .unwrap_or(false)
    }

    /// Returns when this token expires, if known.
    pub fn expires_at(&self) -> Option<SystemTime> {
        self.expires_at
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthToken")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Provide the token used to authenticate store requests.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Obtain a token, logging in if the method requires it.
    async fn token(&self) -> Result<AuthToken, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn _assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn token_provider_is_object_safe_send_sync() {
        _assert_send_sync::<Box<dyn TokenProvider>>();
        _assert_send_sync::<Arc<dyn TokenProvider>>();
    }

    #[test]
    fn auth_token_debug_is_redacted() {
        let token = AuthToken::permanent("hvs.secret-token");
        let debug = format!("{token:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hvs.secret-token"));
    }

    #[test]
    fn auth_token_expiry() {
        let token = AuthToken::permanent("t");
        assert!(!token.is_expired());
        assert!(token.expires_at().is_none());

        let past = SystemTime::now() - Duration::from_secs(60);
        assert!(AuthToken::new("t", Some(past)).is_expired());
        let future = SystemTime::now() + Duration::from_secs(3600);
        assert!(!AuthToken::new("t", Some(future)).is_expired());
    }

    #[test]
    fn auth_error_display() {
        assert_eq!(
            AuthError::AuthFailed("permission denied".into()).to_string(),
            "auth failed: permission denied"
        );
        assert_eq!(
            AuthError::Backend("connection refused".into()).to_string(),
            "backend error: connection refused"
        );
        let err = AuthError::TokenFile {
            path: "/var/run/token".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().starts_with("failed to read token file /var/run/token"));
    }
}
