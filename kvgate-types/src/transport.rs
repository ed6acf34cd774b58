//! The transport boundary: fetch the raw body stored at a path.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from a transport.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TransportError {
    /// The store answered with a non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// The store could not be reached (connect, TLS, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    /// True for an HTTP 404 answer.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TransportError::Status { status: 404, .. })
    }
}

/// Fetch raw payload bodies from a secret store.
///
/// Implementations own connection handling, authentication, timeouts and
/// any retry policy. The engine calls `get` at most once per distinct path
/// in a batch and never concurrently.
#[async_trait]
pub trait Transport: Send + Sync {
    /// `GET path`, returning the response body.
    async fn get(&self, path: &str) -> Result<String, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn not_found_only_for_404() {
        let nf = TransportError::Status {
            status: 404,
            body: "{\"errors\":[]}".into(),
        };
        assert!(nf.is_not_found());
        let forbidden = TransportError::Status {
            status: 403,
            body: "permission denied".into(),
        };
        assert!(!forbidden.is_not_found());
        assert!(!TransportError::Network("refused".into()).is_not_found());
    }

    #[test]
    fn display_includes_status_and_body() {
        let err = TransportError::Status {
            status: 503,
            body: "sealed".into(),
        };
        assert_eq!(err.to_string(), "HTTP 503: sealed");
    }

    fn _assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn transport_is_object_safe_send_sync() {
        _assert_send_sync::<Box<dyn Transport>>();
        _assert_send_sync::<Arc<dyn Transport>>();
    }
}
