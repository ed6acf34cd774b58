//! Engine errors.

use kvgate_selector::SelectorError;
use kvgate_types::TransportError;
use thiserror::Error;

/// Errors that abort a batch. No partial results accompany them.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EngineError {
    /// The store has nothing at the requested path (HTTP 404).
    #[error("unable to retrieve result for \"{path}\" because it was not found: {body}")]
    SecretNotFound {
        /// The request path, as configured.
        path: String,
        /// The store's response body, trimmed.
        body: String,
    },

    /// Any other transport failure.
    #[error("failed to fetch {path}: {source}")]
    Transport {
        /// The store path that was requested.
        path: String,
        /// The underlying error.
        source: TransportError,
    },

    /// The body at a path is not JSON.
    #[error("invalid payload at {path}: {message}")]
    InvalidPayload {
        /// The store path that was requested.
        path: String,
        /// Parser message.
        message: String,
    },

    /// A selector could not be resolved against its payload.
    #[error("{path}: {source}")]
    Selector {
        /// The request path, as configured.
        path: String,
        /// The underlying error.
        source: SelectorError,
    },
}
