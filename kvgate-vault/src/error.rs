//! Internal error helpers for mapping HTTP/reqwest errors to [`TransportError`].

use kvgate_auth::AuthError;
use kvgate_types::TransportError;

/// Map a non-success response to a [`TransportError`]. The body is kept
/// verbatim; Vault explains itself there (`{"errors":[...]}`).
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: String) -> TransportError {
    TransportError::Status {
        status: status.as_u16(),
        body,
    }
}

/// Map a [`reqwest::Error`] to a [`TransportError`].
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Network(format!("request timed out: {err}"))
    } else {
        TransportError::Network(err.to_string())
    }
}

/// Login failures surface through the transport's catch-all.
pub(crate) fn map_auth_error(err: AuthError) -> TransportError {
    TransportError::Other(Box::new(err))
}
