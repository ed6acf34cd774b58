//! Resolved secret results.

use crate::request::SecretRequest;
use crate::secret::SecretValue;

/// One resolved value.
///
/// `request` is the concrete request this value answers: for wildcard
/// expansions it is the derived per-key request, not the original.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretResult {
    /// The concrete request.
    pub request: SecretRequest,
    /// The extracted value. Strings are raw; anything else is compact JSON.
    pub value: SecretValue,
    /// The payload came from the per-batch response cache, not a transport call.
    pub cached_response: bool,
}

impl SecretResult {
    /// Create a result.
    pub fn new(request: SecretRequest, value: SecretValue, cached_response: bool) -> Self {
        Self {
            request,
            value,
            cached_response,
        }
    }
}
