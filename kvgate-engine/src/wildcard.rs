//! Wildcard expansion: one concrete request per value key.

use crate::error::EngineError;
use crate::names::normalize_output_key;
use crate::payload::{data_prefix, secret_data};
use kvgate_policy::is_reserved_key;
use kvgate_selector::{field_ref, select_data};
use kvgate_types::{SecretRequest, SecretResult, SecretValue, Selector, WildcardCase};
use serde_json::Value;

/// Expand a wildcard request over its payload.
///
/// Keys are visited in payload order; authorization attributes are skipped.
/// Every result carries the `cached_response` flag of the originating fetch.
pub(crate) fn expand(
    request: &SecretRequest,
    case: WildcardCase,
    payload: &Value,
    cached_response: bool,
) -> Result<Vec<SecretResult>, EngineError> {
    let Some(data) = secret_data(payload).as_object() else {
        tracing::warn!(path = %request.path, "wildcard payload has no data object");
        return Ok(Vec::new());
    };
    let prefix = data_prefix(payload);

    let mut results = Vec::with_capacity(data.len());
    for key in data.keys().filter(|key| !is_reserved_key(key)) {
        let selector = format!("{prefix}{}", field_ref(key));
        let value = select_data(payload, &selector).map_err(|source| EngineError::Selector {
            path: request.path.clone(),
            source,
        })?;
        let derived = derive_request(request, key, case);
        tracing::debug!(
            path = %request.path,
            output = %derived.output_var_name,
            env = %derived.env_var_name,
            "expanded wildcard key"
        );
        results.push(SecretResult::new(derived, SecretValue::new(value), cached_response));
    }
    Ok(results)
}

/// The concrete request a wildcard produces for `key`.
pub fn derive_request(request: &SecretRequest, key: &str, case: WildcardCase) -> SecretRequest {
    let (output, env) = if request.use_key_as_name {
        (key.to_owned(), key.to_owned())
    } else {
        (
            format!("{}{key}", request.output_var_name),
            format!("{}{key}", request.env_var_name),
        )
    };

    let mut derived = request.clone();
    derived.selector = Selector::Query(key.to_owned());
    derived.output_var_name = normalize_output_key(&output, false);
    derived.env_var_name = normalize_output_key(&env, case == WildcardCase::Upper);
    derived.use_key_as_name = false;
    derived
}
