//! Navigating the two payload shapes.
//!
//! KV v2: `{"data": {"data": {...}, "metadata": {...}}}`
//! KV v1: `{"data": {...}}`

use serde_json::Value;

static NULL: Value = Value::Null;

/// True when the payload nests its values under `data.data` (KV v2).
pub(crate) fn has_nested_data(payload: &Value) -> bool {
    payload
        .get("data")
        .and_then(|data| data.get("data"))
        .is_some_and(|inner| !inner.is_null())
}

/// The innermost data object: where value keys and authorization attributes live.
pub(crate) fn secret_data(payload: &Value) -> &Value {
    match payload.get("data") {
        Some(data) if has_nested_data(payload) => &data["data"],
        Some(data) => data,
        None => &NULL,
    }
}

/// Selector prefix that reaches the innermost data object.
pub(crate) fn data_prefix(payload: &Value) -> &'static str {
    if has_nested_data(payload) {
        "data.data."
    } else {
        "data."
    }
}
