#![deny(missing_docs)]
//! Selector expressions for kvgate.
//!
//! A selector names a value inside a secret payload: `password`,
//! `data.data.user`, `` data.data.`tls.crt` ``, `data."my-key"`,
//! `hosts[0].name`. [`select_data`] evaluates one against a payload and
//! returns the value as the string a pipeline variable receives.
//!
//! ## Fallback
//!
//! KV v2 stores nest values one level deeper than KV v1. When a selector
//! that is a single field (or a lone quoted name) matches nothing, is not
//! literally `data`, and the payload has a top-level `data` field, it is
//! retried as `data.<selector>`. The trigger is deliberately narrow;
//! existing selector configurations rely on exactly this rule.

mod error;
mod eval;
mod parse;

pub use error::SelectorError;
pub use parse::{Expr, Step, StepKind};

use serde_json::Value;

/// Evaluate `selector` against `payload`.
///
/// String results are returned raw. Any other value (object, array, number,
/// boolean, null) is returned as compact JSON.
pub fn select_data(payload: &Value, selector: &str) -> Result<String, SelectorError> {
    let expr = parse(selector)?;
    let mut result = expr.evaluate(payload);

    if result.is_none() && expr.is_simple() && selector != "data" && payload.get("data").is_some()
    {
        let prefixed = format!("data.{selector}");
        tracing::debug!(selector, retry = %prefixed, "selector matched nothing, retrying under data");
        result = parse(&prefixed)?.evaluate(payload);
    }

    match result {
        Some(Value::String(raw)) => Ok(raw),
        Some(other) => Ok(other.to_string()),
        None => Err(SelectorError::NotFound {
            selector: selector.to_owned(),
        }),
    }
}

/// Build a selector step that refers to `key` literally.
///
/// Keys containing `.` are wrapped in backticks; every other key becomes a
/// double-quoted name, escaped as needed.
pub fn field_ref(key: &str) -> String {
    if key.contains('.') && !key.contains('`') {
        format!("`{key}`")
    } else {
        Value::String(key.to_owned()).to_string()
    }
}

fn parse(selector: &str) -> Result<Expr, SelectorError> {
    Expr::parse(selector).map_err(|message| SelectorError::Parse {
        selector: selector.to_owned(),
        message,
    })
}
