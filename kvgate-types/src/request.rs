//! Secret requests and selectors.

use serde::{Deserialize, Serialize};

/// Selector text that expands to every value key, keeping key case in env names.
pub const WILDCARD: &str = "*";

/// Selector text that expands to every value key, upper-casing env names.
pub const WILDCARD_UPPERCASE: &str = "**";

/// How a wildcard expansion shapes derived environment variable names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WildcardCase {
    /// Env names are normalized but keep the key's case (`*`).
    Preserve,
    /// Env names are normalized and upper-cased (`**`).
    Upper,
}

/// What to extract from a secret payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Selector {
    /// A selector expression, e.g. `password`, `data.user`, `"my-key"`.
    Query(String),
    /// Expand to one result per value key in the payload.
    Wildcard(WildcardCase),
}

impl Selector {
    /// Interpret selector text. The wildcard markers are matched exactly.
    pub fn parse(text: &str) -> Self {
        match text {
            WILDCARD => Selector::Wildcard(WildcardCase::Preserve),
            WILDCARD_UPPERCASE => Selector::Wildcard(WildcardCase::Upper),
            other => Selector::Query(other.to_owned()),
        }
    }

    /// The selector as it would be written in the secrets input.
    pub fn as_str(&self) -> &str {
        match self {
            Selector::Query(expr) => expr,
            Selector::Wildcard(WildcardCase::Preserve) => WILDCARD,
            Selector::Wildcard(WildcardCase::Upper) => WILDCARD_UPPERCASE,
        }
    }

    /// Returns true for either wildcard marker.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Selector::Wildcard(_))
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request for one value (or, with a wildcard, every value) stored at a path.
///
/// Requests are never mutated by the engine. Wildcard expansion derives new
/// requests, one per key, and reports those in the results instead.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRequest {
    /// Store-relative path, e.g. `secret/data/ci`.
    pub path: String,
    /// What to extract from the payload at `path`.
    pub selector: Selector,
    /// Output name, or the prefix for derived names under a wildcard.
    pub output_var_name: String,
    /// Environment variable name, or the prefix under a wildcard.
    pub env_var_name: String,
    /// Under a wildcard, name each derived result after its key alone
    /// instead of prefixing it with `output_var_name`/`env_var_name`.
    #[serde(default)]
    pub use_key_as_name: bool,
}

impl SecretRequest {
    /// Create a request with explicit output and env names.
    pub fn new(
        path: impl Into<String>,
        selector: Selector,
        output_var_name: impl Into<String>,
        env_var_name: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            selector,
            output_var_name: output_var_name.into(),
            env_var_name: env_var_name.into(),
            use_key_as_name: false,
        }
    }

    /// Create a wildcard request whose derived names are the keys themselves.
    pub fn wildcard(path: impl Into<String>, case: WildcardCase) -> Self {
        Self {
            path: path.into(),
            selector: Selector::Wildcard(case),
            output_var_name: String::new(),
            env_var_name: String::new(),
            use_key_as_name: true,
        }
    }

    /// Set whether wildcard-derived names use the key alone.
    pub fn with_key_as_name(mut self, use_key_as_name: bool) -> Self {
        self.use_key_as_name = use_key_as_name;
        self
    }
}
