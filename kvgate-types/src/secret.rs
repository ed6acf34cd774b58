//! In-memory wrapper for resolved secret material.

use zeroize::Zeroizing;

/// A resolved secret value. Cannot be logged or serialized; memory is zeroed
/// on drop via [`Zeroizing`].
///
/// `Debug` prints `[REDACTED]`. Read the value with [`SecretValue::expose`]
/// at the point where it is handed to its consumer.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretValue {
    inner: Zeroizing<String>,
}

impl SecretValue {
    /// Wrap a value. The string is moved, not copied.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: Zeroizing::new(value.into()),
        }
    }

    /// The secret text.
    pub fn expose(&self) -> &str {
        &self.inner
    }

    /// Scoped exposure as bytes.
    pub fn with_bytes<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        f(self.inner.as_bytes())
    }

    /// Length of the secret in bytes.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

// Intentionally: no Display, no Serialize.
