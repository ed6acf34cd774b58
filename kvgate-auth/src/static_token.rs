use crate::{AuthError, AuthToken, TokenProvider};
use async_trait::async_trait;
use kvgate_types::SecretValue;

/// Hands out a token supplied up front.
pub struct StaticToken {
    token: SecretValue,
}

impl StaticToken {
    /// Create with a fixed token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretValue::new(token),
        }
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticToken").field("token", &self.token).finish()
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn token(&self) -> Result<AuthToken, AuthError> {
        if self.token.is_empty() {
            return Err(AuthError::AuthFailed("no token configured".into()));
        }
        Ok(AuthToken::permanent(self.token.expose()))
    }
}
