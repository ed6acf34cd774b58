#![deny(missing_docs)]
//! # kvgate: CI secrets from Vault, gated by the secrets themselves
//!
//! Every secret in the store carries glob patterns for the pod and CI
//! identity allowed to read it. kvgate reads a list of requests, logs in,
//! fetches and checks each secret, and hands back the selected values.
//!
//! | Step | Crate |
//! |------|-------|
//! | Parse the secrets input | [`parse_secrets_input`] |
//! | Log in | `kvgate-auth` |
//! | Fetch | `kvgate-vault` |
//! | Authorize, select, expand wildcards | `kvgate-engine` |
//! | Print | [`render_env_file`] |
//!
//! If the caller is denied any secret of the input, [`run`] succeeds with no
//! results at all.

mod config;
mod input;
mod output;

pub use config::{AuthMethod, Config};
pub use input::{InputError, parse_secrets_input};
pub use output::render_env_file;

use std::sync::Arc;

use kvgate_auth::{KubernetesLogin, StaticToken, TokenProvider};
use kvgate_engine::{EngineError, EngineOptions, SecretEngine};
use kvgate_policy::AuthorizationGate;
use kvgate_types::{IdentityContext, SecretResult};
use kvgate_vault::VaultClient;
use thiserror::Error;

/// Errors from a kvgate run.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum KvgateError {
    /// The secrets input is malformed.
    #[error(transparent)]
    Input(#[from] InputError),

    /// The configuration is incomplete for the chosen auth method.
    #[error("configuration error: {0}")]
    Config(String),

    /// Resolution failed. Login failures surface here too, from the first fetch.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Resolve the configured secrets, identifying the caller from the process
/// environment.
pub async fn run(config: &Config) -> Result<Vec<SecretResult>, KvgateError> {
    run_with_context(config, IdentityContext::from_env()).await
}

/// Resolve the configured secrets on behalf of `context`.
pub async fn run_with_context(
    config: &Config,
    context: IdentityContext,
) -> Result<Vec<SecretResult>, KvgateError> {
    let requests = parse_secrets_input(&config.secrets)?;
    tracing::debug!(count = requests.len(), "parsed secrets input");
    if requests.is_empty() {
        return Ok(Vec::new());
    }

    let mut client = VaultClient::new(&config.url, token_provider(config)?).timeout(config.timeout());
    if let Some(namespace) = &config.namespace {
        client = client.namespace(namespace);
    }

    let options = EngineOptions::new()
        .ignore_not_found(config.ignore_not_found)
        .path_prefix(&config.path_prefix);
    let engine = SecretEngine::new(Arc::new(client), AuthorizationGate::new(context))
        .with_options(options);

    let results = engine.get_secrets(&requests).await?;
    tracing::info!(requested = requests.len(), resolved = results.len(), "done");
    Ok(results)
}

fn token_provider(config: &Config) -> Result<Arc<dyn TokenProvider>, KvgateError> {
    match config.method {
        AuthMethod::Token => {
            let token = config
                .token
                .as_deref()
                .filter(|t| !t.is_empty())
                .ok_or_else(|| KvgateError::Config("--token is required for the token method".into()))?;
            Ok(Arc::new(StaticToken::new(token)))
        }
        AuthMethod::Kubernetes => {
            let role = config
                .role
                .as_deref()
                .filter(|r| !r.is_empty())
                .ok_or_else(|| {
                    KvgateError::Config("--role is required for the kubernetes method".into())
                })?;
            let mut login = KubernetesLogin::new(&config.url, role)
                .mount(&config.auth_mount)
                .token_path(&config.kubernetes_token_path)
                .timeout(config.timeout());
            if let Some(namespace) = &config.namespace {
                login = login.namespace(namespace);
            }
            Ok(Arc::new(login))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config(args: &[&str]) -> Config {
        let mut argv = vec!["kvgate", "--url", "http://127.0.0.1:1", "--secrets", "secret/a b"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[tokio::test]
    async fn token_method_needs_a_token() {
        let mut cfg = config(&[]);
        cfg.token = None;
        let err = run_with_context(&cfg, IdentityContext::new()).await.unwrap_err();
        assert!(matches!(err, KvgateError::Config(msg) if msg.contains("--token")));
    }

    #[tokio::test]
    async fn kubernetes_method_needs_a_role() {
        let mut cfg = config(&["--method", "kubernetes"]);
        cfg.role = None;
        let err = run_with_context(&cfg, IdentityContext::new()).await.unwrap_err();
        assert!(matches!(err, KvgateError::Config(msg) if msg.contains("--role")));
    }

    #[tokio::test]
    async fn input_errors_come_first() {
        let mut cfg = config(&[]);
        cfg.secrets = "only-a-path".into();
        let err = run_with_context(&cfg, IdentityContext::new()).await.unwrap_err();
        assert!(matches!(err, KvgateError::Input(_)));
    }

    #[tokio::test]
    async fn empty_input_resolves_nothing() {
        let mut cfg = config(&[]);
        cfg.secrets = " ; ".into();
        let results = run_with_context(&cfg, IdentityContext::new()).await.unwrap();
        assert!(results.is_empty());
    }
}
