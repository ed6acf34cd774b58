//! Command line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use kvgate_auth::{DEFAULT_AUTH_MOUNT, DEFAULT_SERVICE_ACCOUNT_TOKEN_PATH};
use kvgate_engine::DEFAULT_PATH_PREFIX;

/// How to obtain the Vault token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AuthMethod {
    /// Use `--token` as is.
    Token,
    /// Log in with the pod's service account.
    Kubernetes,
}

/// kvgate configuration. Every flag can also be set through its environment
/// variable.
#[derive(Clone, Parser)]
#[command(name = "kvgate")]
#[command(version)]
#[command(about = "Resolve CI secrets from Vault and print them as NAME=value lines")]
#[command(after_help = r#"SECRETS INPUT:
    One entry per line (or separated by `;`):
        secret/data/ci password
        secret/data/ci "db-host" | DATABASE_HOST
        secret/data/ci ** | CI_

ACCESS CONTROL:
    Each secret carries x-k8s-podname, x-k8s-podnamespace,
    x-k8s-serviceaccount, x-github-actor and x-github-repository glob
    patterns. They are matched against POD_NAME, POD_NAMESPACE,
    POD_SERVICE_ACCOUNT, GITHUB_ACTOR and GITHUB_REPOSITORY. If any secret
    in the input is denied, nothing is printed."#)]
pub struct Config {
    /// Vault address, e.g. https://vault.internal:8200
    #[arg(long, env = "VAULT_ADDR")]
    pub url: String,

    /// Authentication method
    #[arg(long, env = "KVGATE_METHOD", value_enum, default_value_t = AuthMethod::Token)]
    pub method: AuthMethod,

    /// Vault token (token method)
    #[arg(long, env = "VAULT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Vault role to log in as (kubernetes method)
    #[arg(long, env = "KVGATE_ROLE")]
    pub role: Option<String>,

    /// Service account token file (kubernetes method)
    #[arg(long, env = "KVGATE_KUBERNETES_TOKEN_PATH", default_value = DEFAULT_SERVICE_ACCOUNT_TOKEN_PATH)]
    pub kubernetes_token_path: PathBuf,

    /// Mount path of the kubernetes auth method
    #[arg(long, env = "KVGATE_AUTH_MOUNT", default_value = DEFAULT_AUTH_MOUNT)]
    pub auth_mount: String,

    /// Vault Enterprise namespace
    #[arg(long, env = "VAULT_NAMESPACE")]
    pub namespace: Option<String>,

    /// Secrets to resolve
    #[arg(long, env = "KVGATE_SECRETS")]
    pub secrets: String,

    /// Skip secrets whose path does not exist instead of failing
    #[arg(long, env = "KVGATE_IGNORE_NOT_FOUND")]
    pub ignore_not_found: bool,

    /// Prefix joined in front of every secret path
    #[arg(long, env = "KVGATE_PATH_PREFIX", default_value = DEFAULT_PATH_PREFIX)]
    pub path_prefix: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "KVGATE_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl Config {
    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("role", &self.role)
            .field("namespace", &self.namespace)
            .field("ignore_not_found", &self.ignore_not_found)
            .field("path_prefix", &self.path_prefix)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}
