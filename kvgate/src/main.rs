//! kvgate - resolve CI secrets from Vault.
//!
//! Prints one `NAME=value` line per resolved secret on stdout. Diagnostics
//! go to stderr; set `RUST_LOG=kvgate=debug` to see authorization decisions.

use std::process::ExitCode;

use clap::Parser;
use kvgate::{Config, render_env_file};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();

    match kvgate::run(&config).await {
        Ok(results) => {
            print!("{}", render_env_file(&results));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("kvgate error: {e}");
            ExitCode::FAILURE
        }
    }
}
