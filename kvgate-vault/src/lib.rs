#![deny(missing_docs)]
//! HashiCorp Vault transport for kvgate.
//!
//! [`VaultClient`] implements [`kvgate_types::Transport`]: a plain
//! `GET {addr}/{path}` carrying the caller's token. Paths arrive fully
//! formed (`v1/secret/data/ci`); the client does not interpret them.

mod client;
mod error;

pub use client::{DEFAULT_TIMEOUT, VaultClient};
