#![deny(missing_docs)]
//! Batch secret resolution for kvgate.
//!
//! [`SecretEngine`] takes an ordered list of [`SecretRequest`]s and resolves
//! them one at a time against a [`Transport`]:
//!
//! 1. fetch the payload at each distinct path once, reusing it for later
//!    requests in the same batch,
//! 2. check the payload's authorization attributes against the caller's
//!    [`IdentityContext`](kvgate_types::IdentityContext),
//! 3. extract the requested value, or expand a `*`/`**` wildcard into one
//!    result per key.
//!
//! A single authorization denial empties the entire batch. See
//! [`SecretEngine::get_secrets`].
//!
//! [`SecretRequest`]: kvgate_types::SecretRequest
//! [`Transport`]: kvgate_types::Transport

mod engine;
mod error;
mod names;
mod payload;
mod wildcard;

pub use engine::{DEFAULT_PATH_PREFIX, EngineOptions, SecretEngine, query_selector};
pub use error::EngineError;
pub use names::normalize_output_key;
pub use wildcard::derive_request;
