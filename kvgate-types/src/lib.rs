//! # kvgate-types: shared vocabulary for secret resolution
//!
//! This crate defines the data types and the single protocol boundary that
//! every other kvgate crate builds on.
//!
//! | Concept | Type | What it is |
//! |---------|------|------------|
//! | Request | [`SecretRequest`], [`Selector`] | One line of "give me this value from that path" |
//! | Result | [`SecretResult`], [`SecretValue`] | The extracted value plus the concrete request it answers |
//! | Identity | [`IdentityContext`] | Who is asking: pod and CI attributes |
//! | Transport | [`Transport`], [`TransportError`] | `GET path -> body` against the secret store |
//!
//! The engine (`kvgate-engine`) consumes all four. Transports live in their
//! own crates (`kvgate-vault` for HTTP); an in-memory transport for tests is
//! available behind the `test-utils` feature.

#![deny(missing_docs)]

pub mod context;
pub mod request;
pub mod result;
pub mod secret;
pub mod transport;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use context::IdentityContext;
pub use request::{SecretRequest, Selector, WildcardCase};
pub use result::SecretResult;
pub use secret::SecretValue;
pub use transport::{Transport, TransportError};
