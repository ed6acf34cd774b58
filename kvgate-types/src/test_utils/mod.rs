//! In-memory implementations for testing.
//!
//! Available behind the `test-utils` feature flag.

mod memory_transport;

pub use memory_transport::MemoryTransport;
