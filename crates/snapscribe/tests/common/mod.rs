//! Shared test utilities for snapscribe integration tests.
//!
//! Builders produce zero-latency, seeded configurations so that every mock
//! resolves immediately and reproducibly.

pub mod builders;

pub use builders::*;
