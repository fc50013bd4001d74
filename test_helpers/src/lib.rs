//! Test helpers shared across crates.
//!
//! - [`jail`] wraps `figment::Jail` so tests run in a scratch working
//!   directory with a restorable environment.
//! - [`fixtures`] holds the configuration documents the integration tests
//!   write into that directory.

pub mod fixtures;
pub mod jail;
