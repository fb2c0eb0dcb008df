//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! decisioning test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for common entities
//! - `builders`: Builder patterns for test data construction
//! - `telemetry`: Tracing initialization for tests

pub mod fixtures;
pub mod builders;
pub mod telemetry;

pub use fixtures::*;
pub use builders::*;
pub use telemetry::*;
