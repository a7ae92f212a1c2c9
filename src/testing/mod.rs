//! Testing utilities for authguide
//!
//! Consolidates the fixtures and mock host environments used by both the unit
//! tests and the feature-gated integration tests.
//!
//! - [`fixtures`] - Pre-built test data (records, registries, timings)
//! - [`mock`] - Mock host environments and notifiers

pub mod fixtures;
pub mod mock;

pub use fixtures::TestFixtures;
pub use mock::{MockEnvironment, RecordingNotifier};
