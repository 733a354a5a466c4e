//! Test support: recording collaborators for pipeline tests
//!
//! Enable with the `test-utils` feature.

pub mod mocks;

pub use mocks::{RecordingAssetStorage, RecordingFormatter, Upload};
