//! Core validation engine for BreathGuard
//!
//! Turns one raw breath measurement (four gas-sensor channels plus
//! temperature and humidity) into a validated sample, an anomaly report
//! and a feature vector.
//!
//! Key constraints:
//! - Pure functions, no I/O, no shared state
//! - Every invocation independent; safe to run in parallel per sample
//! - No allocation in the validation path
//!
//! ```no_run
//! use breathguard_core::{SampleValidator, SamplePayload};
//!
//! let validator = SampleValidator::default();
//! let payload = SamplePayload {
//!     s0: Some(120.0),
//!     s1: Some(98.0),
//!     s2: Some(233.0),
//!     s3: Some(310.0),
//!     temperature_c: Some(34.5),
//!     humidity_pct: Some(88.0),
//!     sample_duration_s: None,
//! };
//!
//! match validator.validate(&payload) {
//!     Ok(report) => {}, // Accepted; report carries anomaly flags
//!     Err(e) => {},     // Structural or range failure
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod constants;
pub mod errors;
pub mod features;
pub mod report;
pub mod rng;
pub mod sample;
pub mod validator;

// Public API
pub use errors::{ValidationError, ValidationResult};
pub use features::{FeatureVector, SessionWindow};
pub use report::{AnomalyFlags, AnomalyReport, DataQuality};
pub use rng::{RandomSource, SeededRandom, SequenceRandom};
#[cfg(feature = "std")]
pub use rng::EntropyRandom;
pub use sample::{Channel, FieldSet, RawSample, SampleField, SamplePayload};
pub use validator::{RangeLimits, SampleConstraints, SampleValidator};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
