//! Request/Response Boundary for BreathGuard
//!
//! ## Overview
//!
//! This crate wraps the pure validation and prediction cores in the two
//! operations the surrounding platform consumes:
//!
//! - **ingest**: validate one breath sample, record it, advance the
//!   owning session's collection progress, report anomalies and data
//!   quality.
//! - **predict**: validate a sample, estimate its condition
//!   distribution, record both the reading and the prediction.
//!
//! The handlers are transport-agnostic: HTTP, RPC, or a plain function
//! call all wrap the same `ingest`/`predict` signatures and the same
//! serde message types, whose wire names (camelCase) are the platform's
//! existing JSON contract.
//!
//! ## Collaborators
//!
//! Durable persistence is a *capability* the embedding application
//! provides via [`ReadingStore`]; the cores never touch it — only the
//! handlers in this crate do, after validation has decided. Wall-clock
//! access goes through [`Clock`] for the same reason. Identity and
//! authorization are resolved upstream: handlers assume `patientId` and
//! `sessionId` have already been checked against the caller. Push
//! notification of results is entirely outside this codebase.
//!
//! ## Error classes
//!
//! Every failure maps to one of two classes: [`ErrorClass::Client`]
//! (fix the request and resubmit — missing fields, out-of-range values,
//! malformed label sets) or [`ErrorClass::Server`] (storage and other
//! infrastructure failures). Nothing is retried here.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod error;
pub mod messages;
pub mod service;
pub mod store;

// Public API
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ErrorClass, ServiceError};
pub use messages::{IngestRequest, IngestResponse, PredictRequest, PredictResponse};
pub use service::{IngestService, PredictService, DEFAULT_SAMPLES_TARGET};
pub use store::{
    CollectionStatus, MemoryStore, NewPrediction, NewReading, PredictionRecord, ReadingRecord,
    ReadingStore, SessionProgress, StoreError, StoredReading,
};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
