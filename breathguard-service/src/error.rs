//! Boundary Error Taxonomy
//!
//! Two classes, mirroring the platform's HTTP mapping: client errors
//! (400 — the request can be fixed and resubmitted) and server errors
//! (500 — infrastructure failed, the request was fine). Validation and
//! label-set errors convert in as client-class; store failures as
//! server-class.

use thiserror::Error;

use breathguard_core::ValidationError;
use breathguard_ml::LabelSetError;

use crate::store::StoreError;

/// Which side owns the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The request was malformed or out of range; fix and resubmit.
    Client,
    /// A collaborator failed; the request itself was acceptable.
    Server,
}

/// Failures a handler can return.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The sample payload failed structural or range validation
    #[error("invalid sample: {0}")]
    InvalidSample(#[from] ValidationError),

    /// The requested label set could not be constructed
    #[error("invalid label set: {0}")]
    InvalidLabelSet(#[from] LabelSetError),

    /// The persistence collaborator failed
    #[error("storage failure: {0}")]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Error class for transport mapping.
    pub const fn class(&self) -> ErrorClass {
        match self {
            ServiceError::InvalidSample(_) | ServiceError::InvalidLabelSet(_) => ErrorClass::Client,
            ServiceError::Store(_) => ErrorClass::Server,
        }
    }

    /// Suggested HTTP status for transports that speak it.
    pub const fn http_status(&self) -> u16 {
        match self.class() {
            ErrorClass::Client => 400,
            ErrorClass::Server => 500,
        }
    }
}
