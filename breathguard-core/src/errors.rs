//! Error Types for Sample Validation Failures
//!
//! Errors are kept small and `Copy`: they are returned from hot
//! ingestion paths and carried across the service boundary, so all
//! context is inline — the offending value, its permitted range, and
//! for structural failures a bitmask of the absent fields.
//!
//! Two categories exist:
//!
//! - **Structural**: the payload is incomplete (`MissingFields`). The
//!   caller can fix the submission and resubmit.
//! - **Range**: a supplied value lies outside hard physical bounds or
//!   is not a finite number (`InvalidSensorValue`, `InvalidTemperature`,
//!   `InvalidHumidity`). Also recoverable by the caller; never retried
//!   here.
//!
//! No fatal error originates in this crate; everything is a typed
//! result the caller decides about.

use thiserror_no_std::Error;

use crate::sample::{Channel, FieldSet};

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation errors - kept small and `Copy` for cheap returns
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ValidationError {
    /// One or more required measurement fields were absent
    #[error("missing required sensor fields: {0}")]
    MissingFields(
        /// The absent fields; iterates in canonical order (s0..s3, temp, humidity)
        FieldSet,
    ),

    /// A gas-channel reading was not a finite number inside the ADC range
    #[error("channel {channel} value {value} outside range [{min}, {max}]")]
    InvalidSensorValue {
        /// Which channel failed
        channel: Channel,
        /// The reading that failed validation
        value: f32,
        /// Minimum acceptable reading
        min: f32,
        /// Maximum acceptable reading
        max: f32,
    },

    /// Temperature outside the hard environmental range
    #[error("temperature {value} outside range [{min}, {max}]")]
    InvalidTemperature {
        /// The reading that failed validation
        value: f32,
        /// Minimum acceptable temperature in °C
        min: f32,
        /// Maximum acceptable temperature in °C
        max: f32,
    },

    /// Humidity outside the hard environmental range
    #[error("humidity {value} outside range [{min}, {max}]")]
    InvalidHumidity {
        /// The reading that failed validation
        value: f32,
        /// Minimum acceptable relative humidity in percent
        min: f32,
        /// Maximum acceptable relative humidity in percent
        max: f32,
    },
}

impl ValidationError {
    /// True for structural (incomplete payload) failures, false for
    /// range failures. Service boundaries map both to the client error
    /// class; the distinction matters for telemetry.
    pub const fn is_structural(&self) -> bool {
        matches!(self, ValidationError::MissingFields(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::SampleField;

    #[test]
    fn error_is_small_and_copy() {
        // Returned by value from hot paths; keep it register-sized
        assert!(core::mem::size_of::<ValidationError>() <= 16);

        let err = ValidationError::InvalidTemperature {
            value: 120.0,
            min: -40.0,
            max: 85.0,
        };
        let copy = err;
        assert_eq!(err, copy);
    }

    #[test]
    fn structural_classification() {
        let mut missing = FieldSet::empty();
        missing.insert(SampleField::S0);
        assert!(ValidationError::MissingFields(missing).is_structural());

        let range = ValidationError::InvalidHumidity {
            value: 150.0,
            min: 0.0,
            max: 100.0,
        };
        assert!(!range.is_structural());
    }

    #[cfg(feature = "std")]
    #[test]
    fn missing_fields_message_lists_names() {
        let mut missing = FieldSet::empty();
        missing.insert(SampleField::Humidity);
        missing.insert(SampleField::S1);

        let msg = std::format!("{}", ValidationError::MissingFields(missing));
        assert_eq!(msg, "missing required sensor fields: s1, humidity");
    }
}
