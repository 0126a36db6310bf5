//! Constants for BreathGuard Core
//!
//! Centralized numeric policy for the validation engine. All range
//! bounds and thresholds are defined here with their units; validators
//! take these as defaults and remain configurable at construction time.
//!
//! Organization follows the measurement domains:
//! - **adc**: the gas-sensor channel range (10-bit converter counts)
//! - **climate**: hard environmental sensor limits
//! - **breath**: physiologic expected ranges for exhaled air
//! - **sampling**: capture-window defaults

/// Gas-sensor channel limits, in raw ADC counts.
pub mod adc {
    /// Lowest representable channel reading (converter floor).
    pub const CHANNEL_MIN_COUNTS: f32 = 0.0;

    /// Highest representable channel reading (10-bit converter, 2^10 - 1).
    pub const CHANNEL_MAX_COUNTS: f32 = 1023.0;

    /// Channel reading above which a spike is flagged. Readings this
    /// close to the converter ceiling usually mean sensor saturation
    /// rather than a genuine breath signature.
    pub const CHANNEL_SPIKE_COUNTS: f32 = 900.0;
}

/// Hard environmental sensor limits.
pub mod climate {
    /// Coldest temperature the capture hardware reports, in °C.
    pub const TEMPERATURE_MIN_C: f32 = -40.0;

    /// Hottest temperature the capture hardware reports, in °C.
    pub const TEMPERATURE_MAX_C: f32 = 85.0;

    /// Relative humidity floor, in percent.
    pub const HUMIDITY_MIN_PCT: f32 = 0.0;

    /// Relative humidity ceiling, in percent.
    pub const HUMIDITY_MAX_PCT: f32 = 100.0;
}

/// Physiologic expected ranges for exhaled breath.
///
/// Values outside these ranges are still structurally valid readings;
/// they are flagged as anomalies and reflected in the data-quality
/// assessment instead of being rejected.
pub mod breath {
    /// Lower bound of expected exhaled-air temperature, in °C.
    pub const TEMPERATURE_MIN_C: f32 = 30.0;

    /// Upper bound of expected exhaled-air temperature, in °C.
    pub const TEMPERATURE_MAX_C: f32 = 40.0;

    /// Lower bound of expected exhaled-air humidity, in percent.
    pub const HUMIDITY_MIN_PCT: f32 = 60.0;

    /// Upper bound of expected exhaled-air humidity, in percent.
    pub const HUMIDITY_MAX_PCT: f32 = 95.0;
}

/// Capture-window defaults.
pub mod sampling {
    /// Sample duration assumed when the capture device does not report
    /// one, in seconds.
    pub const DEFAULT_SAMPLE_DURATION_S: f32 = 5.0;
}
