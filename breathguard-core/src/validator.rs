//! Breath Sample Validation
//!
//! ## Validation layers
//!
//! A submitted payload passes through fixed-order checks where the
//! first failure wins:
//!
//! 1. **Structural** — all six measurement fields present, else the
//!    error names exactly the absent fields in canonical order.
//! 2. **Channel range** — each of `s0..s3`, in order, must be a finite
//!    number within the ADC range.
//! 3. **Temperature range** — finite, within the hard environmental
//!    limits the capture hardware can report.
//! 4. **Humidity range** — finite, within 0–100 %.
//!
//! Only after all four gates pass are anomaly flags computed, and those
//! are *independent*: every flag is evaluated on every accepted sample.
//! The same physiologic thresholds feed the [`DataQuality`] booleans as
//! in-range checks.
//!
//! ## Why two sets of ranges?
//!
//! The hard limits describe what the hardware can physically report; a
//! violation means a broken sensor or a malformed submission and the
//! sample is rejected. The physiologic ranges describe what a *direct
//! exhalation* looks like (30–40 °C, 60–95 % RH — exhaled air is warm
//! and nearly saturated). A reading outside them is still a real
//! measurement, so it is accepted and flagged rather than rejected:
//! screening workflows want the operator to re-seat the mouthpiece, not
//! lose the event.
//!
//! Validation is a pure function of the payload: no clock, no history,
//! no side effects. Calling it twice on the same payload yields the
//! same result, and distinct samples may be validated concurrently.

use crate::{
    constants::{adc, breath, climate},
    errors::{ValidationError, ValidationResult},
    report::{AnomalyFlags, AnomalyReport, DataQuality},
    sample::{Channel, RawSample, SamplePayload},
};

/// Closed interval of acceptable values for one measurement domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeLimits {
    /// Minimum acceptable value
    pub min: f32,
    /// Maximum acceptable value
    pub max: f32,
}

impl RangeLimits {
    /// Construct limits, swapping endpoints if given in reverse.
    pub fn new(min: f32, max: f32) -> Self {
        if min > max {
            Self { min: max, max: min }
        } else {
            Self { min, max }
        }
    }

    /// True when `value` is a finite number inside the interval.
    ///
    /// NaN fails both comparisons and is rejected here rather than by a
    /// separate check; the caller sees the same range error either way.
    pub fn contains(&self, value: f32) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

/// The full set of bounds a validator applies.
///
/// Exposed for boundary documentation and for callers that render
/// client-facing hints about acceptable inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleConstraints {
    /// Hard range for each gas channel, in ADC counts.
    pub channel: RangeLimits,
    /// Hard range for temperature, in °C.
    pub temperature_c: RangeLimits,
    /// Hard range for humidity, in percent.
    pub humidity_pct: RangeLimits,
    /// Physiologic breath range for temperature, in °C.
    pub breath_temperature_c: RangeLimits,
    /// Physiologic breath range for humidity, in percent.
    pub breath_humidity_pct: RangeLimits,
    /// Channel reading above which a spike is flagged, in ADC counts.
    pub spike_counts: f32,
}

/// Validator for one breath measurement payload.
///
/// Stateless and reusable; one instance can validate any number of
/// samples, from any number of threads, with no interior mutability.
#[derive(Debug, Clone)]
pub struct SampleValidator {
    channel: RangeLimits,
    temperature_c: RangeLimits,
    humidity_pct: RangeLimits,
    breath_temperature_c: RangeLimits,
    breath_humidity_pct: RangeLimits,
    spike_counts: f32,
}

impl Default for SampleValidator {
    fn default() -> Self {
        Self {
            // 10-bit converter on the gas channels
            channel: RangeLimits::new(adc::CHANNEL_MIN_COUNTS, adc::CHANNEL_MAX_COUNTS),

            // Operating range of the combined temp/RH sensor package
            temperature_c: RangeLimits::new(climate::TEMPERATURE_MIN_C, climate::TEMPERATURE_MAX_C),
            humidity_pct: RangeLimits::new(climate::HUMIDITY_MIN_PCT, climate::HUMIDITY_MAX_PCT),

            // Exhaled air is warm and nearly saturated
            breath_temperature_c: RangeLimits::new(breath::TEMPERATURE_MIN_C, breath::TEMPERATURE_MAX_C),
            breath_humidity_pct: RangeLimits::new(breath::HUMIDITY_MIN_PCT, breath::HUMIDITY_MAX_PCT),

            spike_counts: adc::CHANNEL_SPIKE_COUNTS,
        }
    }
}

impl SampleValidator {
    /// Create validator with custom hard limits, keeping the default
    /// physiologic ranges and spike threshold.
    pub fn new_with_limits(
        channel: RangeLimits,
        temperature_c: RangeLimits,
        humidity_pct: RangeLimits,
    ) -> Self {
        Self {
            channel,
            temperature_c,
            humidity_pct,
            ..Self::default()
        }
    }

    /// Override the physiologic breath ranges used for flags and quality.
    pub fn with_breath_ranges(mut self, temperature_c: RangeLimits, humidity_pct: RangeLimits) -> Self {
        self.breath_temperature_c = temperature_c;
        self.breath_humidity_pct = humidity_pct;
        self
    }

    /// Override the channel spike threshold.
    pub fn with_spike_threshold(mut self, counts: f32) -> Self {
        self.spike_counts = counts;
        self
    }

    /// Get the bounds this validator applies
    pub fn constraints(&self) -> SampleConstraints {
        SampleConstraints {
            channel: self.channel,
            temperature_c: self.temperature_c,
            humidity_pct: self.humidity_pct,
            breath_temperature_c: self.breath_temperature_c,
            breath_humidity_pct: self.breath_humidity_pct,
            spike_counts: self.spike_counts,
        }
    }

    /// Validate a payload, returning its anomaly report.
    ///
    /// This is the ingestion contract: accept/reject plus flags and
    /// quality. Use [`accept`](Self::accept) when the validated sample
    /// itself is needed for feature derivation.
    pub fn validate(&self, payload: &SamplePayload) -> ValidationResult<AnomalyReport> {
        self.accept(payload).map(|(_, report)| report)
    }

    /// Validate a payload and construct the immutable [`RawSample`].
    pub fn accept(&self, payload: &SamplePayload) -> ValidationResult<(RawSample, AnomalyReport)> {
        self.check_structure(payload)?;
        self.check_ranges(payload)?;

        let sample = RawSample::from_complete_payload(payload);
        let report = self.assess(&sample);
        Ok((sample, report))
    }

    fn check_structure(&self, payload: &SamplePayload) -> ValidationResult<()> {
        let missing = payload.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(missing))
        }
    }

    fn check_ranges(&self, payload: &SamplePayload) -> ValidationResult<()> {
        // Structural check has run; a None here cannot be reached, but
        // the error stays well-formed if it ever is.
        for ch in Channel::ALL {
            let value = payload.channel(ch).unwrap_or(f32::NAN);
            if !self.channel.contains(value) {
                return Err(ValidationError::InvalidSensorValue {
                    channel: ch,
                    value,
                    min: self.channel.min,
                    max: self.channel.max,
                });
            }
        }

        let temp = payload.temperature_c.unwrap_or(f32::NAN);
        if !self.temperature_c.contains(temp) {
            return Err(ValidationError::InvalidTemperature {
                value: temp,
                min: self.temperature_c.min,
                max: self.temperature_c.max,
            });
        }

        let humidity = payload.humidity_pct.unwrap_or(f32::NAN);
        if !self.humidity_pct.contains(humidity) {
            return Err(ValidationError::InvalidHumidity {
                value: humidity,
                min: self.humidity_pct.min,
                max: self.humidity_pct.max,
            });
        }

        Ok(())
    }

    /// Anomaly flags and quality for a sample that passed range checks.
    fn assess(&self, sample: &RawSample) -> AnomalyReport {
        let mut flags = AnomalyFlags::empty();

        if sample.channels.iter().any(|&v| v > self.spike_counts) {
            flags.set(AnomalyFlags::HIGH_SENSOR_READING);
        }
        if !self.breath_temperature_c.contains(sample.temperature_c) {
            flags.set(AnomalyFlags::UNUSUAL_TEMPERATURE);
        }
        if !self.breath_humidity_pct.contains(sample.humidity_pct) {
            flags.set(AnomalyFlags::UNUSUAL_HUMIDITY);
        }

        let quality = DataQuality {
            sensor_range: sample.channels.iter().all(|&v| self.channel.contains(v)),
            temperature_range: self.breath_temperature_c.contains(sample.temperature_c),
            humidity_range: self.breath_humidity_pct.contains(sample.humidity_pct),
        };

        AnomalyReport { flags, quality }
    }
}
