//! Anomaly Flags and Data-Quality Assessment
//!
//! ## Overview
//!
//! A sample that passes hard range validation can still be suspicious:
//! a channel riding near the converter ceiling, or air that is too cool
//! or too dry to plausibly be a direct exhalation. Those conditions are
//! not rejections — the measurement is physically possible — but the
//! downstream consumer should know about them before trusting a
//! prediction built on the sample.
//!
//! Validation therefore emits an [`AnomalyReport`] alongside every
//! accepted sample:
//!
//! - [`AnomalyFlags`]: a bitmask of out-of-expected-range observations.
//!   Flags are independent; all of them are evaluated on every sample
//!   (no short-circuiting).
//! - [`DataQuality`]: per-domain booleans using the *narrow* physiologic
//!   expectations — the same thresholds the flags use, expressed as
//!   in-range checks. A clean breath capture has all three true.
//!
//! The report is ephemeral: it is derived per sample and handed to the
//! caller; recording it durably is the persistence collaborator's
//! concern, not this crate's.

use core::fmt;

/// Bit flags for anomaly observations
///
/// Tracks which out-of-expected-range conditions a sample exhibited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AnomalyFlags(u8);

impl AnomalyFlags {
    /// A gas channel read above the spike threshold.
    pub const HIGH_SENSOR_READING: Self = Self(1 << 0);
    /// Exhaled-air temperature outside the physiologic breath range.
    pub const UNUSUAL_TEMPERATURE: Self = Self(1 << 1);
    /// Exhaled-air humidity outside the physiologic breath range.
    pub const UNUSUAL_HUMIDITY: Self = Self(1 << 2);

    const VARIANTS: [Self; 3] = [
        Self::HIGH_SENSOR_READING,
        Self::UNUSUAL_TEMPERATURE,
        Self::UNUSUAL_HUMIDITY,
    ];

    /// No anomalies.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Add flags to the set.
    pub fn set(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Check whether all flags in `other` are present.
    pub const fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// True when no anomaly was observed.
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of distinct anomalies observed.
    pub const fn count(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate set flags in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = AnomalyFlags> + '_ {
        Self::VARIANTS.into_iter().filter(|v| self.contains(*v))
    }

    /// Human-readable description of a single flag.
    ///
    /// Wording is part of the ingestion response contract; do not
    /// reword without versioning the boundary.
    pub fn description(&self) -> &'static str {
        match *self {
            Self::HIGH_SENSOR_READING => "High sensor reading detected",
            Self::UNUSUAL_TEMPERATURE => "Unusual breath temperature",
            Self::UNUSUAL_HUMIDITY => "Unusual breath humidity",
            _ => "Multiple anomalies",
        }
    }
}

impl fmt::Display for AnomalyFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for flag in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(flag.description())?;
            first = false;
        }
        Ok(())
    }
}

/// Per-domain quality booleans using the narrow physiologic expectations.
///
/// `sensor_range` is true by construction after range validation; it is
/// reported anyway so the boundary contract carries all three checks
/// explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DataQuality {
    /// All four channels within the ADC range.
    pub sensor_range: bool,
    /// Temperature within the physiologic breath range.
    pub temperature_range: bool,
    /// Humidity within the physiologic breath range.
    pub humidity_range: bool,
}

impl DataQuality {
    /// All three checks passed.
    pub const fn is_clean(&self) -> bool {
        self.sensor_range && self.temperature_range && self.humidity_range
    }
}

/// Validation outcome for one accepted sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnomalyReport {
    /// Anomaly observations, all independently evaluated.
    pub flags: AnomalyFlags,
    /// Narrow-range quality assessment.
    pub quality: DataQuality,
}

impl AnomalyReport {
    /// True when the sample raised no flags.
    pub const fn is_nominal(&self) -> bool {
        self.flags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_operations() {
        let mut flags = AnomalyFlags::empty();
        assert!(flags.is_empty());

        flags.set(AnomalyFlags::HIGH_SENSOR_READING);
        flags.set(AnomalyFlags::UNUSUAL_HUMIDITY);

        assert!(flags.contains(AnomalyFlags::HIGH_SENSOR_READING));
        assert!(flags.contains(AnomalyFlags::UNUSUAL_HUMIDITY));
        assert!(!flags.contains(AnomalyFlags::UNUSUAL_TEMPERATURE));
        assert_eq!(flags.count(), 2);
    }

    #[test]
    fn flag_iteration_order() {
        let mut flags = AnomalyFlags::empty();
        flags.set(AnomalyFlags::UNUSUAL_HUMIDITY);
        flags.set(AnomalyFlags::HIGH_SENSOR_READING);

        let collected: [Option<AnomalyFlags>; 3] = {
            let mut out = [None; 3];
            for (i, f) in flags.iter().enumerate() {
                out[i] = Some(f);
            }
            out
        };
        assert_eq!(collected[0], Some(AnomalyFlags::HIGH_SENSOR_READING));
        assert_eq!(collected[1], Some(AnomalyFlags::UNUSUAL_HUMIDITY));
        assert_eq!(collected[2], None);
    }

    #[test]
    fn quality_is_clean() {
        let clean = DataQuality {
            sensor_range: true,
            temperature_range: true,
            humidity_range: true,
        };
        assert!(clean.is_clean());

        let cool = DataQuality {
            temperature_range: false,
            ..clean
        };
        assert!(!cool.is_clean());
    }
}
