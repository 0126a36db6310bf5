//! Feature Derivation from Validated Samples
//!
//! The estimator consumes a fixed six-feature layout: one mean per gas
//! channel plus mean temperature and humidity. For a single sample the
//! derivation is the identity transform — the `_mean` names anticipate
//! aggregation over a session's samples, which [`SessionWindow`]
//! provides as an explicit, separate step. Keeping the layout identical
//! for both cases means a classifier trained on session means scores
//! single captures without a second code path.

use crate::sample::RawSample;

/// Number of features the estimator consumes.
pub const FEATURE_COUNT: usize = 6;

/// Fixed six-feature layout derived from one or more samples.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureVector {
    /// Mean channel s0 reading, in ADC counts.
    pub s0_mean: f32,
    /// Mean channel s1 reading, in ADC counts.
    pub s1_mean: f32,
    /// Mean channel s2 reading, in ADC counts.
    pub s2_mean: f32,
    /// Mean channel s3 reading, in ADC counts.
    pub s3_mean: f32,
    /// Mean exhaled-air temperature, in °C.
    pub temp_mean: f32,
    /// Mean exhaled-air humidity, in percent.
    pub humidity_mean: f32,
}

impl FeatureVector {
    /// Feature names in layout order.
    pub const NAMES: [&'static str; FEATURE_COUNT] = [
        "s0_mean",
        "s1_mean",
        "s2_mean",
        "s3_mean",
        "temp_mean",
        "humidity_mean",
    ];

    /// Derive features from a single validated sample (identity
    /// transform).
    pub fn from_sample(sample: &RawSample) -> Self {
        Self {
            s0_mean: sample.channels[0],
            s1_mean: sample.channels[1],
            s2_mean: sample.channels[2],
            s3_mean: sample.channels[3],
            temp_mean: sample.temperature_c,
            humidity_mean: sample.humidity_pct,
        }
    }

    /// Values in layout order.
    pub fn as_array(&self) -> [f32; FEATURE_COUNT] {
        [
            self.s0_mean,
            self.s1_mean,
            self.s2_mean,
            self.s3_mean,
            self.temp_mean,
            self.humidity_mean,
        ]
    }
}

/// Running per-field mean over a session's accepted samples.
///
/// The multi-sample extension of the single-sample identity transform:
/// push every accepted sample for the session window, then take
/// [`features`](Self::features) before classification. Only running
/// sums are kept, so the window is O(1) in memory regardless of session
/// length.
#[derive(Debug, Clone, Default)]
pub struct SessionWindow {
    sums: [f32; FEATURE_COUNT],
    count: u32,
}

impl SessionWindow {
    /// Empty window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one accepted sample into the window.
    pub fn push(&mut self, sample: &RawSample) {
        let values = FeatureVector::from_sample(sample).as_array();
        for (sum, value) in self.sums.iter_mut().zip(values) {
            *sum += value;
        }
        self.count += 1;
    }

    /// Number of samples folded in.
    pub fn len(&self) -> usize {
        self.count as usize
    }

    /// True when no sample has been pushed.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Drop all accumulated state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Per-field mean across the window, or `None` while empty.
    pub fn features(&self) -> Option<FeatureVector> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f32;
        Some(FeatureVector {
            s0_mean: self.sums[0] / n,
            s1_mean: self.sums[1] / n,
            s2_mean: self.sums[2] / n,
            s3_mean: self.sums[3] / n,
            temp_mean: self.sums[4] / n,
            humidity_mean: self.sums[5] / n,
        })
    }
}
