//! Constants for the placeholder classifier
//!
//! Decision thresholds, confidence bands and contribution ceilings for
//! the threshold heuristic. These values are the documented behavior of
//! the screening prototype this crate replaces; a trained model makes
//! all of them obsolete at once.

/// Channel thresholds for the decision rules, in ADC counts.
pub mod thresholds {
    /// s0 level above which the metabolic branch fires.
    pub const METABOLIC_S0_COUNTS: f32 = 600.0;

    /// s1 level above which the metabolic branch fires.
    pub const METABOLIC_S1_COUNTS: f32 = 500.0;

    /// s2 level above which the respiratory branch fires.
    pub const RESPIRATORY_S2_COUNTS: f32 = 400.0;

    /// s3 level above which the respiratory branch fires.
    pub const RESPIRATORY_S3_COUNTS: f32 = 700.0;
}

/// Per-branch confidence bands: `base + u * span` with `u` in [0, 1).
pub mod confidence {
    /// Metabolic branch floor.
    pub const METABOLIC_BASE: f32 = 0.75;
    /// Metabolic branch width.
    pub const METABOLIC_SPAN: f32 = 0.20;

    /// Respiratory branch floor.
    pub const RESPIRATORY_BASE: f32 = 0.70;
    /// Respiratory branch width.
    pub const RESPIRATORY_SPAN: f32 = 0.25;

    /// Baseline branch floor.
    pub const BASELINE_BASE: f32 = 0.60;
    /// Baseline branch width.
    pub const BASELINE_SPAN: f32 = 0.30;
}

/// Contribution-weight ceilings per input, in feature-layout order
/// (s0, s1, s2, s3, temp, humidity). Each reported weight is an
/// independent uniform draw scaled by its ceiling; the weights are
/// relative importance, not a distribution.
pub mod contributions {
    /// Ceilings in feature-layout order.
    pub const CEILINGS: [f32; 6] = [0.30, 0.25, 0.20, 0.15, 0.05, 0.05];
}
