//! Classifier Strategy
//!
//! ## Why a trait?
//!
//! The shipped classifier is not a model — it is a fixed set of channel
//! thresholds standing in for one while training data accumulates. That
//! makes the classification step the one part of this pipeline that is
//! *expected* to be replaced. [`Classifier`] is the seam: it consumes
//! the derived feature vector, the label set, and a random source, and
//! yields a candidate label with a base confidence. Everything on
//! either side — validation, feature derivation, distribution
//! synthesis, the service contract — is independent of which
//! implementation sits behind the trait.
//!
//! ## The threshold heuristic
//!
//! [`ThresholdHeuristicClassifier`] evaluates two rules in order, first
//! match wins:
//!
//! 1. `s0_mean` or `s1_mean` elevated → the metabolic entry,
//!    confidence in [0.75, 0.95)
//! 2. `s2_mean` or `s3_mean` elevated → the respiratory entry,
//!    confidence in [0.70, 0.95)
//! 3. otherwise → the baseline entry, confidence in [0.60, 0.90)
//!
//! The label choice is fully deterministic in the features; only the
//! confidence within the branch band is drawn from the random source.

use breathguard_core::{features::FeatureVector, rng::RandomSource};

use crate::{
    constants::{confidence, thresholds},
    labels::{ClassRole, LabelSet},
};

/// Outcome of one classification: which label, at what base confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// Index of the chosen label within the label set.
    pub label_index: usize,
    /// Probability mass the classifier assigns its choice, in (0, 1].
    pub confidence: f32,
}

/// Capability interface for condition classification.
///
/// Implementations must be pure given `(features, labels, rng)`: no
/// hidden state, no I/O. The returned index must lie within the label
/// set.
pub trait Classifier {
    /// Classify one feature vector against a label set.
    fn classify(
        &self,
        features: &FeatureVector,
        labels: &LabelSet,
        rng: &mut dyn RandomSource,
    ) -> Classification;
}

/// Channel thresholds for the heuristic's decision rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionThresholds {
    /// s0 level above which the metabolic rule fires, in ADC counts.
    pub metabolic_s0: f32,
    /// s1 level above which the metabolic rule fires, in ADC counts.
    pub metabolic_s1: f32,
    /// s2 level above which the respiratory rule fires, in ADC counts.
    pub respiratory_s2: f32,
    /// s3 level above which the respiratory rule fires, in ADC counts.
    pub respiratory_s3: f32,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            metabolic_s0: thresholds::METABOLIC_S0_COUNTS,
            metabolic_s1: thresholds::METABOLIC_S1_COUNTS,
            respiratory_s2: thresholds::RESPIRATORY_S2_COUNTS,
            respiratory_s3: thresholds::RESPIRATORY_S3_COUNTS,
        }
    }
}

/// Half-open confidence band `[base, base + span)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceBand {
    /// Band floor.
    pub base: f32,
    /// Band width.
    pub span: f32,
}

impl ConfidenceBand {
    /// Draw a confidence from the band.
    pub fn draw(&self, rng: &mut dyn RandomSource) -> f32 {
        self.base + rng.next_unit() * self.span
    }
}

/// Placeholder rule-based classifier.
///
/// Stands in for a trained model; see the module docs for the rules.
/// Thresholds and bands are configurable so deployments can recalibrate
/// without a release, but the defaults are the documented behavior.
#[derive(Debug, Clone)]
pub struct ThresholdHeuristicClassifier {
    thresholds: DecisionThresholds,
    metabolic_band: ConfidenceBand,
    respiratory_band: ConfidenceBand,
    baseline_band: ConfidenceBand,
}

impl Default for ThresholdHeuristicClassifier {
    fn default() -> Self {
        Self {
            thresholds: DecisionThresholds::default(),
            metabolic_band: ConfidenceBand {
                base: confidence::METABOLIC_BASE,
                span: confidence::METABOLIC_SPAN,
            },
            respiratory_band: ConfidenceBand {
                base: confidence::RESPIRATORY_BASE,
                span: confidence::RESPIRATORY_SPAN,
            },
            baseline_band: ConfidenceBand {
                base: confidence::BASELINE_BASE,
                span: confidence::BASELINE_SPAN,
            },
        }
    }
}

impl ThresholdHeuristicClassifier {
    /// Classifier with custom decision thresholds and default bands.
    pub fn new_with_thresholds(thresholds: DecisionThresholds) -> Self {
        Self {
            thresholds,
            ..Self::default()
        }
    }

    /// The thresholds in effect.
    pub fn thresholds(&self) -> DecisionThresholds {
        self.thresholds
    }
}

impl Classifier for ThresholdHeuristicClassifier {
    fn classify(
        &self,
        features: &FeatureVector,
        labels: &LabelSet,
        rng: &mut dyn RandomSource,
    ) -> Classification {
        let t = &self.thresholds;

        let (role, band) = if features.s0_mean > t.metabolic_s0 || features.s1_mean > t.metabolic_s1 {
            (ClassRole::Metabolic, self.metabolic_band)
        } else if features.s2_mean > t.respiratory_s2 || features.s3_mean > t.respiratory_s3 {
            (ClassRole::Respiratory, self.respiratory_band)
        } else {
            (ClassRole::Baseline, self.baseline_band)
        };

        Classification {
            label_index: labels.role_index(role),
            confidence: band.draw(rng),
        }
    }
}
