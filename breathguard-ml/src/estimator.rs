//! Prediction Estimator
//!
//! ## Pipeline
//!
//! `estimate` runs four steps over an unvalidated payload:
//!
//! 1. **Validate** with the same [`SampleValidator`] rules ingestion
//!    uses — one set of range rules, shared, so estimation can never
//!    accept a payload ingestion would reject.
//! 2. **Derive** the feature vector (identity transform for a single
//!    sample; session means arrive via
//!    [`estimate_features`](Estimator::estimate_features)).
//! 3. **Classify** through the [`Classifier`] strategy.
//! 4. **Synthesize** the probability distribution and contribution
//!    weights.
//!
//! ## Distribution synthesis
//!
//! The candidate label is assigned the classifier's confidence; the
//! residual mass `1 - confidence` is partitioned over the remaining
//! labels in set order, each drawing a uniform share of what is left.
//! The whole map — candidate included — is then normalized to sum to 1.
//!
//! The reported `confidence` stays the *pre-normalization* value, so it
//! usually differs slightly from `scores[condition]`. That asymmetry is
//! inherited from the service this crate replaces and is preserved on
//! purpose; callers comparing the two fields must not assume equality.
//!
//! ## Draw order
//!
//! Exactly one draw for the confidence, one per non-candidate label in
//! set order, then six for the contribution weights (s0, s1, s2, s3,
//! temp, humidity). A [`SequenceRandom`](breathguard_core::rng::SequenceRandom)
//! replaying that order reproduces a prediction exactly.

use heapless::Vec;

use breathguard_core::{
    errors::ValidationResult,
    features::FeatureVector,
    rng::RandomSource,
    sample::SamplePayload,
    validator::SampleValidator,
};

use crate::{
    classifier::{Classifier, ThresholdHeuristicClassifier},
    constants::contributions,
    labels::{Label, LabelSet, MAX_LABELS},
};

/// Normalized per-label probability assignment, in label-set order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityScores {
    entries: Vec<(Label, f32), MAX_LABELS>,
}

impl ProbabilityScores {
    /// Probability assigned to the given label, if present.
    pub fn get(&self, label: &Label) -> Option<f32> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, p)| *p)
    }

    /// Iterate `(label, probability)` pairs in label-set order.
    pub fn iter(&self) -> impl Iterator<Item = (&Label, f32)> {
        self.entries.iter().map(|(l, p)| (l, *p))
    }

    /// Number of labels scored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no label was scored (does not occur for valid sets).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all probabilities; 1.0 within float tolerance.
    pub fn total(&self) -> f32 {
        self.entries.iter().map(|(_, p)| p).sum()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ProbabilityScores {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, probability) in self.iter() {
            map.serialize_entry(label.as_str(), &probability)?;
        }
        map.end()
    }
}

/// Relative per-input influence weights for one prediction.
///
/// Not a distribution: weights are independent and do not sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SensorContributions {
    /// Channel s0 weight.
    pub s0: f32,
    /// Channel s1 weight.
    pub s1: f32,
    /// Channel s2 weight.
    pub s2: f32,
    /// Channel s3 weight.
    pub s3: f32,
    /// Temperature weight.
    pub temp: f32,
    /// Humidity weight.
    pub humidity: f32,
}

impl SensorContributions {
    /// Weights in feature-layout order.
    pub fn as_array(&self) -> [f32; 6] {
        [self.s0, self.s1, self.s2, self.s3, self.temp, self.humidity]
    }
}

/// One prediction: condition, confidence, distribution, contributions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PredictionResult {
    /// The predicted condition label.
    pub condition: Label,
    /// Pre-normalization probability mass of `condition`. May differ
    /// from `scores[condition]`; see the module docs.
    pub confidence: f32,
    /// Normalized probability per label, in label-set order.
    #[cfg_attr(feature = "serde", serde(rename = "probabilityScores"))]
    pub scores: ProbabilityScores,
    /// Relative input-influence weights.
    #[cfg_attr(feature = "serde", serde(rename = "sensorContributions"))]
    pub contributions: SensorContributions,
}

/// Stateless prediction estimator over a classifier strategy.
#[derive(Debug, Clone)]
pub struct Estimator<C: Classifier = ThresholdHeuristicClassifier> {
    validator: SampleValidator,
    classifier: C,
}

impl Default for Estimator<ThresholdHeuristicClassifier> {
    fn default() -> Self {
        Self::new(ThresholdHeuristicClassifier::default())
    }
}

impl<C: Classifier> Estimator<C> {
    /// Estimator over the given classifier, with default validation
    /// bounds.
    pub fn new(classifier: C) -> Self {
        Self {
            validator: SampleValidator::default(),
            classifier,
        }
    }

    /// Replace the validator (e.g. recalibrated hardware bounds). The
    /// validator must match the one used at ingestion, or the two
    /// boundaries drift apart.
    pub fn with_validator(mut self, validator: SampleValidator) -> Self {
        self.validator = validator;
        self
    }

    /// The validation rules in effect.
    pub fn validator(&self) -> &SampleValidator {
        &self.validator
    }

    /// Validate a payload and predict its condition.
    ///
    /// Rejects exactly the payloads ingestion rejects, with the same
    /// typed errors.
    pub fn estimate(
        &self,
        payload: &SamplePayload,
        labels: &LabelSet,
        rng: &mut dyn RandomSource,
    ) -> ValidationResult<PredictionResult> {
        let (sample, _report) = self.validator.accept(payload)?;
        let features = FeatureVector::from_sample(&sample);
        Ok(self.estimate_features(&features, labels, rng))
    }

    /// Predict from an already-derived feature vector.
    ///
    /// This is the session-aggregation entry point: means produced by a
    /// [`SessionWindow`](breathguard_core::features::SessionWindow) go
    /// through the same classification and synthesis as single samples.
    pub fn estimate_features(
        &self,
        features: &FeatureVector,
        labels: &LabelSet,
        rng: &mut dyn RandomSource,
    ) -> PredictionResult {
        let classification = self.classifier.classify(features, labels, rng);
        let scores = synthesize_scores(classification.label_index, classification.confidence, labels, rng);
        let contributions = draw_contributions(rng);

        // Classifier contract: the index lies within the set. Fall back
        // to the baseline entry rather than panic if an implementation
        // breaks it.
        let condition = labels
            .get(classification.label_index)
            .unwrap_or_else(|| labels.role_label(crate::labels::ClassRole::Baseline));

        PredictionResult {
            condition,
            confidence: classification.confidence,
            scores,
            contributions,
        }
    }
}

/// Partition residual mass over non-candidate labels, then normalize.
fn synthesize_scores(
    candidate: usize,
    confidence: f32,
    labels: &LabelSet,
    rng: &mut dyn RandomSource,
) -> ProbabilityScores {
    let mut entries: Vec<(Label, f32), MAX_LABELS> = Vec::new();
    let mut remaining = 1.0 - confidence;

    for (index, label) in labels.iter().enumerate() {
        let mass = if index == candidate {
            confidence
        } else {
            let share = rng.next_unit() * remaining;
            remaining -= share;
            share
        };
        // Label sets never exceed the entry capacity
        entries.push((*label, mass)).ok();
    }

    let total: f32 = entries.iter().map(|(_, m)| m).sum();
    for (_, mass) in entries.iter_mut() {
        *mass /= total;
    }

    ProbabilityScores { entries }
}

/// Independent uniform draws scaled by the per-input ceilings.
fn draw_contributions(rng: &mut dyn RandomSource) -> SensorContributions {
    let c = contributions::CEILINGS;
    SensorContributions {
        s0: rng.next_unit() * c[0],
        s1: rng.next_unit() * c[1],
        s2: rng.next_unit() * c[2],
        s3: rng.next_unit() * c[3],
        temp: rng.next_unit() * c[4],
        humidity: rng.next_unit() * c[5],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use breathguard_core::rng::SequenceRandom;

    fn payload(s0: f32, s1: f32, s2: f32, s3: f32) -> SamplePayload {
        SamplePayload {
            s0: Some(s0),
            s1: Some(s1),
            s2: Some(s2),
            s3: Some(s3),
            temperature_c: Some(35.0),
            humidity_pct: Some(80.0),
            sample_duration_s: None,
        }
    }

    #[test]
    fn scores_cover_full_label_set() {
        let estimator = Estimator::default();
        let labels = LabelSet::screening();
        let mut rng = SequenceRandom::new(&[0.5, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9]);

        let result = estimator
            .estimate(&payload(700.0, 0.0, 0.0, 0.0), &labels, &mut rng)
            .unwrap();

        assert_eq!(result.scores.len(), labels.len());
        for label in labels.iter() {
            assert!(result.scores.get(label).is_some());
        }
    }

    #[test]
    fn replayed_sequence_reproduces_prediction() {
        let estimator = Estimator::default();
        let labels = LabelSet::triage();
        let draws = [0.5, 0.4, 0.6, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6];

        let a = estimator
            .estimate(&payload(700.0, 0.0, 0.0, 0.0), &labels, &mut SequenceRandom::new(&draws))
            .unwrap();
        let b = estimator
            .estimate(&payload(700.0, 0.0, 0.0, 0.0), &labels, &mut SequenceRandom::new(&draws))
            .unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn exact_synthesis_against_hand_computation() {
        // Triage set, metabolic candidate at index 1.
        // Draws: confidence u=0.5 -> 0.75 + 0.5*0.20 = 0.85
        //        healthy share  u=0.4 -> 0.4 * 0.15   = 0.06, remaining 0.09
        //        copd share     u=0.6 -> 0.6 * 0.09   = 0.054
        // total = 0.06 + 0.85 + 0.054 = 0.964
        let estimator = Estimator::default();
        let labels = LabelSet::triage();
        let draws = [0.5, 0.4, 0.6, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let result = estimator
            .estimate(&payload(700.0, 0.0, 0.0, 0.0), &labels, &mut SequenceRandom::new(&draws))
            .unwrap();

        assert_eq!(result.condition.as_str(), "diabetes");
        assert!((result.confidence - 0.85).abs() < 1e-6);

        let healthy = result.scores.get(&Label::new("healthy").unwrap()).unwrap();
        let diabetes = result.scores.get(&Label::new("diabetes").unwrap()).unwrap();
        let copd = result.scores.get(&Label::new("copd").unwrap()).unwrap();

        assert!((healthy - 0.06 / 0.964).abs() < 1e-6);
        assert!((diabetes - 0.85 / 0.964).abs() < 1e-6);
        assert!((copd - 0.054 / 0.964).abs() < 1e-6);
        assert!((result.scores.total() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn confidence_is_pre_normalization_value() {
        let estimator = Estimator::default();
        let labels = LabelSet::triage();
        // Non-zero residual shares guarantee total < 1 pre-normalization
        let draws = [0.5, 0.4, 0.6, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let result = estimator
            .estimate(&payload(700.0, 0.0, 0.0, 0.0), &labels, &mut SequenceRandom::new(&draws))
            .unwrap();

        let reported = result.scores.get(&result.condition).unwrap();
        // The preserved quirk: normalized score differs from confidence
        assert!((result.confidence - 0.85).abs() < 1e-6);
        assert!(reported > result.confidence);
    }

    #[test]
    fn contributions_respect_ceilings() {
        let estimator = Estimator::default();
        let labels = LabelSet::screening();
        let mut rng = SequenceRandom::new(&[0.999]);

        let result = estimator
            .estimate(&payload(0.0, 0.0, 0.0, 0.0), &labels, &mut rng)
            .unwrap();

        let weights = result.contributions.as_array();
        for (weight, ceiling) in weights.into_iter().zip(contributions::CEILINGS) {
            assert!(weight >= 0.0);
            assert!(weight <= ceiling);
        }
    }

    #[test]
    fn estimate_rejects_like_ingestion() {
        let estimator = Estimator::default();
        let labels = LabelSet::screening();
        let mut rng = SequenceRandom::new(&[0.5]);

        let bad = payload(2000.0, 0.0, 0.0, 0.0);
        let estimator_err = estimator.estimate(&bad, &labels, &mut rng).unwrap_err();
        let validator_err = estimator.validator().validate(&bad).unwrap_err();

        assert_eq!(estimator_err, validator_err);
    }

    #[test]
    fn single_label_set_collapses_to_certainty() {
        use crate::labels::ClassRoles;

        let estimator = Estimator::default();
        let labels = LabelSet::new(
            &["healthy"],
            ClassRoles {
                baseline: 0,
                metabolic: 0,
                respiratory: 0,
            },
        )
        .unwrap();
        let mut rng = SequenceRandom::new(&[0.5]);

        let result = estimator
            .estimate(&payload(0.0, 0.0, 0.0, 0.0), &labels, &mut rng)
            .unwrap();

        assert_eq!(result.scores.len(), 1);
        let score = result.scores.get(&result.condition).unwrap();
        assert!((score - 1.0).abs() < 1e-6);
        // Confidence keeps the drawn band value, not the normalized 1.0
        assert!((result.confidence - 0.75).abs() < 1e-6);
    }
}
