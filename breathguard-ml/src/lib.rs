//! Condition Classification for BreathGuard
//!
//! ## Overview
//!
//! This crate turns a validated breath sample's feature vector into a
//! condition label, a confidence, a normalized per-class probability
//! distribution, and per-channel contribution weights.
//!
//! The classification itself sits behind the [`Classifier`] trait. The
//! shipped implementation, [`ThresholdHeuristicClassifier`], is an
//! explicit placeholder: deterministic channel thresholds pick the
//! label and a per-branch confidence band supplies the score. When a
//! trained model replaces it, only the trait implementation changes —
//! the validation rules, the estimator contract, and every consumer
//! stay untouched.
//!
//! ## Randomness
//!
//! Confidence draws, probability-mass partitioning, and contribution
//! weights all flow through the caller-supplied
//! [`RandomSource`](breathguard_core::rng::RandomSource). The
//! estimator's draw order is fixed and documented, so a replayed
//! sequence reproduces a prediction bit for bit.
//!
//! ## Known contract quirk
//!
//! The reported `confidence` is the classifier's pre-normalization
//! probability mass, while `scores` is normalized afterwards — so
//! `confidence` and `scores[condition]` usually differ slightly. This
//! mirrors the behavior of the service this crate replaces and is kept
//! deliberately; see [`estimator`] for details.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod classifier;
pub mod constants;
pub mod estimator;
pub mod labels;

// Public API
pub use classifier::{Classification, Classifier, ConfidenceBand, DecisionThresholds, ThresholdHeuristicClassifier};
pub use estimator::{Estimator, PredictionResult, ProbabilityScores, SensorContributions};
pub use labels::{ClassRole, ClassRoles, Label, LabelSet, LabelSetError, MAX_LABELS, MAX_LABEL_LEN};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
