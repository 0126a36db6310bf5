//! Wire Messages
//!
//! Serde DTOs for the two operations. Field names (camelCase) are the
//! platform's existing JSON contract; the embedded sample object is
//! [`SamplePayload`] itself, whose serde renames already produce the
//! device keys (`s0..s3`, `temp`, `humidity`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use breathguard_core::{DataQuality, SamplePayload};
use breathguard_ml::{Label, ProbabilityScores, SensorContributions};

/// One sample submission for a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestRequest {
    /// Owning patient; authorization is resolved upstream.
    pub patient_id: String,
    /// Session the sample belongs to.
    pub session_id: String,
    /// The raw measurement.
    pub sensor_data: SamplePayload,
    /// Capture window length in seconds; overrides nothing if the
    /// sample object already carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_duration_seconds: Option<f32>,
}

/// Outcome of an accepted submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    /// Always true on the success path; rejections are errors.
    pub accepted: bool,
    /// Store-assigned reading id.
    pub reading_id: u64,
    /// Acceptance instant.
    pub timestamp: DateTime<Utc>,
    /// Human-readable anomaly descriptions, or `null` when nominal.
    pub anomalies: Option<Vec<String>>,
    /// Narrow-range quality assessment.
    pub data_quality: DataQuality,
}

/// One prediction request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    /// Owning patient; authorization is resolved upstream.
    pub patient_id: String,
    /// The raw measurement to classify.
    pub sensor_data: SamplePayload,
    /// Condition classes to score. Must contain the conventional
    /// healthy/diabetes/copd entries; omitted entirely, the screening
    /// panel is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

/// One prediction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    /// Predicted condition label.
    pub condition: Label,
    /// Pre-normalization confidence; see `breathguard-ml` for the
    /// relationship to `probabilityScores`.
    pub confidence: f32,
    /// Normalized per-label probabilities.
    pub probability_scores: ProbabilityScores,
    /// Relative input-influence weights.
    pub sensor_contributions: SensorContributions,
    /// Prediction instant.
    pub timestamp: DateTime<Utc>,
}
