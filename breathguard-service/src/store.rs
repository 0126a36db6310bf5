//! Persistence Capability
//!
//! ## Boundary
//!
//! Durable storage belongs to the embedding platform; this crate only
//! defines the capability it must provide. The cores never call the
//! store — the handlers do, strictly *after* validation has accepted a
//! sample, so a store implementation never sees rejected data.
//!
//! ## Session collections
//!
//! A screening session may be registered as a *collection* with a
//! sample target. Each accepted reading for a registered collection
//! advances [`SessionProgress`]: the sample count, a clamped percent,
//! and a `Completed` status once the target is reached. Readings for
//! unregistered sessions are stored but tracked by no collection —
//! registration is the orchestrator's decision, not ingestion's.
//!
//! [`MemoryStore`] is the reference implementation used by the test
//! suites and by embedders that do not need durability.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use breathguard_core::{AnomalyReport, RawSample};
use breathguard_ml::PredictionResult;

/// Persistence failure reported by a store implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("store operation failed: {reason}")]
pub struct StoreError {
    /// Implementation-specific failure description.
    pub reason: String,
}

impl StoreError {
    /// Failure with the given description.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// One accepted reading, as handed to the store.
#[derive(Debug, Clone, Copy)]
pub struct NewReading<'a> {
    /// Owning patient (pre-authorized upstream).
    pub patient_id: &'a str,
    /// Owning session.
    pub session_id: &'a str,
    /// The validated sample.
    pub sample: &'a RawSample,
    /// Anomaly flags and quality at acceptance time.
    pub report: &'a AnomalyReport,
    /// Handler-assigned acceptance instant.
    pub recorded_at: DateTime<Utc>,
}

/// Store receipt for an accepted reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredReading {
    /// Store-assigned reading id.
    pub id: u64,
    /// Instant the reading was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// One prediction, as handed to the store.
#[derive(Debug, Clone, Copy)]
pub struct NewPrediction<'a> {
    /// Owning patient.
    pub patient_id: &'a str,
    /// The stored reading this prediction was computed from.
    pub reading_id: u64,
    /// The estimator output.
    pub result: &'a PredictionResult,
    /// Handler-assigned instant.
    pub recorded_at: DateTime<Utc>,
}

/// Collection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    /// Still gathering samples.
    Active,
    /// Sample target reached.
    Completed,
}

/// Progress of one registered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    /// Accepted samples counted so far.
    pub samples_collected: u32,
    /// Percent of the target, clamped to 100.
    pub percent_complete: u8,
    /// Lifecycle state.
    pub status: CollectionStatus,
    /// Instant the target was reached, once it was.
    pub completed_at: Option<DateTime<Utc>>,
}

impl SessionProgress {
    /// Fresh, empty progress.
    pub fn new() -> Self {
        Self {
            samples_collected: 0,
            percent_complete: 0,
            status: CollectionStatus::Active,
            completed_at: None,
        }
    }

    /// Count one accepted sample against the target.
    ///
    /// Percent is `min(100, floor(collected / target * 100))`; reaching
    /// 100 flips the status to `Completed` and stamps `completed_at`.
    /// Counting continues past the target without un-completing.
    pub fn advance(&mut self, target: u32, now: DateTime<Utc>) {
        let target = target.max(1);
        self.samples_collected += 1;

        let percent = (self.samples_collected as u64 * 100 / target as u64).min(100) as u8;
        self.percent_complete = percent;

        if percent >= 100 && self.status != CollectionStatus::Completed {
            self.status = CollectionStatus::Completed;
            self.completed_at = Some(now);
        }
    }
}

impl Default for SessionProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Capability interface the embedding platform implements.
pub trait ReadingStore {
    /// Durably record one accepted reading.
    fn record_reading(&mut self, reading: NewReading<'_>) -> Result<StoredReading, StoreError>;

    /// Durably record one prediction.
    fn record_prediction(&mut self, prediction: NewPrediction<'_>) -> Result<u64, StoreError>;

    /// Progress of a registered collection, if one exists for the
    /// patient/session pair.
    fn session_progress(
        &self,
        patient_id: &str,
        session_id: &str,
    ) -> Result<Option<SessionProgress>, StoreError>;

    /// Replace a registered collection's progress.
    fn update_session_progress(
        &mut self,
        patient_id: &str,
        session_id: &str,
        progress: &SessionProgress,
    ) -> Result<(), StoreError>;
}

/// Reading as retained by [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct ReadingRecord {
    /// Store-assigned id.
    pub id: u64,
    /// Owning patient.
    pub patient_id: String,
    /// Owning session.
    pub session_id: String,
    /// The validated sample.
    pub sample: RawSample,
    /// Anomaly report at acceptance.
    pub report: AnomalyReport,
    /// Acceptance instant.
    pub recorded_at: DateTime<Utc>,
}

/// Prediction as retained by [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct PredictionRecord {
    /// Store-assigned id.
    pub id: u64,
    /// Owning patient.
    pub patient_id: String,
    /// Source reading id.
    pub reading_id: u64,
    /// The estimator output.
    pub result: PredictionResult,
    /// Recording instant.
    pub recorded_at: DateTime<Utc>,
}

/// In-memory reference store.
///
/// Sequential ids, no durability. Suitable for tests and for embedders
/// that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    readings: Vec<ReadingRecord>,
    predictions: Vec<PredictionRecord>,
    collections: HashMap<(String, String), SessionProgress>,
    next_id: u64,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collection so ingestion starts counting its samples.
    pub fn register_collection(&mut self, patient_id: &str, session_id: &str) {
        self.collections.insert(
            (patient_id.to_string(), session_id.to_string()),
            SessionProgress::new(),
        );
    }

    /// All retained readings, in insertion order.
    pub fn readings(&self) -> &[ReadingRecord] {
        &self.readings
    }

    /// All retained predictions, in insertion order.
    pub fn predictions(&self) -> &[PredictionRecord] {
        &self.predictions
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl ReadingStore for MemoryStore {
    fn record_reading(&mut self, reading: NewReading<'_>) -> Result<StoredReading, StoreError> {
        let id = self.allocate_id();
        self.readings.push(ReadingRecord {
            id,
            patient_id: reading.patient_id.to_string(),
            session_id: reading.session_id.to_string(),
            sample: *reading.sample,
            report: *reading.report,
            recorded_at: reading.recorded_at,
        });
        Ok(StoredReading {
            id,
            recorded_at: reading.recorded_at,
        })
    }

    fn record_prediction(&mut self, prediction: NewPrediction<'_>) -> Result<u64, StoreError> {
        let id = self.allocate_id();
        self.predictions.push(PredictionRecord {
            id,
            patient_id: prediction.patient_id.to_string(),
            reading_id: prediction.reading_id,
            result: prediction.result.clone(),
            recorded_at: prediction.recorded_at,
        });
        Ok(id)
    }

    fn session_progress(
        &self,
        patient_id: &str,
        session_id: &str,
    ) -> Result<Option<SessionProgress>, StoreError> {
        Ok(self
            .collections
            .get(&(patient_id.to_string(), session_id.to_string()))
            .copied())
    }

    fn update_session_progress(
        &mut self,
        patient_id: &str,
        session_id: &str,
        progress: &SessionProgress,
    ) -> Result<(), StoreError> {
        self.collections.insert(
            (patient_id.to_string(), session_id.to_string()),
            *progress,
        );
        Ok(())
    }
}
