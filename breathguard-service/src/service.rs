//! Ingest and Predict Handlers
//!
//! Stateless orchestration over the cores and the capability
//! interfaces. Each handler call is independent; the only mutation is
//! through the store the embedder supplied. Order of operations matches
//! the platform contract: validate first, record only on acceptance,
//! then account progress — a store implementation never sees data the
//! validator rejected.

use log::{debug, info, warn};

use breathguard_core::{
    rng::{EntropyRandom, RandomSource},
    FeatureVector, SamplePayload, SampleValidator,
};
use breathguard_ml::{Classifier, Estimator, LabelSet, ThresholdHeuristicClassifier};

use crate::{
    clock::{Clock, SystemClock},
    error::ServiceError,
    messages::{IngestRequest, IngestResponse, PredictRequest, PredictResponse},
    store::{NewPrediction, NewReading, ReadingStore},
};

/// Samples a registered collection aims for before completing.
pub const DEFAULT_SAMPLES_TARGET: u32 = 100;

/// Handler for the ingest operation.
///
/// Assumes `patient_id`/`session_id` arrive pre-authorized; identity
/// resolution is the platform's collaborator, not this crate's.
pub struct IngestService<S: ReadingStore> {
    validator: SampleValidator,
    store: S,
    clock: Box<dyn Clock>,
    samples_target: u32,
}

impl<S: ReadingStore> IngestService<S> {
    /// Handler over the given store, with default validation bounds and
    /// the system clock.
    pub fn new(store: S) -> Self {
        Self {
            validator: SampleValidator::default(),
            store,
            clock: Box::new(SystemClock),
            samples_target: DEFAULT_SAMPLES_TARGET,
        }
    }

    /// Replace the validator (recalibrated hardware bounds).
    pub fn with_validator(mut self, validator: SampleValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Replace the clock (tests).
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Override the collection sample target.
    pub fn with_samples_target(mut self, target: u32) -> Self {
        self.samples_target = target;
        self
    }

    /// The store behind this handler.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the store (collection registration).
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Validate and record one sample submission.
    pub fn ingest(&mut self, request: &IngestRequest) -> Result<IngestResponse, ServiceError> {
        let mut payload = request.sensor_data;
        if payload.sample_duration_s.is_none() {
            payload.sample_duration_s = request.sample_duration_seconds;
        }

        let (sample, report) = self.validator.accept(&payload).map_err(|e| {
            debug!(
                "rejected sample for patient {} session {}: {e}",
                request.patient_id, request.session_id
            );
            e
        })?;

        if !report.is_nominal() {
            warn!(
                "anomalous sample for patient {} session {}: {}",
                request.patient_id, request.session_id, report.flags
            );
        }

        let now = self.clock.now();
        let stored = self.store.record_reading(NewReading {
            patient_id: &request.patient_id,
            session_id: &request.session_id,
            sample: &sample,
            report: &report,
            recorded_at: now,
        })?;

        // Progress only advances for collections the orchestrator has
        // registered; stray sessions are stored without accounting.
        if let Some(mut progress) = self
            .store
            .session_progress(&request.patient_id, &request.session_id)?
        {
            progress.advance(self.samples_target, now);
            self.store
                .update_session_progress(&request.patient_id, &request.session_id, &progress)?;
            info!(
                "session {} at {}% ({} samples)",
                request.session_id, progress.percent_complete, progress.samples_collected
            );
        }

        let anomalies = if report.flags.is_empty() {
            None
        } else {
            Some(
                report
                    .flags
                    .iter()
                    .map(|flag| flag.description().to_string())
                    .collect(),
            )
        };

        Ok(IngestResponse {
            accepted: true,
            reading_id: stored.id,
            timestamp: stored.recorded_at,
            anomalies,
            data_quality: report.quality,
        })
    }
}

/// Handler for the predict operation.
pub struct PredictService<S: ReadingStore, C: Classifier = ThresholdHeuristicClassifier> {
    estimator: Estimator<C>,
    store: S,
    clock: Box<dyn Clock>,
    rng: Box<dyn RandomSource>,
}

impl<S: ReadingStore> PredictService<S> {
    /// Handler over the given store with the shipped threshold
    /// heuristic, entropy-seeded randomness and the system clock.
    pub fn new(store: S) -> Self {
        Self {
            estimator: Estimator::default(),
            store,
            clock: Box::new(SystemClock),
            rng: Box::new(EntropyRandom::new()),
        }
    }
}

impl<S: ReadingStore, C: Classifier> PredictService<S, C> {
    /// Swap the classifier strategy (e.g. a trained model).
    pub fn with_classifier<C2: Classifier>(self, classifier: C2) -> PredictService<S, C2> {
        PredictService {
            estimator: Estimator::new(classifier).with_validator(self.estimator.validator().clone()),
            store: self.store,
            clock: self.clock,
            rng: self.rng,
        }
    }

    /// Replace the estimator wholesale.
    pub fn with_estimator(mut self, estimator: Estimator<C>) -> Self {
        self.estimator = estimator;
        self
    }

    /// Replace the clock (tests).
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the random source (deterministic runs).
    pub fn with_rng(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    /// The store behind this handler.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate one sample, predict its condition, record both.
    pub fn predict(&mut self, request: &PredictRequest) -> Result<PredictResponse, ServiceError> {
        let labels = match &request.labels {
            Some(names) => {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                LabelSet::from_names(&names)?
            }
            None => LabelSet::default(),
        };

        let payload: SamplePayload = request.sensor_data;
        let (sample, report) = self.estimator.validator().accept(&payload)?;
        let features = FeatureVector::from_sample(&sample);
        let result = self
            .estimator
            .estimate_features(&features, &labels, self.rng.as_mut());

        let now = self.clock.now();
        // Ad-hoc predictions get a synthetic session of their own
        let session_id = format!("prediction_{}", now.timestamp_millis());
        let stored = self.store.record_reading(NewReading {
            patient_id: &request.patient_id,
            session_id: &session_id,
            sample: &sample,
            report: &report,
            recorded_at: now,
        })?;
        self.store.record_prediction(NewPrediction {
            patient_id: &request.patient_id,
            reading_id: stored.id,
            result: &result,
            recorded_at: now,
        })?;

        info!(
            "predicted {} at {:.2} for patient {}",
            result.condition, result.confidence, request.patient_id
        );

        Ok(PredictResponse {
            condition: result.condition,
            confidence: result.confidence,
            probability_scores: result.scores,
            sensor_contributions: result.contributions,
            timestamp: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::store::MemoryStore;
    use breathguard_core::SequenceRandom;
    use chrono::TimeZone;

    fn fixed_clock() -> Box<dyn Clock> {
        Box::new(FixedClock::new(
            chrono::Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        ))
    }

    fn sensor_data() -> SamplePayload {
        SamplePayload {
            s0: Some(700.0),
            s1: Some(10.0),
            s2: Some(10.0),
            s3: Some(10.0),
            temperature_c: Some(35.0),
            humidity_pct: Some(80.0),
            sample_duration_s: None,
        }
    }

    #[test]
    fn request_duration_fills_absent_payload_duration() {
        let mut service = IngestService::new(MemoryStore::new()).with_clock(fixed_clock());
        let request = IngestRequest {
            patient_id: "p1".into(),
            session_id: "s1".into(),
            sensor_data: sensor_data(),
            sample_duration_seconds: Some(8.0),
        };

        service.ingest(&request).unwrap();
        assert_eq!(service.store().readings()[0].sample.sample_duration_s, 8.0);
    }

    #[test]
    fn predict_uses_injected_rng_deterministically() {
        let mut service = PredictService::new(MemoryStore::new())
            .with_clock(fixed_clock())
            .with_rng(Box::new(breathguard_core::SeededRandom::new(11)));
        let request = PredictRequest {
            patient_id: "p1".into(),
            sensor_data: sensor_data(),
            labels: None,
        };
        let first = service.predict(&request).unwrap();

        let mut service = PredictService::new(MemoryStore::new())
            .with_clock(fixed_clock())
            .with_rng(Box::new(breathguard_core::SeededRandom::new(11)));
        let second = service.predict(&request).unwrap();

        assert_eq!(first.condition, second.condition);
        assert_eq!(first.confidence, second.confidence);
    }

    #[test]
    fn sequence_rng_is_usable_through_the_handler() {
        static DRAWS: [f32; 12] = [0.5, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 0.0, 0.1];
        let mut service = PredictService::new(MemoryStore::new())
            .with_clock(fixed_clock())
            .with_rng(Box::new(SequenceRandom::new(&DRAWS)));

        let response = service
            .predict(&PredictRequest {
                patient_id: "p1".into(),
                sensor_data: sensor_data(),
                labels: None,
            })
            .unwrap();

        // Metabolic branch with u = 0.5
        assert_eq!(response.condition.as_str(), "diabetes");
        assert!((response.confidence - 0.85).abs() < 1e-6);
    }
}
