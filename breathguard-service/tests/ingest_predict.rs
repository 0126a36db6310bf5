//! Integration tests for the service boundary
//!
//! End-to-end ingest and predict flows against the in-memory store,
//! session-progress accounting, error-class mapping, and the camelCase
//! wire contract.

use breathguard_core::{SamplePayload, SeededRandom};
use breathguard_service::{
    CollectionStatus, ErrorClass, FixedClock, IngestRequest, IngestService, MemoryStore,
    PredictRequest, PredictService, ReadingStore, ServiceError,
};
use chrono::{TimeZone, Utc};

fn fixed_clock() -> Box<FixedClock> {
    Box::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    ))
}

fn sensor_data() -> SamplePayload {
    SamplePayload {
        s0: Some(120.0),
        s1: Some(98.0),
        s2: Some(233.0),
        s3: Some(310.0),
        temperature_c: Some(34.5),
        humidity_pct: Some(88.0),
        sample_duration_s: None,
    }
}

fn ingest_request() -> IngestRequest {
    IngestRequest {
        patient_id: "patient-1".into(),
        session_id: "session-1".into(),
        sensor_data: sensor_data(),
        sample_duration_seconds: None,
    }
}

#[test]
fn clean_ingest_records_and_responds() {
    let mut service = IngestService::new(MemoryStore::new()).with_clock(fixed_clock());

    let response = service.ingest(&ingest_request()).unwrap();

    assert!(response.accepted);
    assert_eq!(response.reading_id, 1);
    assert_eq!(response.anomalies, None);
    assert!(response.data_quality.is_clean());

    let readings = service.store().readings();
    assert_eq!(readings.len(), 1);
    assert_eq!(readings[0].patient_id, "patient-1");
    assert_eq!(readings[0].sample.sample_duration_s, 5.0);
}

#[test]
fn anomalous_ingest_lists_descriptions() {
    let mut service = IngestService::new(MemoryStore::new()).with_clock(fixed_clock());
    let mut request = ingest_request();
    request.sensor_data.s0 = Some(950.0);
    request.sensor_data.temperature_c = Some(45.0);

    let response = service.ingest(&request).unwrap();

    assert_eq!(
        response.anomalies,
        Some(vec![
            "High sensor reading detected".to_string(),
            "Unusual breath temperature".to_string(),
        ])
    );
    assert!(!response.data_quality.temperature_range);
}

#[test]
fn rejected_ingest_is_client_class_and_stores_nothing() {
    let mut service = IngestService::new(MemoryStore::new()).with_clock(fixed_clock());
    let mut request = ingest_request();
    request.sensor_data.humidity_pct = Some(140.0);

    let err = service.ingest(&request).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Client);
    assert_eq!(err.http_status(), 400);
    assert!(service.store().readings().is_empty());
}

#[test]
fn registered_collection_progresses_to_completion() {
    let mut service = IngestService::new(MemoryStore::new())
        .with_clock(fixed_clock())
        .with_samples_target(3);
    service
        .store_mut()
        .register_collection("patient-1", "session-1");

    for expected_percent in [33u8, 66, 100] {
        service.ingest(&ingest_request()).unwrap();
        let progress = service
            .store()
            .session_progress("patient-1", "session-1")
            .unwrap()
            .unwrap();
        assert_eq!(progress.percent_complete, expected_percent);
    }

    let progress = service
        .store()
        .session_progress("patient-1", "session-1")
        .unwrap()
        .unwrap();
    assert_eq!(progress.status, CollectionStatus::Completed);
    assert_eq!(progress.samples_collected, 3);
    assert!(progress.completed_at.is_some());
}

#[test]
fn unregistered_session_stores_without_accounting() {
    let mut service = IngestService::new(MemoryStore::new()).with_clock(fixed_clock());

    service.ingest(&ingest_request()).unwrap();

    assert_eq!(service.store().readings().len(), 1);
    assert_eq!(
        service
            .store()
            .session_progress("patient-1", "session-1")
            .unwrap(),
        None
    );
}

#[test]
fn predict_records_reading_and_prediction() {
    let mut service = PredictService::new(MemoryStore::new())
        .with_clock(fixed_clock())
        .with_rng(Box::new(SeededRandom::new(5)));
    let mut request = PredictRequest {
        patient_id: "patient-1".into(),
        sensor_data: sensor_data(),
        labels: None,
    };
    request.sensor_data.s0 = Some(700.0);

    let response = service.predict(&request).unwrap();

    assert_eq!(response.condition.as_str(), "diabetes");
    assert!(response.confidence >= 0.75 && response.confidence < 0.95);
    assert!((response.probability_scores.total() - 1.0).abs() < 1e-6);

    let store = service.store();
    assert_eq!(store.readings().len(), 1);
    assert_eq!(store.predictions().len(), 1);
    assert!(store.readings()[0].session_id.starts_with("prediction_"));
    assert_eq!(store.predictions()[0].reading_id, store.readings()[0].id);
}

#[test]
fn predict_with_custom_wire_labels() {
    let mut service = PredictService::new(MemoryStore::new())
        .with_clock(fixed_clock())
        .with_rng(Box::new(SeededRandom::new(5)));
    let request = PredictRequest {
        patient_id: "patient-1".into(),
        sensor_data: sensor_data(),
        labels: Some(vec![
            "healthy".into(),
            "diabetes".into(),
            "copd".into(),
        ]),
    };

    let response = service.predict(&request).unwrap();
    assert_eq!(response.probability_scores.len(), 3);
}

#[test]
fn predict_rejects_role_less_label_list() {
    let mut service = PredictService::new(MemoryStore::new())
        .with_clock(fixed_clock())
        .with_rng(Box::new(SeededRandom::new(5)));
    let request = PredictRequest {
        patient_id: "patient-1".into(),
        sensor_data: sensor_data(),
        labels: Some(vec!["healthy".into(), "flu".into()]),
    };

    let err = service.predict(&request).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidLabelSet(_)));
    assert_eq!(err.class(), ErrorClass::Client);
    assert!(service.store().readings().is_empty());
}

#[test]
fn ingest_request_wire_shape() {
    let json = r#"{
        "patientId": "patient-1",
        "sessionId": "session-1",
        "sensorData": {"s0": 120.0, "s1": 98.0, "s2": 233.0, "s3": 310.0, "temp": 34.5, "humidity": 88.0},
        "sampleDurationSeconds": 8.0
    }"#;

    let request: IngestRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.patient_id, "patient-1");
    assert_eq!(request.sensor_data.s0, Some(120.0));
    assert_eq!(request.sensor_data.temperature_c, Some(34.5));
    assert_eq!(request.sample_duration_seconds, Some(8.0));
}

#[test]
fn missing_wire_keys_become_missing_fields() {
    let json = r#"{
        "patientId": "patient-1",
        "sessionId": "session-1",
        "sensorData": {"s0": 120.0, "temp": 34.5}
    }"#;

    let request: IngestRequest = serde_json::from_str(json).unwrap();
    let mut service = IngestService::new(MemoryStore::new()).with_clock(fixed_clock());

    let err = service.ingest(&request).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid sample: missing required sensor fields: s1, s2, s3, humidity"
    );
}

#[test]
fn responses_serialize_with_camel_case_keys() {
    let mut service = IngestService::new(MemoryStore::new()).with_clock(fixed_clock());
    let mut request = ingest_request();
    request.sensor_data.s0 = Some(950.0);

    let response = service.ingest(&request).unwrap();
    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["accepted"], true);
    assert_eq!(value["readingId"], 1);
    assert_eq!(value["dataQuality"]["sensorRange"], true);
    assert_eq!(value["dataQuality"]["temperatureRange"], true);
    assert_eq!(value["anomalies"][0], "High sensor reading detected");

    let mut predictor = PredictService::new(MemoryStore::new())
        .with_clock(fixed_clock())
        .with_rng(Box::new(SeededRandom::new(5)));
    let mut predict_request = PredictRequest {
        patient_id: "patient-1".into(),
        sensor_data: sensor_data(),
        labels: None,
    };
    predict_request.sensor_data.s2 = Some(450.0);

    let response = predictor.predict(&predict_request).unwrap();
    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["condition"], "copd");
    assert!(value["probabilityScores"]["kidney_disease"].is_number());
    assert!(value["sensorContributions"]["s0"].is_number());
    assert!(value["confidence"].is_number());
}
