//! Scores requests against the artifacts shipped in the repository root.

use std::path::PathBuf;

use artifacts::ScoringArtifacts;
use features::{FeatureEncoder, Predictor, RawRequest};

fn repo_artifacts() -> ScoringArtifacts {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../artifacts");
    ScoringArtifacts::load(&root.join("columns.json"), &root.join("model.json"))
        .expect("shipped artifacts load")
}

fn request(year: i64, running_km: f64, model: &str, status: &str) -> RawRequest {
    RawRequest {
        year,
        motor_volume: 2.0,
        running_km,
        model: model.to_string(),
        motor_type: "petrol".to_string(),
        wheel: "left".to_string(),
        color: "black".to_string(),
        car_type: "sedan".to_string(),
        status: status.to_string(),
    }
}

#[test]
fn test_shipped_artifacts_agree_on_width() {
    let artifacts = repo_artifacts();
    assert_eq!(artifacts.schema().len(), artifacts.model().width());
    assert!(artifacts.schema().contains("is_luxury"));
}

#[test]
fn test_shipped_model_scores_sample_car() {
    let artifacts = repo_artifacts();
    let encoder = FeatureEncoder::new(artifacts.shared_schema());

    let vector = encoder.encode(&request(2020, 50000.0, "bmw", "excellent"));
    let price = artifacts.predict(&vector).unwrap();

    // (19800 + 12600 + 26700) / 3
    assert!((price - 19700.0).abs() < 1e-6, "got {}", price);
}

#[test]
fn test_shipped_model_prices_crashed_older_cars_lower() {
    let artifacts = repo_artifacts();
    let encoder = FeatureEncoder::new(artifacts.shared_schema());

    let newer = encoder.encode(&request(2020, 50000.0, "toyota", "good"));
    let older = encoder.encode(&request(2010, 210000.0, "toyota", "crashed"));

    let newer_price = artifacts.predict(&newer).unwrap();
    let older_price = artifacts.predict(&older).unwrap();
    assert!(older_price < newer_price);
}
