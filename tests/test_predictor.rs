use demand_forecast::error::ForecastError;
use demand_forecast::features::{feature_index, FEATURE_ORDER, FEATURE_SCHEMA_VERSION};
use demand_forecast::predictor::{
    DemandPredictor, LinearPredictor, ModelArtifact, SeasonalBaseline,
};

fn artifact(schema_version: u32, weight_count: usize) -> ModelArtifact {
    ModelArtifact {
        name: "surrogate".to_string(),
        schema_version,
        intercept: 0.0,
        weights: vec![0.0; weight_count],
        r_squared: None,
        rmse: None,
    }
}

/// Zero vector with a few named features set
fn vector(named: &[(&str, f64)]) -> Vec<f64> {
    let mut x = vec![0.0; FEATURE_ORDER.len()];
    for (name, value) in named {
        x[feature_index(name).unwrap()] = *value;
    }
    x
}

#[test]
fn test_stale_schema_version_is_rejected_at_load() {
    let result = LinearPredictor::new(artifact(FEATURE_SCHEMA_VERSION + 1, FEATURE_ORDER.len()));
    assert!(matches!(result, Err(ForecastError::SchemaMismatch(_))));
}

#[test]
fn test_wrong_weight_count_is_rejected_at_load() {
    let result = LinearPredictor::new(artifact(FEATURE_SCHEMA_VERSION, FEATURE_ORDER.len() - 1));
    assert!(matches!(result, Err(ForecastError::SchemaMismatch(_))));
}

#[test]
fn test_wrong_vector_length_is_rejected_at_predict() {
    let predictor =
        LinearPredictor::new(artifact(FEATURE_SCHEMA_VERSION, FEATURE_ORDER.len())).unwrap();

    let result = predictor.predict(&[0.0; 5]);
    assert!(matches!(result, Err(ForecastError::SchemaMismatch(_))));
}

#[test]
fn test_unknown_named_weight_is_rejected() {
    let result = LinearPredictor::from_named_weights("bad", 0.0, &[("no_such_feature", 1.0)]);
    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
}

#[test]
fn test_artifact_round_trips_through_json() {
    let json = serde_json::json!({
        "name": "surrogate",
        "schema_version": FEATURE_SCHEMA_VERSION,
        "intercept": 100.0,
        "weights": vec![0.0; FEATURE_ORDER.len()],
        "r_squared": 0.42
    })
    .to_string();

    let predictor = LinearPredictor::from_json(&json).unwrap();

    assert_eq!(predictor.name(), "surrogate");
    assert_eq!(predictor.r_squared(), Some(0.42));
    assert_eq!(predictor.rmse(), None);
    let prediction = predictor.predict(&vec![0.0; FEATURE_ORDER.len()]).unwrap();
    assert_eq!(prediction, 100.0);
}

#[test]
fn test_linear_predict_is_the_weighted_sum() {
    let predictor = LinearPredictor::from_named_weights(
        "linear",
        50.0,
        &[("temp_comfort", 2.0), ("demand_lag1", 0.5)],
    )
    .unwrap();

    let x = vector(&[("temp_comfort", 10.0), ("demand_lag1", 1000.0)]);
    let prediction = predictor.predict(&x).unwrap();

    assert!((prediction - (50.0 + 20.0 + 500.0)).abs() < 1e-12);
}

#[test]
fn test_baseline_blends_lags_and_applies_multipliers() {
    let baseline = SeasonalBaseline::new();

    let weekday = vector(&[
        ("demand_lag1", 1000.0),
        ("demand_lag7", 500.0),
        ("temp_comfort", 15.0),
    ]);
    let base = baseline.predict(&weekday).unwrap();
    assert!((base - 800.0).abs() < 1e-9);

    let weekend = vector(&[
        ("demand_lag1", 1000.0),
        ("demand_lag7", 500.0),
        ("temp_comfort", 15.0),
        ("is_weekend", 1.0),
    ]);
    let lifted = baseline.predict(&weekend).unwrap();
    assert!((lifted - 800.0 * 1.12).abs() < 1e-9);

    let rainy = vector(&[
        ("demand_lag1", 1000.0),
        ("demand_lag7", 500.0),
        ("temp_comfort", 15.0),
        ("precipitation", 6.0),
    ]);
    let rain_lifted = baseline.predict(&rainy).unwrap();
    assert!((rain_lifted - 800.0 * 1.08).abs() < 1e-9);

    let short = baseline.predict(&[0.0; 5]);
    assert!(matches!(short, Err(ForecastError::SchemaMismatch(_))));
}
