use chrono::{Duration, NaiveDate};
use demand_forecast::error::{ForecastError, Result};
use demand_forecast::features::{build_feature_table, DemandSeed, FeatureRow};
use demand_forecast::forecaster::SequentialForecaster;
use demand_forecast::predictor::{DemandPredictor, LinearPredictor};
use demand_forecast::weather::AggregatedWeatherDay;
use pretty_assertions::assert_eq;
use std::cell::Cell;

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
}

fn table_14_7() -> (Vec<FeatureRow>, usize) {
    let weather = |i: usize| AggregatedWeatherDay {
        date: monday() + Duration::days(i as i64),
        temp_max: 20.0,
        temp_min: 10.0,
        precipitation: 0.0,
    };
    let historical: Vec<AggregatedWeatherDay> = (0..14).map(weather).collect();
    let forecast: Vec<AggregatedWeatherDay> = (14..21).map(weather).collect();
    let seed = DemandSeed {
        last_value: 100.0,
        value_7_days_prior: 90.0,
    };
    (build_feature_table(&historical, &forecast, seed).unwrap(), 14)
}

/// Predictor that always returns the same value
struct ConstPredictor(f64);

impl DemandPredictor for ConstPredictor {
    fn predict(&self, _features: &[f64]) -> Result<f64> {
        Ok(self.0)
    }

    fn name(&self) -> &str {
        "Constant"
    }
}

/// Predictor that fails on its nth call
struct FailsOnCall {
    calls: Cell<usize>,
    fail_at: usize,
}

impl DemandPredictor for FailsOnCall {
    fn predict(&self, _features: &[f64]) -> Result<f64> {
        let call = self.calls.get() + 1;
        self.calls.set(call);
        if call == self.fail_at {
            return Err(ForecastError::PredictorFailure(
                "model rejected input".to_string(),
            ));
        }
        Ok(1000.0)
    }

    fn name(&self) -> &str {
        "FailsOnCall"
    }
}

#[test]
fn test_lag_propagation_with_constant_predictor() {
    let (mut table, forecast_start) = table_14_7();
    let predictor = ConstPredictor(50.0);

    let predictions = SequentialForecaster::new(&predictor)
        .run(&mut table, forecast_start)
        .unwrap();

    assert_eq!(predictions, vec![50.0; 7]);

    // The first forecast day's prediction feeds the next day's lag-1
    assert_eq!(table[forecast_start + 1].demand_lag1, 50.0);
    // Its lag-7 still points into the historical window, which is never
    // mutated, so the seed survives
    assert_eq!(table[forecast_start].demand_lag7, 90.0);
    // Every forecast row got its prediction recorded
    for row in &table[forecast_start..] {
        assert_eq!(row.demand, Some(50.0));
    }
}

#[test]
fn test_historical_rows_are_never_mutated() {
    let (mut table, forecast_start) = table_14_7();
    let predictor = ConstPredictor(50.0);

    SequentialForecaster::new(&predictor)
        .run(&mut table, forecast_start)
        .unwrap();

    for row in &table[..forecast_start] {
        assert!(row.demand.is_none());
        assert_eq!(row.demand_lag1, 100.0);
        assert_eq!(row.demand_lag7, 90.0);
    }
}

#[test]
fn test_predictions_chain_through_demand_lag1() {
    let (mut table, forecast_start) = table_14_7();
    // Each prediction is 1.1x the previous day's demand
    let predictor =
        LinearPredictor::from_named_weights("chain", 0.0, &[("demand_lag1", 1.1)]).unwrap();

    let predictions = SequentialForecaster::new(&predictor)
        .run(&mut table, forecast_start)
        .unwrap();

    let mut expected = 100.0;
    for prediction in predictions {
        expected *= 1.1;
        assert!((prediction - expected).abs() < 1e-9);
    }
}

#[test]
fn test_forecaster_is_deterministic() {
    let (table, forecast_start) = table_14_7();
    let predictor = LinearPredictor::from_named_weights(
        "mixed",
        500.0,
        &[("temp_comfort", 30.0), ("demand_lag1", 0.4), ("is_weekend", 120.0)],
    )
    .unwrap();

    let mut first = table.clone();
    let mut second = table;
    let forecaster = SequentialForecaster::new(&predictor);

    let a = forecaster.run(&mut first, forecast_start).unwrap();
    let b = forecaster.run(&mut second, forecast_start).unwrap();

    // Bit-identical, not merely close
    assert_eq!(a, b);
}

#[test]
fn test_predictor_failure_aborts_the_run() {
    let (mut table, forecast_start) = table_14_7();
    let predictor = FailsOnCall {
        calls: Cell::new(0),
        fail_at: 3,
    };

    let result = SequentialForecaster::new(&predictor).run(&mut table, forecast_start);

    assert!(matches!(result, Err(ForecastError::PredictorFailure(_))));
}

#[test]
fn test_forecast_start_must_be_inside_the_table() {
    let (mut table, _) = table_14_7();
    let len = table.len();
    let predictor = ConstPredictor(50.0);

    let result = SequentialForecaster::new(&predictor).run(&mut table, len);

    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
}
