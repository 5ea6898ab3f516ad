//! Iterative multi-step forecasting
//!
//! The core algorithm: walk the forecast-window rows in date order,
//! materialize the exact feature vector the point-predictor expects, predict,
//! and propagate each day's prediction into the demand-lag features of later
//! rows before they are computed.

use crate::error::{ForecastError, Result};
use crate::features::{
    feature_index, forward_fill_then_zero, FeatureRow, CATEGORICAL_FEATURES, FEATURE_ORDER,
};
use crate::predictor::DemandPredictor;
use tracing::debug;

/// Sequential multi-step forecaster over a prepared feature table
pub struct SequentialForecaster<'a> {
    predictor: &'a dyn DemandPredictor,
}

impl<'a> SequentialForecaster<'a> {
    /// Create a forecaster around an injected point-predictor
    pub fn new(predictor: &'a dyn DemandPredictor) -> Self {
        Self { predictor }
    }

    /// Predict every row from `forecast_start` to the end of the table, in
    /// order, returning one prediction per forecast day.
    ///
    /// The loop body is strictly sequential: step i's `demand_lag1` input may
    /// be step i-1's output, so iterations cannot be reordered or run in
    /// parallel. Only rows at or after `forecast_start` are mutated;
    /// historical rows keep their seeded demand lags.
    ///
    /// A predictor error aborts the whole run. Substituting a default for one
    /// day would flow through the lag features and silently corrupt every
    /// later day, which is strictly worse than a visible failure.
    pub fn run(&self, table: &mut [FeatureRow], forecast_start: usize) -> Result<Vec<f64>> {
        if forecast_start >= table.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "forecast start {} is outside the table of {} rows",
                forecast_start,
                table.len()
            )));
        }

        let categorical: Vec<usize> = CATEGORICAL_FEATURES
            .iter()
            .filter_map(|name| feature_index(name))
            .collect();

        let mut predictions = Vec::with_capacity(table.len() - forecast_start);

        for i in forecast_start..table.len() {
            let mut x = table[i].feature_vector()?;
            if x.len() != FEATURE_ORDER.len() {
                return Err(ForecastError::SchemaMismatch(format!(
                    "extracted {} features for {}, schema has {}",
                    x.len(),
                    table[i].date,
                    FEATURE_ORDER.len()
                )));
            }

            forward_fill_then_zero(&mut x);
            for &c in &categorical {
                x[c] = x[c].round();
            }

            let prediction = self.predictor.predict(&x)?;
            debug!(date = %table[i].date, prediction, "sequential forecast step");

            predictions.push(prediction);
            table[i].demand = Some(prediction);

            // Feed the prediction into the lag features of later rows. The
            // weather lags and rolling means were fully determined at build
            // time and are never touched here.
            if i + 1 < table.len() {
                table[i + 1].demand_lag1 = prediction;
            }
            if i + 7 < table.len() {
                table[i + 7].demand_lag7 = prediction;
            }
        }

        Ok(predictions)
    }
}
