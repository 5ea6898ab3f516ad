//! Seasonal heuristic baseline predictor
//!
//! A transparent fallback for environments without a fitted model artifact:
//! blends the demand lags and applies small weekend and weather multipliers.
//! Useful as a sanity baseline to compare fitted models against.

use crate::error::{ForecastError, Result};
use crate::features::{feature_index, FEATURE_ORDER};
use crate::predictor::DemandPredictor;

/// Lag-blend baseline with weekend and weather multipliers
#[derive(Debug, Clone)]
pub struct SeasonalBaseline {
    name: String,
}

impl SeasonalBaseline {
    /// Create the baseline predictor
    pub fn new() -> Self {
        Self {
            name: "Seasonal Baseline".to_string(),
        }
    }

    fn read(features: &[f64], name: &str) -> Result<f64> {
        let idx = feature_index(name).ok_or_else(|| {
            ForecastError::SchemaMismatch(format!("feature '{}' not in FEATURE_ORDER", name))
        })?;
        Ok(features[idx])
    }
}

impl Default for SeasonalBaseline {
    fn default() -> Self {
        Self::new()
    }
}

impl DemandPredictor for SeasonalBaseline {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != FEATURE_ORDER.len() {
            return Err(ForecastError::SchemaMismatch(format!(
                "feature vector has {} entries, expected {}",
                features.len(),
                FEATURE_ORDER.len()
            )));
        }

        let demand_lag1 = Self::read(features, "demand_lag1")?;
        let demand_lag7 = Self::read(features, "demand_lag7")?;
        let is_weekend = Self::read(features, "is_weekend")?;
        let temp_comfort = Self::read(features, "temp_comfort")?;
        let precipitation = Self::read(features, "precipitation")?;

        // Yesterday dominates, same-weekday-last-week anchors the weekly shape
        let base = 0.6 * demand_lag1 + 0.4 * demand_lag7;

        let mut multiplier = 1.0;
        if is_weekend >= 0.5 {
            multiplier *= 1.12;
        }
        if precipitation >= 5.0 {
            // Rain keeps people home and ordering in
            multiplier *= 1.08;
        }
        if temp_comfort <= 0.0 {
            multiplier *= 1.05;
        }

        Ok((base * multiplier).max(0.0))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
