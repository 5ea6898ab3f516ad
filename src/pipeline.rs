//! Request-scoped orchestration of a full forecasting run
//!
//! One invocation fetches weather, builds the feature table, runs the
//! sequential forecaster, classifies each day, and assembles the report. No
//! state crosses run boundaries; every run owns its own table.

use crate::classify::{classify, weather_adjustments, DayConditions};
use crate::error::{ForecastError, Result};
use crate::features::build_feature_table;
use crate::forecaster::SequentialForecaster;
use crate::history::{fallback_seed, DemandHistory, HistoricalStats};
use crate::predictor::DemandPredictor;
use crate::report::{DayForecast, ForecastReport};
use crate::weather::{
    aggregate, collect_observations, fallback_series, swiss_cities, Location, WeatherProvider,
};
use chrono::{Duration, NaiveDate};
use tracing::{info, warn};

/// Configuration of one forecasting run
#[derive(Debug, Clone)]
pub struct ForecastConfig {
    /// Locations whose weather is aggregated, with population weights
    /// derived from the full set
    pub locations: Vec<Location>,
    /// Length of the historical weather window feeding lag and rolling
    /// features
    pub historical_days: usize,
    /// Length of the forecast window
    pub forecast_days: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            locations: swiss_cities(),
            historical_days: 14,
            forecast_days: 7,
        }
    }
}

/// Single-threaded, synchronous forecasting pipeline
pub struct ForecastPipeline<'a> {
    provider: &'a dyn WeatherProvider,
    predictor: &'a dyn DemandPredictor,
    config: ForecastConfig,
}

impl<'a> ForecastPipeline<'a> {
    /// Pipeline with the default configuration
    pub fn new(provider: &'a dyn WeatherProvider, predictor: &'a dyn DemandPredictor) -> Self {
        Self::with_config(provider, predictor, ForecastConfig::default())
    }

    /// Pipeline with an explicit configuration
    pub fn with_config(
        provider: &'a dyn WeatherProvider,
        predictor: &'a dyn DemandPredictor,
        config: ForecastConfig,
    ) -> Self {
        Self {
            provider,
            predictor,
            config,
        }
    }

    /// Run the full pipeline for a forecast window starting at
    /// `forecast_start`.
    ///
    /// The historical weather window covers the `historical_days` days
    /// immediately before `forecast_start`. A missing historical window or a
    /// missing demand history degrades to documented fallbacks with a logged
    /// warning; a missing forecast window aborts the run before any partial
    /// forecast is surfaced.
    pub fn run(
        &self,
        forecast_start: NaiveDate,
        history: Option<&DemandHistory>,
    ) -> Result<ForecastReport> {
        if self.config.forecast_days == 0 || self.config.historical_days == 0 {
            return Err(ForecastError::InvalidParameter(
                "historical_days and forecast_days must both be at least 1".to_string(),
            ));
        }
        if self.config.locations.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "at least one location is required".to_string(),
            ));
        }

        info!(
            start = %forecast_start,
            days = self.config.forecast_days,
            locations = self.config.locations.len(),
            "starting forecast run"
        );

        let forecast_obs = collect_observations(
            self.provider,
            &self.config.locations,
            forecast_start,
            self.config.forecast_days,
        );
        let forecast_weather = aggregate(&forecast_obs);
        if forecast_weather.is_empty() {
            return Err(ForecastError::DataUnavailable(
                "no forecast-window weather from any location".to_string(),
            ));
        }

        let historical_start =
            forecast_start - Duration::days(self.config.historical_days as i64);
        let historical_obs = collect_observations(
            self.provider,
            &self.config.locations,
            historical_start,
            self.config.historical_days,
        );
        let mut historical_weather = aggregate(&historical_obs);
        if historical_weather.is_empty() {
            warn!("no historical weather from any location, substituting the first forecast day");
            historical_weather =
                fallback_series(&forecast_weather[0], self.config.historical_days);
        }

        let (stats, seed) = match history {
            Some(history) => (history.stats(), history.seed()),
            None => {
                warn!("no demand history available, substituting fallback statistics and seed");
                (HistoricalStats::fallback(), fallback_seed())
            }
        };

        let mut table = build_feature_table(&historical_weather, &forecast_weather, seed)?;
        let forecast_start_idx = historical_weather.len();

        let forecaster = SequentialForecaster::new(self.predictor);
        let predictions = forecaster.run(&mut table, forecast_start_idx)?;

        let thresholds = stats.thresholds();
        let days: Vec<DayForecast> = table[forecast_start_idx..]
            .iter()
            .zip(predictions.iter())
            .map(|(row, &predicted_demand)| {
                let assessment = classify(predicted_demand, &thresholds);
                let advice = weather_adjustments(&DayConditions {
                    temp_max: row.temp_max,
                    temp_min: row.temp_min,
                    precipitation: row.precipitation,
                    is_holiday: row.is_holiday,
                });
                DayForecast {
                    date: row.date,
                    weekday: row.date.format("%A").to_string(),
                    temp_max: row.temp_max,
                    temp_min: row.temp_min,
                    precipitation: row.precipitation,
                    predicted_demand,
                    assessment,
                    advice,
                }
            })
            .collect();

        info!(days = days.len(), model = self.predictor.name(), "forecast run complete");

        ForecastReport::assemble(
            days,
            &stats,
            self.predictor.name(),
            self.predictor.r_squared(),
            self.predictor.rmse(),
        )
    }
}
