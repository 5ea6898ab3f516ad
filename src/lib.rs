//! # Demand Forecast
//!
//! A Rust library for weather-driven daily demand forecasting and
//! operational recommendations.
//!
//! ## Features
//!
//! - Population-weighted aggregation of multi-location weather into one
//!   national daily series
//! - Calendar, weather, lag, and rolling feature engineering over a combined
//!   historical + forecast window
//! - Iterative multi-step forecasting: each day's prediction feeds the lag
//!   features of later days, so the loop is strictly sequential
//! - Demand tiers from historical percentile thresholds, with role-specific
//!   narrative recommendations adjusted for weather and holidays
//! - Week-level summary and flat CSV export of the 7-day forecast
//!
//! The point-predictor is an injected capability behind the
//! [`predictor::DemandPredictor`] trait, so the pipeline runs with a fitted
//! model artifact, a transparent baseline, or a deterministic test stub.
//!
//! ## Quick Start
//!
//! ```
//! use chrono::{Duration, NaiveDate};
//! use demand_forecast::pipeline::ForecastPipeline;
//! use demand_forecast::predictor::SeasonalBaseline;
//! use demand_forecast::synthetic::{synthetic_history, SyntheticWeather};
//!
//! # fn main() -> demand_forecast::error::Result<()> {
//! let provider = SyntheticWeather::new(7);
//! let predictor = SeasonalBaseline::new();
//! let pipeline = ForecastPipeline::new(&provider, &predictor);
//!
//! let forecast_start = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
//! let history = synthetic_history(forecast_start - Duration::days(120), 120, 7)?;
//!
//! let report = pipeline.run(forecast_start, Some(&history))?;
//! assert_eq!(report.days.len(), 7);
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod error;
pub mod features;
pub mod forecaster;
pub mod history;
pub mod pipeline;
pub mod predictor;
pub mod report;
pub mod synthetic;
pub mod weather;

// Re-export commonly used types
pub use crate::classify::{classify, DemandThresholds, DemandTier};
pub use crate::error::ForecastError;
pub use crate::features::{build_feature_table, DemandSeed, FeatureRow, FEATURE_ORDER};
pub use crate::forecaster::SequentialForecaster;
pub use crate::history::DemandHistory;
pub use crate::pipeline::{ForecastConfig, ForecastPipeline};
pub use crate::predictor::DemandPredictor;
pub use crate::report::{ForecastReport, Role, SessionContext};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
