//! Feature engineering for the forecasting pipeline
//!
//! Builds one chronologically ordered feature table spanning the historical
//! and forecast weather windows. Demand is unknown for every row at build
//! time; the sequential forecaster fills it in later.

use crate::error::{ForecastError, Result};
use crate::weather::AggregatedWeatherDay;
use chrono::{Datelike, Duration, NaiveDate};
use std::f64::consts::PI;

/// Version of [`FEATURE_ORDER`]; model artifacts carry the version they were
/// fit against and are rejected on mismatch.
pub const FEATURE_SCHEMA_VERSION: u32 = 1;

/// The exact feature order the point-predictor was fit with.
///
/// A reordered vector yields valid-looking but wrong predictions with no
/// error signal, so vector extraction, artifact validation, and the schema
/// tests all consume this one constant. Never inline a field list at a call
/// site.
pub const FEATURE_ORDER: [&str; 27] = [
    "is_weekend",
    "is_holiday",
    "weekday_sin",
    "weekday_cos",
    "month_sin",
    "month_cos",
    "temp_max",
    "temp_min",
    "precipitation",
    "temp_range",
    "temp_comfort",
    "precip_binary",
    "precip_heavy",
    "temp_max_lag1",
    "temp_min_lag1",
    "precipitation_lag1",
    "demand_lag1",
    "demand_lag7",
    "temp_max_lag7",
    "temp_min_lag7",
    "precipitation_lag7",
    "temp_max_7d",
    "precipitation_7d",
    "temp_max_squared",
    "temp_max_weekend",
    "precipitation_weekend",
    "temp_comfort_weekend",
];

/// Features the fitted model treats as categorical; their vector entries are
/// coerced to integral values right before prediction.
pub const CATEGORICAL_FEATURES: [&str; 4] =
    ["is_weekend", "is_holiday", "precip_binary", "precip_heavy"];

/// Position of a feature in [`FEATURE_ORDER`]
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_ORDER.iter().position(|&f| f == name)
}

/// Last known real demand values, used to initialize lag features before any
/// prediction exists
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemandSeed {
    /// Most recent realized demand value
    pub last_value: f64,
    /// Realized demand seven days before the most recent value
    pub value_7_days_prior: f64,
}

/// One calendar day of the combined historical + forecast window
#[derive(Debug, Clone)]
pub struct FeatureRow {
    /// Calendar day
    pub date: NaiveDate,
    /// Weekday index, 0 = Monday .. 6 = Sunday
    pub weekday: u32,
    /// Month number, 1..=12
    pub month: u32,
    /// Saturday or Sunday
    pub is_weekend: bool,
    /// Public holiday flag; stays false until a holiday calendar is wired in,
    /// and exists so the schema matches the fitted model
    pub is_holiday: bool,
    /// Cyclical weekday encoding, period 7
    pub weekday_sin: f64,
    pub weekday_cos: f64,
    /// Cyclical month encoding, period 12
    pub month_sin: f64,
    pub month_cos: f64,
    /// Weighted daily maximum temperature
    pub temp_max: f64,
    /// Weighted daily minimum temperature
    pub temp_min: f64,
    /// Weighted daily precipitation sum
    pub precipitation: f64,
    /// Daily temperature spread, max - min
    pub temp_range: f64,
    /// Midpoint of max and min temperature
    pub temp_comfort: f64,
    /// Any precipitation at all
    pub precip_binary: bool,
    /// More than 10 mm of precipitation
    pub precip_heavy: bool,
    pub temp_max_squared: f64,
    /// Weekend-interaction products
    pub temp_max_weekend: f64,
    pub precipitation_weekend: f64,
    pub temp_comfort_weekend: f64,
    /// Lag-1 and lag-7 of the raw weather fields
    pub temp_max_lag1: f64,
    pub temp_min_lag1: f64,
    pub precipitation_lag1: f64,
    pub temp_max_lag7: f64,
    pub temp_min_lag7: f64,
    pub precipitation_lag7: f64,
    /// 7-day trailing rolling means, expanding over the first six rows
    pub temp_max_7d: f64,
    pub precipitation_7d: f64,
    /// Realized or predicted demand; None until the forecaster fills it in
    pub demand: Option<f64>,
    /// Demand one day earlier; seeded, then overwritten by the forecaster
    pub demand_lag1: f64,
    /// Demand seven days earlier; seeded, then overwritten by the forecaster
    pub demand_lag7: f64,
}

impl FeatureRow {
    /// Value of a single named feature, flags as 0.0/1.0
    pub fn feature(&self, name: &str) -> Option<f64> {
        let value = match name {
            "is_weekend" => flag(self.is_weekend),
            "is_holiday" => flag(self.is_holiday),
            "weekday_sin" => self.weekday_sin,
            "weekday_cos" => self.weekday_cos,
            "month_sin" => self.month_sin,
            "month_cos" => self.month_cos,
            "temp_max" => self.temp_max,
            "temp_min" => self.temp_min,
            "precipitation" => self.precipitation,
            "temp_range" => self.temp_range,
            "temp_comfort" => self.temp_comfort,
            "precip_binary" => flag(self.precip_binary),
            "precip_heavy" => flag(self.precip_heavy),
            "temp_max_lag1" => self.temp_max_lag1,
            "temp_min_lag1" => self.temp_min_lag1,
            "precipitation_lag1" => self.precipitation_lag1,
            "demand_lag1" => self.demand_lag1,
            "demand_lag7" => self.demand_lag7,
            "temp_max_lag7" => self.temp_max_lag7,
            "temp_min_lag7" => self.temp_min_lag7,
            "precipitation_lag7" => self.precipitation_lag7,
            "temp_max_7d" => self.temp_max_7d,
            "precipitation_7d" => self.precipitation_7d,
            "temp_max_squared" => self.temp_max_squared,
            "temp_max_weekend" => self.temp_max_weekend,
            "precipitation_weekend" => self.precipitation_weekend,
            "temp_comfort_weekend" => self.temp_comfort_weekend,
            _ => return None,
        };
        Some(value)
    }

    /// The ordered vector the point-predictor consumes. Field order comes
    /// from [`FEATURE_ORDER`] and nowhere else.
    pub fn feature_vector(&self) -> Result<Vec<f64>> {
        FEATURE_ORDER
            .iter()
            .map(|name| {
                self.feature(name).ok_or_else(|| {
                    ForecastError::SchemaMismatch(format!(
                        "feature '{}' listed in FEATURE_ORDER has no row field",
                        name
                    ))
                })
            })
            .collect()
    }
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Build the full feature table over historical weather immediately followed
/// by forecast weather.
///
/// The combined window must be contiguous and ascending by date; the table
/// has exactly `historical.len() + forecast.len()` rows. Demand lag fields
/// are seeded uniformly from `seed` and later overwritten by the sequential
/// forecaster as real or predicted values become available.
///
/// Fails with [`ForecastError::DataUnavailable`] when the forecast slice is
/// empty: no meaningful feature row can be constructed from nothing, and
/// fabricating one would silently corrupt every downstream prediction.
pub fn build_feature_table(
    historical: &[AggregatedWeatherDay],
    forecast: &[AggregatedWeatherDay],
    seed: DemandSeed,
) -> Result<Vec<FeatureRow>> {
    if forecast.is_empty() {
        return Err(ForecastError::DataUnavailable(
            "no forecast-window weather; cannot construct feature rows".to_string(),
        ));
    }

    let combined: Vec<&AggregatedWeatherDay> =
        historical.iter().chain(forecast.iter()).collect();
    for pair in combined.windows(2) {
        if pair[1].date - pair[0].date != Duration::days(1) {
            return Err(ForecastError::ValidationError(format!(
                "weather window must be contiguous and ascending, found {} followed by {}",
                pair[0].date, pair[1].date
            )));
        }
    }

    let mut rows: Vec<FeatureRow> = combined.iter().map(|day| derive_row(day, seed)).collect();

    let temp_max: Vec<f64> = combined.iter().map(|d| d.temp_max).collect();
    let temp_min: Vec<f64> = combined.iter().map(|d| d.temp_min).collect();
    let precipitation: Vec<f64> = combined.iter().map(|d| d.precipitation).collect();

    // Weather lags are a plain shift along the combined window. Future
    // weather is known in advance (it is a forecast), so unlike demand these
    // are fully determined here and never recomputed in the prediction loop.
    let temp_max_lag1 = lagged(&temp_max, 1);
    let temp_min_lag1 = lagged(&temp_min, 1);
    let precipitation_lag1 = lagged(&precipitation, 1);
    let temp_max_lag7 = lagged(&temp_max, 7);
    let temp_min_lag7 = lagged(&temp_min, 7);
    let precipitation_lag7 = lagged(&precipitation, 7);

    for (i, row) in rows.iter_mut().enumerate() {
        row.temp_max_lag1 = temp_max_lag1[i];
        row.temp_min_lag1 = temp_min_lag1[i];
        row.precipitation_lag1 = precipitation_lag1[i];
        row.temp_max_lag7 = temp_max_lag7[i];
        row.temp_min_lag7 = temp_min_lag7[i];
        row.precipitation_lag7 = precipitation_lag7[i];

        // Trailing 7-day rolling means with a minimum window of one
        // observation: an expanding mean over the first six rows, a true
        // 7-day mean afterwards.
        let start = i.saturating_sub(6);
        row.temp_max_7d = mean(&temp_max[start..=i]);
        row.precipitation_7d = mean(&precipitation[start..=i]);
    }

    Ok(rows)
}

fn derive_row(day: &AggregatedWeatherDay, seed: DemandSeed) -> FeatureRow {
    let weekday = day.date.weekday().num_days_from_monday();
    let month = day.date.month();
    let is_weekend = weekday >= 5;
    let is_holiday = false;
    let temp_range = day.temp_max - day.temp_min;
    let temp_comfort = (day.temp_max + day.temp_min) / 2.0;
    let weekend = flag(is_weekend);

    FeatureRow {
        date: day.date,
        weekday,
        month,
        is_weekend,
        is_holiday,
        weekday_sin: (2.0 * PI * weekday as f64 / 7.0).sin(),
        weekday_cos: (2.0 * PI * weekday as f64 / 7.0).cos(),
        month_sin: (2.0 * PI * month as f64 / 12.0).sin(),
        month_cos: (2.0 * PI * month as f64 / 12.0).cos(),
        temp_max: day.temp_max,
        temp_min: day.temp_min,
        precipitation: day.precipitation,
        temp_range,
        temp_comfort,
        precip_binary: day.precipitation > 0.0,
        precip_heavy: day.precipitation > 10.0,
        temp_max_squared: day.temp_max * day.temp_max,
        temp_max_weekend: day.temp_max * weekend,
        precipitation_weekend: day.precipitation * weekend,
        temp_comfort_weekend: temp_comfort * weekend,
        temp_max_lag1: f64::NAN,
        temp_min_lag1: f64::NAN,
        precipitation_lag1: f64::NAN,
        temp_max_lag7: f64::NAN,
        temp_min_lag7: f64::NAN,
        precipitation_lag7: f64::NAN,
        temp_max_7d: 0.0,
        precipitation_7d: 0.0,
        demand: None,
        demand_lag1: seed.last_value,
        demand_lag7: seed.value_7_days_prior,
    }
}

/// Shift a series by `lag` positions, then apply the fill policy
fn lagged(values: &[f64], lag: usize) -> Vec<f64> {
    let mut shifted: Vec<f64> = (0..values.len())
        .map(|i| if i >= lag { values[i - lag] } else { f64::NAN })
        .collect();
    forward_fill_then_zero(&mut shifted);
    shifted
}

/// Replace each NaN with the last finite value seen, then zero-fill any
/// prefix nothing could fill.
///
/// This mirrors the preprocessing the fitted model saw at training time and
/// must match it bit for bit; do not change one without the other.
pub(crate) fn forward_fill_then_zero(values: &mut [f64]) {
    let mut last = None;
    for v in values.iter_mut() {
        if v.is_nan() {
            *v = last.unwrap_or(0.0);
        } else {
            last = Some(*v);
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
