//! Historical demand ingestion and summary statistics
//!
//! The forecasting core needs three things from the historical series: the
//! seed pair for the demand lag features, the percentile thresholds for
//! classification, and the mean for week-level comparison. Everything is
//! derived once from a date-ordered series loaded from CSV or built from
//! records.

use crate::classify::DemandThresholds;
use crate::error::{ForecastError, Result};
use crate::features::DemandSeed;
use chrono::{Days, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Date-ordered historical demand series
#[derive(Debug, Clone)]
pub struct DemandHistory {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

/// Summary statistics over the historical demand distribution
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalStats {
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
    pub min: f64,
    pub max: f64,
}

impl HistoricalStats {
    /// Classification thresholds derived from the distribution
    pub fn thresholds(&self) -> DemandThresholds {
        DemandThresholds {
            p25: self.p25,
            p75: self.p75,
            p90: self.p90,
        }
    }

    /// Documented defaults for when the historical source is unavailable.
    ///
    /// Downstream output is indistinguishable from the real-data case, so
    /// callers substituting these must log the substitution.
    pub fn fallback() -> Self {
        Self {
            mean: 2000.0,
            median: 2000.0,
            std_dev: 500.0,
            p25: 1500.0,
            p50: 2000.0,
            p75: 2500.0,
            p90: 3000.0,
            p95: 3500.0,
            min: 1000.0,
            max: 4000.0,
        }
    }
}

/// Documented seed defaults for when the historical source is unavailable
pub fn fallback_seed() -> DemandSeed {
    DemandSeed {
        last_value: 2000.0,
        value_7_days_prior: 2000.0,
    }
}

impl DemandHistory {
    /// Build a history from (date, value) records; sorts by date
    pub fn from_records(mut records: Vec<(NaiveDate, f64)>) -> Result<Self> {
        if records.is_empty() {
            return Err(ForecastError::DataUnavailable(
                "historical demand series is empty".to_string(),
            ));
        }
        records.sort_by_key(|(date, _)| *date);
        let (dates, values) = records.into_iter().unzip();
        Ok(Self { dates, values })
    }

    /// Load a history from a CSV file, detecting the date and demand columns
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::from_dataframe(df)
    }

    /// Build a history from an existing DataFrame
    pub fn from_dataframe(df: DataFrame) -> Result<Self> {
        let date_column = Self::detect_date_column(&df)?;
        let demand_column = Self::detect_demand_column(&df, &date_column)?;

        let dates = column_as_dates(&df, &date_column)?;
        let values = column_as_f64(&df, &demand_column)?;

        // Pairs with a null on either side are dropped together so the two
        // columns stay aligned.
        let records: Vec<(NaiveDate, f64)> = dates
            .into_iter()
            .zip(values)
            .filter_map(|(date, value)| Some((date?, value?)))
            .collect();

        Self::from_records(records)
    }

    /// Detect the date column in a DataFrame
    fn detect_date_column(df: &DataFrame) -> Result<String> {
        let column_names = df.get_column_names();

        for name in &column_names {
            let lower_name = name.to_lowercase();
            if lower_name.contains("day") || lower_name.contains("date") || lower_name.contains("time")
            {
                return Ok(name.to_string());
            }
        }

        if let Some(first_col) = df.get_columns().first() {
            if first_col.dtype().is_temporal() {
                return Ok(first_col.name().to_string());
            }
        }

        Err(ForecastError::DataError(
            "no date column found in historical data".to_string(),
        ))
    }

    /// Detect the demand column in a DataFrame
    fn detect_demand_column(df: &DataFrame, date_column: &str) -> Result<String> {
        let column_names = df.get_column_names();

        for name in &column_names {
            let lower_name = name.to_lowercase();
            if lower_name.contains("search")
                || lower_name.contains("demand")
                || lower_name.contains("order")
                || lower_name.contains("volume")
            {
                return Ok(name.to_string());
            }
        }

        // Otherwise take the first numeric column that is not the date
        for col in df.get_columns() {
            if col.name() != date_column && col.dtype().is_numeric() {
                return Ok(col.name().to_string());
            }
        }

        Err(ForecastError::DataError(
            "no demand column found in historical data".to_string(),
        ))
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the series holds no observations; constructors reject this
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Observed demand values in date order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Observation dates in ascending order
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Summary statistics over the full distribution
    pub fn stats(&self) -> HistoricalStats {
        let n = self.values.len() as f64;
        let mean = self.values.iter().sum::<f64>() / n;
        let variance = self.values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        let mut sorted = self.values.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        HistoricalStats {
            mean,
            median: percentile(&sorted, 50.0),
            std_dev: variance.sqrt(),
            p25: percentile(&sorted, 25.0),
            p50: percentile(&sorted, 50.0),
            p75: percentile(&sorted, 75.0),
            p90: percentile(&sorted, 90.0),
            p95: percentile(&sorted, 95.0),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
        }
    }

    /// Seed pair for the demand lag features: the most recent value and the
    /// value seven rows prior, falling back to the most recent value for
    /// short series.
    pub fn seed(&self) -> DemandSeed {
        let last = *self.values.last().expect("constructors reject empty series");
        let prior = if self.values.len() >= 7 {
            self.values[self.values.len() - 7]
        } else {
            last
        };
        DemandSeed {
            last_value: last,
            value_7_days_prior: prior,
        }
    }
}

/// Linear-interpolation percentile over an ascending sample, `p` in [0, 100]
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (rank - lo as f64) * (sorted[hi] - sorted[lo])
    }
}

fn column_as_dates(df: &DataFrame, column_name: &str) -> Result<Vec<Option<NaiveDate>>> {
    let col = df.column(column_name)?;

    match col.dtype() {
        DataType::Date => {
            let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid epoch date");
            Ok(col
                .date()?
                .into_iter()
                .map(|opt_days| {
                    opt_days.and_then(|days| epoch.checked_add_days(Days::new(days as u64)))
                })
                .collect())
        }
        DataType::Datetime(_, _) => Ok(col
            .datetime()?
            .into_iter()
            .map(|opt_ts| {
                opt_ts.and_then(|ts| {
                    NaiveDateTime::from_timestamp_opt(
                        ts / 1_000_000_000,
                        (ts % 1_000_000_000) as u32,
                    )
                    .map(|dt| dt.date())
                })
            })
            .collect()),
        DataType::Utf8 => col
            .utf8()?
            .into_iter()
            .map(|opt_s| match opt_s {
                Some(s) => parse_date(s).map(Some),
                None => Ok(None),
            })
            .collect(),
        other => Err(ForecastError::DataError(format!(
            "column '{}' has unsupported date type {:?}",
            column_name, other
        ))),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }
    Err(ForecastError::DataError(format!(
        "cannot parse '{}' as a date",
        s
    )))
}

fn column_as_f64(df: &DataFrame, column_name: &str) -> Result<Vec<Option<f64>>> {
    let col = df.column(column_name)?;

    match col.dtype() {
        DataType::Float64 => Ok(col.f64()?.into_iter().collect()),
        DataType::Float32 => Ok(col
            .f32()?
            .into_iter()
            .map(|v| v.map(|v| v as f64))
            .collect()),
        DataType::Int64 => Ok(col
            .i64()?
            .into_iter()
            .map(|v| v.map(|v| v as f64))
            .collect()),
        DataType::Int32 => Ok(col
            .i32()?
            .into_iter()
            .map(|v| v.map(|v| v as f64))
            .collect()),
        DataType::UInt64 => Ok(col
            .u64()?
            .into_iter()
            .map(|v| v.map(|v| v as f64))
            .collect()),
        DataType::UInt32 => Ok(col
            .u32()?
            .into_iter()
            .map(|v| v.map(|v| v as f64))
            .collect()),
        _ => Err(ForecastError::DataError(format!(
            "column '{}' cannot be converted to f64",
            column_name
        ))),
    }
}
