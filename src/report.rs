//! Consumer-facing forecast report and export
//!
//! Immutable output of one pipeline run: per-day rows ready for rendering,
//! week-level aggregates, and a flat CSV export.

use crate::classify::{DemandAssessment, DemandThresholds, WeatherAdvice};
use crate::error::{ForecastError, Result};
use crate::history::HistoricalStats;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Persona the rendered output targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Restaurant,
    Platform,
    Driver,
}

/// Session-scoped UI configuration, passed explicitly into the render layer.
///
/// Kept out of the forecasting core so a run stays a pure function of its
/// inputs, with no coupling to UI session lifetime.
#[derive(Debug, Clone, Copy)]
pub struct SessionContext {
    pub role: Role,
    pub dark_mode: bool,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self {
            role: Role::Platform,
            dark_mode: false,
        }
    }
}

/// One forecast day ready for rendering
#[derive(Debug, Clone)]
pub struct DayForecast {
    pub date: NaiveDate,
    /// Full weekday name, e.g. "Saturday"
    pub weekday: String,
    pub temp_max: f64,
    pub temp_min: f64,
    pub precipitation: f64,
    pub predicted_demand: f64,
    /// Tier and base narrative pair
    pub assessment: DemandAssessment,
    /// Weather- and holiday-conditional narrative paragraphs
    pub advice: WeatherAdvice,
}

impl DayForecast {
    /// The (base summary, weather detail) narrative pair for a persona.
    /// Drivers get the platform-side operational view.
    pub fn narrative_for(&self, role: Role) -> (&'static str, &str) {
        match role {
            Role::Restaurant => (
                self.assessment.restaurant_summary,
                self.advice.restaurant.as_str(),
            ),
            Role::Platform | Role::Driver => (
                self.assessment.platform_summary,
                self.advice.platform.as_str(),
            ),
        }
    }
}

/// Historical-percentile band a value falls into, for display
pub fn percentile_band(value: f64, thresholds: &DemandThresholds) -> &'static str {
    if value >= thresholds.p90 {
        "90th+"
    } else if value >= thresholds.p75 {
        "75th-90th"
    } else if value <= thresholds.p25 {
        "25th or below"
    } else {
        "25th-75th"
    }
}

/// Week-level judgment relative to the historical average
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekAssessment {
    /// More than 15% above the historical average
    AboveAverage,
    /// More than 15% below the historical average
    BelowAverage,
    Normal,
}

impl WeekAssessment {
    pub fn label(&self) -> &'static str {
        match self {
            WeekAssessment::AboveAverage => "Above Average Week - Prepare for elevated demand",
            WeekAssessment::BelowAverage => "Below Average Week - Consider promotional strategies",
            WeekAssessment::Normal => "Normal Week - Standard operations",
        }
    }
}

/// Aggregates over the forecast week
#[derive(Debug, Clone)]
pub struct WeekSummary {
    pub week_avg: f64,
    pub week_total: f64,
    /// Percent difference of the week average vs the historical mean
    pub vs_historical_pct: f64,
    /// Days at or above the 75th percentile
    pub high_demand_days: usize,
    pub peak_date: NaiveDate,
    pub peak_value: f64,
    pub assessment: WeekAssessment,
}

/// Immutable result of one forecasting run
#[derive(Debug, Clone)]
pub struct ForecastReport {
    pub days: Vec<DayForecast>,
    pub summary: WeekSummary,
    pub thresholds: DemandThresholds,
    pub historical_mean: f64,
    /// Name of the point-predictor that produced the numbers
    pub model: String,
    /// Validation R² of the model, when its artifact recorded one
    pub model_r_squared: Option<f64>,
    /// Validation RMSE of the model, when its artifact recorded one
    pub model_rmse: Option<f64>,
}

impl ForecastReport {
    pub(crate) fn assemble(
        days: Vec<DayForecast>,
        stats: &HistoricalStats,
        model: &str,
        model_r_squared: Option<f64>,
        model_rmse: Option<f64>,
    ) -> Result<Self> {
        if days.is_empty() {
            return Err(ForecastError::ValidationError(
                "cannot assemble a report over zero forecast days".to_string(),
            ));
        }

        let n = days.len() as f64;
        let week_total: f64 = days.iter().map(|d| d.predicted_demand).sum();
        let week_avg = week_total / n;
        let vs_historical_pct = (week_avg - stats.mean) / stats.mean * 100.0;
        let high_demand_days = days
            .iter()
            .filter(|d| d.predicted_demand >= stats.p75)
            .count();

        let mut peak_date = days[0].date;
        let mut peak_value = days[0].predicted_demand;
        for day in &days[1..] {
            if day.predicted_demand > peak_value {
                peak_date = day.date;
                peak_value = day.predicted_demand;
            }
        }

        let assessment = if vs_historical_pct > 15.0 {
            WeekAssessment::AboveAverage
        } else if vs_historical_pct < -15.0 {
            WeekAssessment::BelowAverage
        } else {
            WeekAssessment::Normal
        };

        Ok(Self {
            days,
            summary: WeekSummary {
                week_avg,
                week_total,
                vs_historical_pct,
                high_demand_days,
                peak_date,
                peak_value,
                assessment,
            },
            thresholds: stats.thresholds(),
            historical_mean: stats.mean,
            model: model.to_string(),
            model_r_squared,
            model_rmse,
        })
    }

    /// The `count` highest-demand days, descending
    pub fn priority_days(&self, count: usize) -> Vec<&DayForecast> {
        let mut sorted: Vec<&DayForecast> = self.days.iter().collect();
        sorted.sort_by(|a, b| {
            b.predicted_demand
                .partial_cmp(&a.predicted_demand)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted.truncate(count);
        sorted
    }

    /// Short guidance on how much to trust the numbers, when the model
    /// artifact recorded validation metrics
    pub fn reliability_note(&self) -> Option<String> {
        let r_squared = self.model_r_squared?;
        let mut note = format!(
            "{} explains about {:.1}% of the day-to-day variation in historical demand. \
             Use the forecasts as directional signals and plan staffing and stock from the \
             demand tiers rather than exact numbers.",
            self.model,
            r_squared * 100.0
        );
        if let Some(rmse) = self.model_rmse {
            note.push_str(&format!(
                " On a single day the true value can easily be about {:.0} above or below \
                 the forecast, so keep a safety buffer on HIGH and CRITICAL days.",
                rmse
            ));
        }
        Some(note)
    }

    /// Export the forecast as a flat delimited table: date, weekday name,
    /// temperatures and precipitation rounded to one decimal, demand rounded
    /// to the nearest integer.
    pub fn to_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut w = csv::Writer::from_writer(writer);
        w.write_record([
            "Date",
            "Weekday",
            "Max Temp (C)",
            "Min Temp (C)",
            "Precipitation (mm)",
            "Expected Demand",
        ])?;
        for day in &self.days {
            w.write_record(&[
                day.date.to_string(),
                day.weekday.clone(),
                format!("{:.1}", day.temp_max),
                format!("{:.1}", day.temp_min),
                format!("{:.1}", day.precipitation),
                format!("{}", day.predicted_demand.round() as i64),
            ])?;
        }
        w.flush()?;
        Ok(())
    }

    /// Export the forecast to a CSV file
    pub fn write_csv_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.to_csv(file)
    }
}
