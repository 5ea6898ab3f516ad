//! Population-weighted weather aggregation

use crate::error::Result;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// A city reporting daily weather, with its population share of the total
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    /// City name
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Registered population, used to derive the aggregation weight
    pub population: u64,
}

impl Location {
    /// Create a new location
    pub fn new(name: &str, latitude: f64, longitude: f64, population: u64) -> Self {
        Self {
            name: name.to_string(),
            latitude,
            longitude,
            population,
        }
    }
}

/// One raw daily reading for a single location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherObservation {
    /// Name of the reporting location
    pub location: String,
    /// Calendar day of the reading
    pub date: NaiveDate,
    /// Daily maximum temperature in degrees Celsius
    pub temp_max: f64,
    /// Daily minimum temperature in degrees Celsius
    pub temp_min: f64,
    /// Daily precipitation sum in millimeters
    pub precipitation: f64,
    /// Population share of the reporting location, in [0, 1]
    pub weight: f64,
}

/// One national daily value, the population-weight-sum over all reporting locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedWeatherDay {
    /// Calendar day (unique key)
    pub date: NaiveDate,
    /// Weighted daily maximum temperature
    pub temp_max: f64,
    /// Weighted daily minimum temperature
    pub temp_min: f64,
    /// Weighted daily precipitation sum
    pub precipitation: f64,
}

/// Daily values for one location as returned by an external source, before weighting
#[derive(Debug, Clone)]
pub struct DailyWeather {
    /// Calendar day
    pub date: NaiveDate,
    /// Daily maximum temperature in degrees Celsius
    pub temp_max: f64,
    /// Daily minimum temperature in degrees Celsius
    pub temp_min: f64,
    /// Daily precipitation sum in millimeters
    pub precipitation: f64,
}

/// External daily-weather source, abstracted from any concrete transport
pub trait WeatherProvider {
    /// Daily values for one location over `[start, start + days)`.
    ///
    /// A failure here affects only the given location; callers exclude the
    /// location from the weighted aggregate and continue.
    fn daily_range(
        &self,
        location: &Location,
        start: NaiveDate,
        days: usize,
    ) -> Result<Vec<DailyWeather>>;
}

/// The ten largest Swiss cities with registered populations
pub fn swiss_cities() -> Vec<Location> {
    vec![
        Location::new("Zurich", 47.3769, 8.5417, 436_551),
        Location::new("Geneva", 46.2044, 6.1432, 209_061),
        Location::new("Basel", 47.5596, 7.5886, 177_571),
        Location::new("Lausanne", 46.5197, 6.6323, 144_873),
        Location::new("Bern", 46.9481, 7.4474, 137_995),
        Location::new("Winterthur", 47.5056, 8.7247, 120_376),
        Location::new("Lucerne", 47.0502, 8.3064, 86_234),
        Location::new("St. Gallen", 47.4245, 9.3767, 78_863),
        Location::new("Lugano", 46.0101, 8.9600, 63_629),
        Location::new("Biel", 47.1404, 7.2471, 56_896),
    ]
}

/// Population share per location; shares sum to 1.0 over the full set
pub fn population_weights(locations: &[Location]) -> Vec<f64> {
    let total: u64 = locations.iter().map(|l| l.population).sum();
    if total == 0 {
        return vec![0.0; locations.len()];
    }
    locations
        .iter()
        .map(|l| l.population as f64 / total as f64)
        .collect()
}

/// Collect weighted observations from a provider over a date window.
///
/// A location whose fetch fails is logged and excluded; it is not a fatal
/// error. The returned set may therefore cover fewer locations (or dates)
/// than requested.
pub fn collect_observations(
    provider: &dyn WeatherProvider,
    locations: &[Location],
    start: NaiveDate,
    days: usize,
) -> Vec<WeatherObservation> {
    let weights = population_weights(locations);
    let mut observations = Vec::with_capacity(locations.len() * days);

    for (location, weight) in locations.iter().zip(weights.iter()) {
        match provider.daily_range(location, start, days) {
            Ok(series) => {
                for day in series {
                    observations.push(WeatherObservation {
                        location: location.name.clone(),
                        date: day.date,
                        temp_max: day.temp_max,
                        temp_min: day.temp_min,
                        precipitation: day.precipitation,
                        weight: *weight,
                    });
                }
            }
            Err(err) => {
                warn!(location = %location.name, error = %err, "weather fetch failed, excluding location");
            }
        }
    }

    observations
}

/// Collapse per-location observations into one weighted national series.
///
/// Each output field is `sum(value_i * weight_i)` over the locations
/// reporting for that date. A location missing for a date is simply excluded
/// from the sum; the remaining weights are NOT renormalized, so such dates
/// carry a slightly lower aggregate. Returns one row per date present in the
/// input, ascending; an empty input yields an empty vector and the caller
/// decides whether that is fatal.
pub fn aggregate(observations: &[WeatherObservation]) -> Vec<AggregatedWeatherDay> {
    let mut by_date: BTreeMap<NaiveDate, (f64, f64, f64)> = BTreeMap::new();

    for obs in observations {
        let entry = by_date.entry(obs.date).or_insert((0.0, 0.0, 0.0));
        entry.0 += obs.temp_max * obs.weight;
        entry.1 += obs.temp_min * obs.weight;
        entry.2 += obs.precipitation * obs.weight;
    }

    by_date
        .into_iter()
        .map(|(date, (temp_max, temp_min, precipitation))| AggregatedWeatherDay {
            date,
            temp_max,
            temp_min,
            precipitation,
        })
        .collect()
}

/// Degraded substitute for a missing historical window: the first available
/// forecast day's weather repeated backwards over contiguous dates ending the
/// day before it.
pub fn fallback_series(first_forecast_day: &AggregatedWeatherDay, days: usize) -> Vec<AggregatedWeatherDay> {
    (1..=days as i64)
        .rev()
        .map(|offset| AggregatedWeatherDay {
            date: first_forecast_day.date - Duration::days(offset),
            temp_max: first_forecast_day.temp_max,
            temp_min: first_forecast_day.temp_min,
            precipitation: first_forecast_day.precipitation,
        })
        .collect()
}
