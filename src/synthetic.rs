//! Deterministic synthetic data for demos and tests
//!
//! Generates plausible Swiss-plateau weather and a weekly-patterned demand
//! series from a fixed seed, so the full pipeline can run without network
//! access or a real model artifact.

use crate::error::Result;
use crate::history::DemandHistory;
use crate::weather::{DailyWeather, Location, WeatherProvider};
use chrono::{Datelike, Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Rough mean daily maximum temperature by month
const MONTHLY_TEMP_MAX: [f64; 12] = [
    3.0, 5.0, 10.0, 14.0, 19.0, 23.0, 25.0, 24.0, 19.0, 14.0, 7.0, 4.0,
];

/// Weather provider producing a deterministic synthetic series per location
#[derive(Debug, Clone)]
pub struct SyntheticWeather {
    seed: u64,
}

impl SyntheticWeather {
    /// Provider with a fixed seed; the same seed always yields the same data
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl WeatherProvider for SyntheticWeather {
    fn daily_range(
        &self,
        location: &Location,
        start: NaiveDate,
        days: usize,
    ) -> Result<Vec<DailyWeather>> {
        let mut hasher = DefaultHasher::new();
        location.name.hash(&mut hasher);
        let mut rng = StdRng::seed_from_u64(self.seed ^ hasher.finish());

        let temp_noise = Normal::<f64>::new(0.0, 3.0).expect("valid distribution parameters");
        let spread = Normal::<f64>::new(8.0, 2.0).expect("valid distribution parameters");

        let mut series = Vec::with_capacity(days);
        for offset in 0..days {
            let date = start + Duration::days(offset as i64);
            let base = MONTHLY_TEMP_MAX[date.month0() as usize];
            let temp_max = base + temp_noise.sample(&mut rng);
            let temp_min = temp_max - spread.sample(&mut rng).max(2.0);
            let precipitation = if rng.gen_bool(0.35) {
                rng.gen_range(0.5..18.0)
            } else {
                0.0
            };
            series.push(DailyWeather {
                date,
                temp_max,
                temp_min,
                precipitation,
            });
        }
        Ok(series)
    }
}

/// Deterministic demand history with a weekly pattern and mild noise
pub fn synthetic_history(start: NaiveDate, days: usize, seed: u64) -> Result<DemandHistory> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::<f64>::new(0.0, 150.0).expect("valid distribution parameters");

    let records = (0..days)
        .map(|offset| {
            let date = start + Duration::days(offset as i64);
            let weekend_lift = if date.weekday().num_days_from_monday() >= 5 {
                350.0
            } else {
                0.0
            };
            let value = (2000.0 + weekend_lift + noise.sample(&mut rng)).max(0.0);
            (date, value)
        })
        .collect();

    DemandHistory::from_records(records)
}
