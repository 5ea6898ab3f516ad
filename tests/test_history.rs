use chrono::{Duration, NaiveDate};
use demand_forecast::error::ForecastError;
use demand_forecast::history::{fallback_seed, DemandHistory, HistoricalStats};
use pretty_assertions::assert_eq;
use std::io::Write;

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)
}

fn history_1_to_100() -> DemandHistory {
    let records = (0..100).map(|i| (day(i), (i + 1) as f64)).collect();
    DemandHistory::from_records(records).unwrap()
}

#[test]
fn test_from_records_sorts_by_date() {
    let history = DemandHistory::from_records(vec![
        (day(2), 30.0),
        (day(0), 10.0),
        (day(1), 20.0),
    ])
    .unwrap();

    assert_eq!(history.values(), &[10.0, 20.0, 30.0]);
    assert_eq!(history.dates(), &[day(0), day(1), day(2)]);
}

#[test]
fn test_empty_records_are_rejected() {
    let result = DemandHistory::from_records(vec![]);
    assert!(matches!(result, Err(ForecastError::DataUnavailable(_))));
}

#[test]
fn test_stats_match_linear_interpolation_percentiles() {
    let stats = history_1_to_100().stats();

    assert!((stats.mean - 50.5).abs() < 1e-9);
    assert!((stats.median - 50.5).abs() < 1e-9);
    // Population standard deviation of 1..=100
    let expected_std = ((100.0f64 * 100.0 - 1.0) / 12.0).sqrt();
    assert!((stats.std_dev - expected_std).abs() < 1e-9);
    assert!((stats.p25 - 25.75).abs() < 1e-9);
    assert!((stats.p75 - 75.25).abs() < 1e-9);
    assert!((stats.p90 - 90.1).abs() < 1e-9);
    assert!((stats.p95 - 95.05).abs() < 1e-9);
    assert_eq!(stats.min, 1.0);
    assert_eq!(stats.max, 100.0);
}

#[test]
fn test_thresholds_come_from_the_distribution() {
    let stats = history_1_to_100().stats();
    let thresholds = stats.thresholds();

    assert_eq!(thresholds.p25, stats.p25);
    assert_eq!(thresholds.p75, stats.p75);
    assert_eq!(thresholds.p90, stats.p90);
}

#[test]
fn test_seed_uses_value_seven_rows_prior() {
    let history = history_1_to_100();
    let seed = history.seed();

    assert_eq!(seed.last_value, 100.0);
    assert_eq!(seed.value_7_days_prior, 94.0);
}

#[test]
fn test_seed_falls_back_to_last_value_for_short_series() {
    let history = DemandHistory::from_records(vec![
        (day(0), 10.0),
        (day(1), 20.0),
        (day(2), 30.0),
    ])
    .unwrap();
    let seed = history.seed();

    assert_eq!(seed.last_value, 30.0);
    assert_eq!(seed.value_7_days_prior, 30.0);
}

#[test]
fn test_fallback_statistics_and_seed() {
    let stats = HistoricalStats::fallback();

    assert_eq!(stats.mean, 2000.0);
    assert_eq!(stats.p25, 1500.0);
    assert_eq!(stats.p75, 2500.0);
    assert_eq!(stats.p90, 3000.0);

    let seed = fallback_seed();
    assert_eq!(seed.last_value, 2000.0);
    assert_eq!(seed.value_7_days_prior, 2000.0);
}

#[test]
fn test_from_csv_detects_columns() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "Day,estimated_daily_searches").unwrap();
    writeln!(file, "2024-01-03,1700").unwrap();
    writeln!(file, "2024-01-01,1500").unwrap();
    writeln!(file, "2024-01-02,1600").unwrap();
    file.flush().unwrap();

    let history = DemandHistory::from_csv(file.path()).unwrap();

    assert_eq!(history.len(), 3);
    assert_eq!(history.values(), &[1500.0, 1600.0, 1700.0]);
    assert_eq!(history.dates()[0], day(0));
}

#[test]
fn test_from_csv_with_generic_column_names() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "date,demand").unwrap();
    writeln!(file, "2024-01-01,900.5").unwrap();
    writeln!(file, "2024-01-02,1100.5").unwrap();
    file.flush().unwrap();

    let history = DemandHistory::from_csv(file.path()).unwrap();

    assert_eq!(history.values(), &[900.5, 1100.5]);
}
