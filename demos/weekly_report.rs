use chrono::{Duration, NaiveDate};
use demand_forecast::features::{feature_index, FEATURE_ORDER, FEATURE_SCHEMA_VERSION};
use demand_forecast::pipeline::ForecastPipeline;
use demand_forecast::predictor::{LinearPredictor, ModelArtifact};
use demand_forecast::report::{percentile_band, Role};
use demand_forecast::synthetic::{synthetic_history, SyntheticWeather};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("Demand Forecast: Weekly Report Example");
    println!("======================================\n");

    // A small exported surrogate of a fitted model, the shape a real JSON
    // artifact would deserialize into
    let mut weights = vec![0.0; FEATURE_ORDER.len()];
    for (name, weight) in [
        ("is_weekend", 220.0),
        ("temp_comfort", 14.0),
        ("precipitation", 9.0),
        ("demand_lag1", 0.35),
        ("demand_lag7", 0.15),
    ] {
        weights[feature_index(name).expect("known feature")] = weight;
    }
    let predictor = LinearPredictor::new(ModelArtifact {
        name: "CatBoost Surrogate".to_string(),
        schema_version: FEATURE_SCHEMA_VERSION,
        intercept: 850.0,
        weights,
        r_squared: Some(0.3652),
        rmse: Some(684.56),
    })?;

    let provider = SyntheticWeather::new(7);
    let pipeline = ForecastPipeline::new(&provider, &predictor);

    let forecast_start = NaiveDate::from_ymd_opt(2024, 11, 4).unwrap();
    let history = synthetic_history(forecast_start - Duration::days(365), 365, 7)?;

    let report = pipeline.run(forecast_start, Some(&history))?;

    if let Some(note) = report.reliability_note() {
        println!("How reliable is this forecast?\n  {}\n", note);
    }

    println!("Complete week breakdown:");
    for day in &report.days {
        println!(
            "\n{} {}, {} - {} demand ({:.0}, {} percentile)",
            day.assessment.tier.icon(),
            day.weekday,
            day.date,
            day.assessment.tier.label(),
            day.predicted_demand,
            percentile_band(day.predicted_demand, &report.thresholds)
        );
        let (platform_base, platform_weather) = day.narrative_for(Role::Platform);
        println!("  Platform: {} {}", platform_base, platform_weather);
        let (restaurant_base, restaurant_weather) = day.narrative_for(Role::Restaurant);
        println!("  Restaurant: {} {}", restaurant_base, restaurant_weather);
    }

    let path = std::env::temp_dir().join("weekly_forecast.csv");
    report.write_csv_file(&path)?;
    println!("\nForecast exported to {}", path.display());

    Ok(())
}
