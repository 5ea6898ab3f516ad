use chrono::{Duration, NaiveDate};
use demand_forecast::pipeline::ForecastPipeline;
use demand_forecast::predictor::SeasonalBaseline;
use demand_forecast::report::{Role, SessionContext};
use demand_forecast::synthetic::{synthetic_history, SyntheticWeather};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("Demand Forecast: Basic Pipeline Example");
    println!("=======================================\n");

    // Synthetic weather and history keep the demo deterministic and offline
    let provider = SyntheticWeather::new(42);
    let predictor = SeasonalBaseline::new();
    let pipeline = ForecastPipeline::new(&provider, &predictor);

    let forecast_start = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
    let history = synthetic_history(forecast_start - Duration::days(180), 180, 42)?;

    let report = pipeline.run(forecast_start, Some(&history))?;

    println!("7-day forecast ({}):", report.model);
    for day in &report.days {
        println!(
            "  {} {:<9} {:>5.1}C / {:>5.1}C {:>5.1}mm  demand {:>6.0}  {} {}",
            day.date,
            day.weekday,
            day.temp_max,
            day.temp_min,
            day.precipitation,
            day.predicted_demand,
            day.assessment.tier.icon(),
            day.assessment.tier.label()
        );
    }

    let summary = &report.summary;
    println!("\nWeek summary:");
    println!(
        "  Average: {:.0} ({:+.1}% vs historical {:.0})",
        summary.week_avg, summary.vs_historical_pct, report.historical_mean
    );
    println!("  Total: {:.0}", summary.week_total);
    println!(
        "  High demand days: {} of {}",
        summary.high_demand_days,
        report.days.len()
    );
    println!("  Peak: {} ({:.0})", summary.peak_date, summary.peak_value);
    println!("  Assessment: {}", summary.assessment.label());

    // The render layer receives the session explicitly
    let context = SessionContext {
        role: Role::Restaurant,
        dark_mode: false,
    };

    println!("\nTop priority days ({:?} view):", context.role);
    for day in report.priority_days(3) {
        let (base, weather) = day.narrative_for(context.role);
        println!(
            "\n  {} {}, {} - {:.0} expected",
            day.assessment.tier.icon(),
            day.weekday,
            day.date,
            day.predicted_demand
        );
        println!("    {}", base);
        println!("    {}", weather);
    }

    Ok(())
}
