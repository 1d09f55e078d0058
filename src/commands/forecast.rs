//! Forecast command - fetch history, fit, project, and write the chart CSV

use anyhow::Result;
use chrono::{Duration, Local};
use tracing::info;

use brokerage_tools::forecast::{
    ChartSink, CsvChartSink, CsvSource, ForecastPipeline, LeastSquaresFitter, PriceHistorySource,
    StooqSource,
};
use brokerage_tools::Config;

pub fn run(
    config: &Config,
    symbol: &str,
    years: Option<u32>,
    horizon: Option<u32>,
    output: Option<String>,
    csv: Option<String>,
) -> Result<()> {
    let years = years.unwrap_or(config.forecast.history_years);
    let horizon = horizon.unwrap_or(config.forecast.horizon_days);
    let output = output.unwrap_or_else(|| config.forecast.output.clone());

    let end = Local::now().date_naive();
    let start = end - Duration::days(365 * years as i64);

    println!("\n{}", "=".repeat(60));
    println!("PRICE FORECAST — {}", symbol.to_uppercase());
    println!("{}", "=".repeat(60));
    println!("  History:  {} to {} ({} years)", start, end, years);
    println!("  Horizon:  {} days", horizon);
    println!("  Output:   {}", output);
    println!("{}", "=".repeat(60));

    let forecast = match csv {
        Some(path) => {
            info!("Loading history from local file {}", path);
            run_pipeline(CsvSource::new(path), symbol, start, end, horizon)?
        }
        None => run_pipeline(StooqSource::new(), symbol, start, end, horizon)?,
    };

    CsvChartSink::new(&output).render(&forecast.history, &forecast.projection)?;

    println!("  Observations:   {}", forecast.history.len());
    println!("  In-sample RMSE: {:.4}", forecast.rmse);
    println!(
        "  Projection:     {} points, {} to {}",
        forecast.projection.len(),
        forecast.projection.first().map(|p| p.date.to_string()).unwrap_or_default(),
        forecast.projection.last().map(|p| p.date.to_string()).unwrap_or_default()
    );
    println!("  Chart written to {}", output);
    println!("{}", "=".repeat(60));

    Ok(())
}

fn run_pipeline<S: PriceHistorySource>(
    source: S,
    symbol: &str,
    start: chrono::NaiveDate,
    end: chrono::NaiveDate,
    horizon: u32,
) -> Result<brokerage_tools::forecast::Forecast> {
    let mut pipeline = ForecastPipeline::new(source, LeastSquaresFitter::new(), horizon);
    pipeline.run(symbol, start, end)
}
