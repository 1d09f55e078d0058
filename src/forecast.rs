//! Price forecasting pipeline
//!
//! Loads a historical daily close series, derives calendar features, fits a
//! regression model through the `RegressionFitter` seam, and projects a
//! fixed horizon forward. Data sources and the chart output are injected as
//! traits so the pipeline itself stays free of transport and rendering
//! concerns.

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Duration, NaiveDate};
use statrs::statistics::Statistics;
use std::path::{Path, PathBuf};
use std::time::Duration as StdDuration;
use tracing::{debug, info};

use crate::types::PricePoint;

const STOOQ_DAILY_URL: &str = "https://stooq.com/q/d/l/";

/// Number of calendar features fed to the fitter: year, month, day
pub const FEATURE_COUNT: usize = 3;

/// Calendar features for one date
pub fn calendar_features(date: NaiveDate) -> [f64; FEATURE_COUNT] {
    [
        date.year() as f64,
        date.month() as f64,
        date.day() as f64,
    ]
}

// =============================================================================
// Price history sources
// =============================================================================

/// A time-ordered source of (date, close) observations
pub trait PriceHistorySource {
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<PricePoint>>;
}

/// Daily close history from the Stooq public CSV endpoint
pub struct StooqSource {
    client: reqwest::blocking::Client,
}

impl StooqSource {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(StdDuration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");
        StooqSource { client }
    }

    /// Convert a ticker to Stooq form: AAPL -> aapl.us
    ///
    /// Symbols that already carry a market suffix (a dot) pass through
    /// lowercased.
    pub fn to_stooq_symbol(symbol: &str) -> String {
        let lower = symbol.to_lowercase();
        if lower.contains('.') {
            lower
        } else {
            format!("{}.us", lower)
        }
    }
}

impl Default for StooqSource {
    fn default() -> Self {
        StooqSource::new()
    }
}

impl PriceHistorySource for StooqSource {
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<PricePoint>> {
        let stooq_symbol = Self::to_stooq_symbol(symbol);
        info!("Fetching {} daily closes from stooq", stooq_symbol);

        let d1 = start.format("%Y%m%d").to_string();
        let d2 = end.format("%Y%m%d").to_string();
        let response = self
            .client
            .get(STOOQ_DAILY_URL)
            .query(&[
                ("s", stooq_symbol.as_str()),
                ("d1", d1.as_str()),
                ("d2", d2.as_str()),
                ("i", "d"),
            ])
            .send()
            .context("Failed to fetch price history")?;

        if !response.status().is_success() {
            bail!("Price history request failed: HTTP {}", response.status());
        }

        let body = response.text().context("Failed to read response body")?;
        let points = parse_close_csv(body.as_bytes())
            .with_context(|| format!("Failed to parse price history for {}", symbol))?;

        debug!("Fetched {} observations for {}", points.len(), symbol);
        Ok(points)
    }
}

/// Daily close history from a local CSV file with Date and Close columns
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        CsvSource {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl PriceHistorySource for CsvSource {
    fn fetch(&self, _symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<PricePoint>> {
        let file = std::fs::File::open(&self.path)
            .with_context(|| format!("Failed to open CSV file: {}", self.path.display()))?;
        let points = parse_close_csv(file)?;
        Ok(points
            .into_iter()
            .filter(|p| p.date >= start && p.date <= end)
            .collect())
    }
}

/// Parse a CSV of daily observations into close prices
///
/// Expects a header row; the date is the first column and the close comes
/// from a "Close" column when present, otherwise the second column.
fn parse_close_csv(reader: impl std::io::Read) -> Result<Vec<PricePoint>> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let close_idx = csv_reader
        .headers()
        .context("Missing CSV header row")?
        .iter()
        .position(|h| h.eq_ignore_ascii_case("close"))
        .unwrap_or(1);

    let mut points = Vec::new();
    for (row_idx, result) in csv_reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;

        let date_str = record.get(0).context("Missing date column")?;
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .with_context(|| format!("Failed to parse date: {}", date_str))?;

        let close: f64 = record
            .get(close_idx)
            .context("Missing close column")?
            .parse()
            .with_context(|| format!("Failed to parse close on row {}", row_idx + 1))?;

        points.push(PricePoint { date, close });
    }

    Ok(points)
}

// =============================================================================
// Regression fitter
// =============================================================================

/// The model-fitting seam: fit on feature rows, then predict new rows
pub trait RegressionFitter {
    fn fit(&mut self, features: &[[f64; FEATURE_COUNT]], target: &[f64]) -> Result<()>;
    fn predict(&self, features: &[[f64; FEATURE_COUNT]]) -> Result<Vec<f64>>;
}

/// Ordinary least squares on the calendar features
///
/// Features are centered before solving the normal equations to keep the
/// system well conditioned for year-scale values.
#[derive(Debug, Default)]
pub struct LeastSquaresFitter {
    coefficients: Option<Coefficients>,
}

#[derive(Debug, Clone)]
struct Coefficients {
    intercept: f64,
    slopes: [f64; FEATURE_COUNT],
}

impl LeastSquaresFitter {
    pub fn new() -> Self {
        LeastSquaresFitter::default()
    }
}

impl RegressionFitter for LeastSquaresFitter {
    fn fit(&mut self, features: &[[f64; FEATURE_COUNT]], target: &[f64]) -> Result<()> {
        if features.is_empty() || features.len() != target.len() {
            bail!(
                "cannot fit on {} feature rows and {} targets",
                features.len(),
                target.len()
            );
        }

        let n = features.len() as f64;
        let mut x_mean = [0.0; FEATURE_COUNT];
        for row in features {
            for (m, v) in x_mean.iter_mut().zip(row) {
                *m += v / n;
            }
        }
        let y_mean = target.iter().sum::<f64>() / n;

        // Normal equations on centered data: (Xc^T Xc) b = Xc^T yc
        let mut xtx = [[0.0; FEATURE_COUNT]; FEATURE_COUNT];
        let mut xty = [0.0; FEATURE_COUNT];
        for (row, &y) in features.iter().zip(target) {
            let mut centered = [0.0; FEATURE_COUNT];
            for k in 0..FEATURE_COUNT {
                centered[k] = row[k] - x_mean[k];
            }
            let yc = y - y_mean;
            for i in 0..FEATURE_COUNT {
                for j in 0..FEATURE_COUNT {
                    xtx[i][j] += centered[i] * centered[j];
                }
                xty[i] += centered[i] * yc;
            }
        }

        let slopes = solve_3x3(xtx, xty).context("normal equations are singular")?;
        let intercept = y_mean
            - slopes
                .iter()
                .zip(&x_mean)
                .map(|(b, m)| b * m)
                .sum::<f64>();

        self.coefficients = Some(Coefficients { intercept, slopes });
        Ok(())
    }

    fn predict(&self, features: &[[f64; FEATURE_COUNT]]) -> Result<Vec<f64>> {
        let coeffs = self
            .coefficients
            .as_ref()
            .context("predict called before fit")?;

        Ok(features
            .iter()
            .map(|row| {
                coeffs.intercept
                    + coeffs
                        .slopes
                        .iter()
                        .zip(row)
                        .map(|(b, x)| b * x)
                        .sum::<f64>()
            })
            .collect())
    }
}

/// Gaussian elimination with partial pivoting for the 3x3 normal system
fn solve_3x3(
    mut a: [[f64; FEATURE_COUNT]; FEATURE_COUNT],
    mut b: [f64; FEATURE_COUNT],
) -> Option<[f64; FEATURE_COUNT]> {
    for col in 0..FEATURE_COUNT {
        let pivot = (col..FEATURE_COUNT)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..FEATURE_COUNT {
            let factor = a[row][col] / a[col][col];
            for k in col..FEATURE_COUNT {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0; FEATURE_COUNT];
    for row in (0..FEATURE_COUNT).rev() {
        let tail: f64 = ((row + 1)..FEATURE_COUNT).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}

// =============================================================================
// Chart sink
// =============================================================================

/// Rendering seam: receives the historical and projected series
pub trait ChartSink {
    fn render(&mut self, history: &[PricePoint], projection: &[PricePoint]) -> Result<()>;
}

/// Writes both series to a CSV file for external plotting
pub struct CsvChartSink {
    path: PathBuf,
}

impl CsvChartSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        CsvChartSink {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ChartSink for CsvChartSink {
    fn render(&mut self, history: &[PricePoint], projection: &[PricePoint]) -> Result<()> {
        let mut writer = csv::Writer::from_path(&self.path)
            .with_context(|| format!("Failed to create chart file: {}", self.path.display()))?;

        writer.write_record(["date", "close", "series"])?;
        for point in history {
            writer.write_record([
                point.date.format("%Y-%m-%d").to_string(),
                point.close.to_string(),
                "historical".to_string(),
            ])?;
        }
        for point in projection {
            writer.write_record([
                point.date.format("%Y-%m-%d").to_string(),
                point.close.to_string(),
                "predicted".to_string(),
            ])?;
        }
        writer.flush().context("Failed to flush chart file")?;
        Ok(())
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// Completed forecast: the fitted history and the forward projection
#[derive(Debug, Clone)]
pub struct Forecast {
    pub history: Vec<PricePoint>,
    pub projection: Vec<PricePoint>,
    /// In-sample root mean squared error of the fit
    pub rmse: f64,
}

/// Fetch -> fit -> project
pub struct ForecastPipeline<S: PriceHistorySource, F: RegressionFitter> {
    source: S,
    fitter: F,
    horizon_days: u32,
}

impl<S: PriceHistorySource, F: RegressionFitter> ForecastPipeline<S, F> {
    pub fn new(source: S, fitter: F, horizon_days: u32) -> Self {
        ForecastPipeline {
            source,
            fitter,
            horizon_days,
        }
    }

    /// Run the pipeline: fit on [start, end] and project the horizon
    /// forward starting the day after `end`
    pub fn run(&mut self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Forecast> {
        let history = self.source.fetch(symbol, start, end)?;
        if history.is_empty() {
            bail!("no price history for {} between {} and {}", symbol, start, end);
        }
        info!("Fitting on {} observations for {}", history.len(), symbol);

        let features: Vec<[f64; FEATURE_COUNT]> =
            history.iter().map(|p| calendar_features(p.date)).collect();
        let target: Vec<f64> = history.iter().map(|p| p.close).collect();

        self.fitter.fit(&features, &target)?;

        let fitted = self.fitter.predict(&features)?;
        let squared_errors: Vec<f64> = fitted
            .iter()
            .zip(&target)
            .map(|(f, t)| (f - t) * (f - t))
            .collect();
        let rmse = squared_errors.iter().mean().sqrt();
        debug!("In-sample RMSE: {:.4}", rmse);

        let future_dates: Vec<NaiveDate> = (1..=self.horizon_days as i64)
            .map(|offset| end + Duration::days(offset))
            .collect();
        let future_features: Vec<[f64; FEATURE_COUNT]> =
            future_dates.iter().map(|d| calendar_features(*d)).collect();
        let predicted = self.fitter.predict(&future_features)?;

        let projection = future_dates
            .into_iter()
            .zip(predicted)
            .map(|(date, close)| PricePoint { date, close })
            .collect();

        Ok(Forecast {
            history,
            projection,
            rmse,
        })
    }
}
