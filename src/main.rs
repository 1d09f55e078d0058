//! Brokerage tools - main entry point
//!
//! This binary provides three subcommands:
//! - charges: compute brokerage charges, break-even, and net P/L for a trade
//! - journal: display the persisted trade journal
//! - forecast: fit a regression on historical closes and project forward

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "brokerage-tools")]
#[command(about = "Brokerage charge calculator with trade journaling and price forecasting", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute charges, break-even, and net P/L for a round trip
    Charges {
        /// Order category (intraday, delivery, cashplus, options)
        #[arg(long, default_value = "intraday")]
        category: String,

        /// Buy price
        #[arg(long)]
        buy: f64,

        /// Sell price
        #[arg(long)]
        sell: f64,

        /// Quantity
        #[arg(long)]
        qty: i64,

        /// Holding period in days (Cash+ only)
        #[arg(long, default_value = "0")]
        days: u32,

        /// Order side for reward:risk evaluation (b/buy or s/sell)
        #[arg(long)]
        side: Option<String>,

        /// Stop-loss or target reference price for reward:risk evaluation
        #[arg(long)]
        second_leg: Option<f64>,

        /// Journal file path (overrides config)
        #[arg(long)]
        journal: Option<String>,
    },

    /// Display the persisted trade journal
    Journal {
        /// Show a single date (DD-MM-YYYY)
        #[arg(long)]
        date: Option<String>,

        /// Journal file path (overrides config)
        #[arg(long)]
        journal: Option<String>,
    },

    /// Download history, fit a regression, and project forward
    Forecast {
        /// Ticker symbol, e.g. AAPL
        #[arg(short, long)]
        symbol: String,

        /// Years of history to fit on (overrides config)
        #[arg(long)]
        years: Option<u32>,

        /// Days to project forward (overrides config)
        #[arg(long)]
        horizon: Option<u32>,

        /// Output path for the chart CSV (overrides config)
        #[arg(short, long)]
        output: Option<String>,

        /// Load history from a local CSV file instead of downloading
        #[arg(long)]
        csv: Option<String>,
    },
}

fn setup_logging(verbose: bool, command_name: &str) -> Result<()> {
    std::fs::create_dir_all("logs")?;

    let log_filename = format!(
        "{}_{}.log",
        command_name,
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    );
    let log_path = PathBuf::from("logs").join(&log_filename);

    // Filter out noisy external crates
    let level = if verbose { "debug" } else { "info" };
    let filter_str = format!("{},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn", level);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let file_appender = tracing_appender::rolling::never("logs", &log_filename);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_appender)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    info!("Log file: {}", log_path.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let command_name = match &cli.command {
        Commands::Charges { .. } => "charges",
        Commands::Journal { .. } => "journal",
        Commands::Forecast { .. } => "forecast",
    };

    setup_logging(cli.verbose, command_name)?;

    let config = brokerage_tools::Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Charges {
            category,
            buy,
            sell,
            qty,
            days,
            side,
            second_leg,
            journal,
        } => commands::charges::run(
            &config, &category, buy, sell, qty, days, side, second_leg, journal,
        ),

        Commands::Journal { date, journal } => commands::journal::run(&config, date, journal),

        Commands::Forecast {
            symbol,
            years,
            horizon,
            output,
            csv,
        } => commands::forecast::run(&config, &symbol, years, horizon, output, csv),
    }
}
