//! Configuration management
//!
//! Loads JSON configuration with defaults for every section. CLI flags
//! override whatever the file provides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub journal: JournalConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).context("Failed to read config file")?;
        let config: Config =
            serde_json::from_str(&contents).context("Failed to parse config JSON")?;
        Ok(config)
    }

    /// Load from a file when given, otherwise use defaults
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Config::from_file(p),
            None => Ok(Config::default()),
        }
    }
}

/// Journal configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Explicit journal file path; never derived from the working directory
    pub path: String,
}

impl Default for JournalConfig {
    fn default() -> Self {
        JournalConfig {
            path: "journal.json".to_string(),
        }
    }
}

/// Forecast configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Years of history to fit on
    pub history_years: u32,
    /// Days to project forward
    pub horizon_days: u32,
    /// Output path for the chart CSV
    pub output: String,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        ForecastConfig {
            history_years: 5,
            horizon_days: 90,
            output: "forecast.csv".to_string(),
        }
    }
}
