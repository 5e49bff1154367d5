use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level SAM configuration (`sam.toml`).
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SamConfig {
    /// Global RNG seed.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Lookback window, block table and units.
    #[serde(default)]
    pub antecedent: AntecedentToml,

    /// Table reader settings.
    #[serde(default)]
    pub io: IoToml,

    /// Prior hyperparameters.
    #[serde(default)]
    pub priors: PriorsToml,

    /// Prior-predictive simulation settings.
    #[serde(default)]
    pub simulate: SimulateToml,
}

impl SamConfig {
    /// Reads and parses a TOML file, or returns the defaults when no path
    /// is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AntecedentToml {
    /// Number of lag years; must match `blocks` when both are set.
    #[serde(default)]
    pub n_lag: Option<usize>,
    /// Years of precipitation to use; defaults to the whole series.
    #[serde(default)]
    pub n_years: Option<usize>,
    #[serde(default = "default_harvest_month")]
    pub harvest_month: u8,
    #[serde(default = "default_unit")]
    pub unit: String,
    /// 1-based block ids, one row of 12 months per lag year.
    #[serde(default)]
    pub blocks: Option<Vec<Vec<usize>>>,
    /// Number of blocks; defaults to the largest id in `blocks`.
    #[serde(default)]
    pub n_blocks: Option<usize>,
}

impl Default for AntecedentToml {
    fn default() -> Self {
        Self {
            n_lag: None,
            n_years: None,
            harvest_month: default_harvest_month(),
            unit: default_unit(),
            blocks: None,
            n_blocks: None,
        }
    }
}

fn default_harvest_month() -> u8 {
    9
}
fn default_unit() -> String {
    "mm".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    #[serde(default = "default_na")]
    pub na: String,
    #[serde(default = "default_year_column")]
    pub year_column: String,
    #[serde(default = "default_month_column")]
    pub month_column: String,
    #[serde(default = "default_precip_column")]
    pub precip_column: String,
    #[serde(default = "default_anpp_column")]
    pub anpp_column: String,
    #[serde(default = "default_event_columns")]
    pub event_columns: [String; 4],
}

impl Default for IoToml {
    fn default() -> Self {
        Self {
            na: default_na(),
            year_column: default_year_column(),
            month_column: default_month_column(),
            precip_column: default_precip_column(),
            anpp_column: default_anpp_column(),
            event_columns: default_event_columns(),
        }
    }
}

fn default_na() -> String {
    "NA".to_string()
}
fn default_year_column() -> String {
    "Year".to_string()
}
fn default_month_column() -> String {
    "Month".to_string()
}
fn default_precip_column() -> String {
    "ppt".to_string()
}
fn default_anpp_column() -> String {
    "ANPP".to_string()
}
fn default_event_columns() -> [String; 4] {
    ["Event1", "Event2", "Event3", "Event4"].map(String::from)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PriorsToml {
    #[serde(default = "default_one")]
    pub delta_shape: f64,
    #[serde(default = "default_one")]
    pub delta_rate: f64,
    #[serde(default = "default_coef_precision")]
    pub coef_precision: f64,
    #[serde(default = "default_sig_upper")]
    pub sig_upper: f64,
    #[serde(default = "default_event_upper")]
    pub event_mean_upper: f64,
    #[serde(default = "default_event_upper")]
    pub event_sd_upper: f64,
}

impl Default for PriorsToml {
    fn default() -> Self {
        Self {
            delta_shape: default_one(),
            delta_rate: default_one(),
            coef_precision: default_coef_precision(),
            sig_upper: default_sig_upper(),
            event_mean_upper: default_event_upper(),
            event_sd_upper: default_event_upper(),
        }
    }
}

fn default_one() -> f64 {
    1.0
}
fn default_coef_precision() -> f64 {
    1.0e-7
}
fn default_sig_upper() -> f64 {
    100.0
}
fn default_event_upper() -> f64 {
    500.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulateToml {
    #[serde(default = "default_draws")]
    pub draws: usize,
}

impl Default for SimulateToml {
    fn default() -> Self {
        Self {
            draws: default_draws(),
        }
    }
}

fn default_draws() -> usize {
    1000
}
