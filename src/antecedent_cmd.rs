//! Antecedent command: antecedent precipitation for every eligible year.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, info_span};

use sam_antecedent::{AntecedentSeries, WeightCalculator};

use crate::cli::AntecedentArgs;
use crate::config::SamConfig;
use crate::convert;
use crate::inputs;

#[derive(Debug, Serialize)]
pub struct YearValue {
    pub year: i32,
    #[serde(rename = "antX")]
    pub ant_x: f64,
}

#[derive(Debug, Serialize)]
pub struct AntecedentReport {
    pub first_year: i32,
    pub last_year: i32,
    /// Millimeters per input unit.
    pub unit_factor: f64,
    pub values: Vec<YearValue>,
}

impl AntecedentReport {
    pub fn new(calc: &WeightCalculator, series: &AntecedentSeries) -> Self {
        Self {
            first_year: series.first_year(),
            last_year: series.last_year(),
            unit_factor: calc.config().unit().to_mm(),
            values: series
                .iter()
                .map(|(year, ant_x)| YearValue { year, ant_x })
                .collect(),
        }
    }
}

/// Run the antecedent command.
pub fn run(args: AntecedentArgs) -> Result<()> {
    let _cmd = info_span!("antecedent").entered();
    let config = SamConfig::load(args.config.as_deref())?;
    let precip = inputs::load_precip(&config, &args.precip)?;

    let ant_cfg = convert::build_antecedent_config(&config.antecedent, Some(precip.n_years()))?;
    let calc = WeightCalculator::new(ant_cfg)?;
    let raw = inputs::load_raw(args.raw.as_deref(), calc.config().n_blocks())?;

    let series = calc
        .antecedent(&raw, &precip)
        .context("failed to compute antecedent precipitation")?;
    info!(
        first_year = series.first_year(),
        n_values = series.values().len(),
        "antecedent precipitation computed"
    );

    inputs::write_json(&AntecedentReport::new(&calc, &series), args.output.as_deref())
}
