//! Weights command: every normalized view of one raw weight vector.

use anyhow::{Context, Result};
use ndarray::Array2;
use serde::Serialize;
use tracing::{info, info_span, warn};

use sam_antecedent::{AntecedentWeights, WeightCalculator};

use crate::cli::WeightsArgs;
use crate::config::SamConfig;
use crate::convert;
use crate::inputs;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// JSON report. Matrices are month rows (January first) by lag-year
/// columns (observation year first).
#[derive(Debug, Serialize)]
pub struct WeightsReport {
    pub n_lag: usize,
    pub n_blocks: usize,
    pub harvest_month: u8,
    pub months: [&'static str; 12],
    pub raw: Vec<f64>,
    pub weight: Vec<Vec<f64>>,
    /// `None` when a lag-year carries no weight.
    pub alpha: Option<Vec<Vec<f64>>>,
    pub yearly: Vec<f64>,
    pub ordered: Vec<f64>,
    pub cumulative: Vec<f64>,
}

impl WeightsReport {
    pub fn new(calc: &WeightCalculator, raw: Vec<f64>, w: &AntecedentWeights) -> Self {
        let alpha = match w.alpha() {
            Ok(a) => Some(rows(&a)),
            Err(e) => {
                warn!(error = %e, "within-year weights undefined");
                None
            }
        };
        Self {
            n_lag: calc.config().n_lag(),
            n_blocks: calc.config().n_blocks(),
            harvest_month: calc.mask().harvest_month(),
            months: MONTHS,
            raw,
            weight: rows(w.weight()),
            alpha,
            yearly: w.yearly(),
            ordered: w.ordered().to_vec(),
            cumulative: w.cumulative().to_vec(),
        }
    }
}

fn rows(m: &Array2<f64>) -> Vec<Vec<f64>> {
    m.rows().into_iter().map(|r| r.to_vec()).collect()
}

/// Run the weights command.
pub fn run(args: WeightsArgs) -> Result<()> {
    let _cmd = info_span!("weights").entered();
    let config = SamConfig::load(args.config.as_deref())?;

    let ant_cfg = convert::build_antecedent_config(&config.antecedent, None)?;
    let calc = WeightCalculator::new(ant_cfg)?;
    let raw = inputs::load_raw(args.raw.as_deref(), calc.config().n_blocks())?;

    let w = calc.weights(&raw).context("failed to normalize raw weights")?;
    info!(
        n_lag = w.n_lag(),
        total = w.total(),
        "weights computed"
    );

    inputs::write_json(&WeightsReport::new(&calc, raw, &w), args.output.as_deref())
}
