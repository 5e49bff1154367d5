//! Logp command: joint log density at one parameter point.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span};

use sam_model::{SamModel, SamParams};

use crate::cli::LogpArgs;
use crate::inputs;

/// A parameter file holds either a named point or a flat vector in
/// layout order.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ParamsFile {
    Named(SamParams),
    Flat(Vec<f64>),
}

#[derive(Debug, Serialize)]
struct LogpReport {
    log_density: f64,
    dim: usize,
}

/// Resolves the parameter point: the file contents, or the model's
/// initial point when no file is given.
pub fn load_params(model: &SamModel, path: Option<&Path>) -> Result<SamParams> {
    let Some(path) = path else {
        return Ok(model.initial_params());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read parameters: {}", path.display()))?;
    let file: ParamsFile = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse parameters: {}", path.display()))?;
    match file {
        ParamsFile::Named(p) => Ok(p),
        ParamsFile::Flat(flat) => Ok(SamParams::from_flat(model.layout(), &flat)?),
    }
}

/// Run the logp command.
pub fn run(args: LogpArgs) -> Result<()> {
    let _cmd = info_span!("logp").entered();
    let (_, model) = inputs::load_model(&args.model)?;
    let params = load_params(&model, args.params.as_deref())?;

    let log_density = model
        .log_density(&params)
        .context("failed to evaluate log density")?;
    info!(log_density, "log density evaluated");

    inputs::write_json(
        &LogpReport {
            log_density,
            dim: model.layout().dim(),
        },
        None,
    )
}
