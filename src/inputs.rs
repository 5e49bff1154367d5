//! Loading shared by the subcommands: raw weights, tables and the model.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::info;

use sam_antecedent::{MonthlyPrecip, WeightCalculator};
use sam_io::{read_anpp_dataset, read_monthly_precip};
use sam_model::SamModel;

use crate::cli::ModelArgs;
use crate::config::SamConfig;
use crate::convert;

/// Raw block weights from a JSON array, or all ones.
pub fn load_raw(path: Option<&Path>, n_blocks: usize) -> Result<Vec<f64>> {
    let Some(path) = path else {
        return Ok(vec![1.0; n_blocks]);
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read raw weights: {}", path.display()))?;
    let raw: Vec<f64> = serde_json::from_str(&text)
        .with_context(|| format!("raw weights must be a JSON array: {}", path.display()))?;
    if raw.len() != n_blocks {
        bail!(
            "{} holds {} raw weights, block table has {n_blocks} blocks",
            path.display(),
            raw.len()
        );
    }
    Ok(raw)
}

/// Reads the monthly precipitation table named on the command line.
pub fn load_precip(config: &SamConfig, path: &Path) -> Result<MonthlyPrecip> {
    let reader_cfg = convert::build_reader_config(&config.io)?;
    let precip = read_monthly_precip(path, &reader_cfg)
        .with_context(|| format!("failed to read precipitation: {}", path.display()))?;
    info!(
        first_year = precip.first_year(),
        last_year = precip.last_year(),
        n_missing = precip.n_missing(),
        "precipitation loaded"
    );
    Ok(precip)
}

/// Loads the configuration, both tables, and assembles the model.
pub fn load_model(args: &ModelArgs) -> Result<(SamConfig, SamModel)> {
    let config = SamConfig::load(args.config.as_deref())?;
    let precip = load_precip(&config, &args.precip)?;

    let reader_cfg = convert::build_reader_config(&config.io)?;
    let dataset = read_anpp_dataset(&args.data, &reader_cfg)
        .with_context(|| format!("failed to read ANPP data: {}", args.data.display()))?;
    info!(
        n_obs = dataset.len(),
        n_missing_events = dataset.events().n_missing(),
        "ANPP data loaded"
    );

    let ant_cfg = convert::build_antecedent_config(&config.antecedent, Some(precip.n_years()))?;
    let calculator = WeightCalculator::new(ant_cfg)?;
    let priors = convert::build_priors(&config.priors)?;
    let model = SamModel::new(calculator, precip, dataset, priors)
        .context("failed to assemble model")?;
    Ok((config, model))
}

/// Writes pretty JSON to `output`, or to stdout.
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write output: {}", path.display()))?;
            info!(path = %path.display(), "output written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn raw_defaults_to_ones() {
        assert_eq!(load_raw(None, 3).unwrap(), vec![1.0; 3]);
    }

    #[test]
    fn raw_from_json_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "[0.5, 1.5, 2.0]").unwrap();
        assert_eq!(load_raw(Some(f.path()), 3).unwrap(), vec![0.5, 1.5, 2.0]);

        let err = load_raw(Some(f.path()), 4).unwrap_err();
        assert!(err.to_string().contains("block table has 4 blocks"));
    }

    #[test]
    fn raw_rejects_non_array() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{{\"deltaX\": 1}}").unwrap();
        assert!(load_raw(Some(f.path()), 1).is_err());
    }

    #[test]
    fn json_written_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json(&vec![1, 2], Some(&path)).unwrap();
        let back: Vec<i32> = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, vec![1, 2]);
    }
}
