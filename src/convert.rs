//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, bail};

use crate::config::*;

use sam_antecedent::{AntecedentConfig, BlockTable, PrecipUnit};
use sam_io::ReaderConfig;
use sam_model::Priors;

/// Parses a precipitation unit name into the corresponding enum variant.
pub fn parse_unit(s: &str) -> Result<PrecipUnit> {
    match s.to_lowercase().as_str() {
        "mm" | "millimeters" | "millimetres" => Ok(PrecipUnit::Millimeters),
        "in" | "inch" | "inches" => Ok(PrecipUnit::Inches),
        other => bail!("unknown precipitation unit: {other:?}"),
    }
}

/// Builds a [`BlockTable`] from 1-based ids, or the Ogle et al. (2015)
/// table when no `blocks` are configured.
///
/// `n_lag`, when set, must match the number of rows.
pub fn build_block_table(ant: &AntecedentToml) -> Result<BlockTable> {
    let table = match &ant.blocks {
        None => BlockTable::ogle_default(),
        Some(rows) => {
            if rows.iter().flatten().any(|&id| id == 0) {
                bail!("block ids are 1-based; found 0 in [antecedent].blocks");
            }
            let n_blocks = ant
                .n_blocks
                .unwrap_or_else(|| rows.iter().flatten().copied().max().unwrap_or(0));
            BlockTable::new(rows.as_slice(), n_blocks).context("invalid [antecedent].blocks")?
        }
    };

    if let Some(n_lag) = ant.n_lag
        && n_lag != table.n_lag()
    {
        bail!(
            "[antecedent].n_lag = {n_lag} does not match the block table ({} lag years)",
            table.n_lag()
        );
    }
    Ok(table)
}

/// Builds an [`AntecedentConfig`] from the TOML antecedent configuration.
///
/// `series_years` is the length of the loaded precipitation series and is
/// used when `n_years` is not configured; without either, the window is
/// a single eligible year.
pub fn build_antecedent_config(
    ant: &AntecedentToml,
    series_years: Option<usize>,
) -> Result<AntecedentConfig> {
    let blocks = build_block_table(ant)?;
    let n_years = ant.n_years.or(series_years).unwrap_or(blocks.n_lag());
    let cfg = AntecedentConfig::new(blocks)
        .with_n_years(n_years)
        .with_harvest_month(ant.harvest_month)
        .with_unit(parse_unit(&ant.unit)?);
    cfg.validate().context("invalid [antecedent] configuration")?;
    Ok(cfg)
}

/// Builds a [`ReaderConfig`] from the TOML I/O configuration.
pub fn build_reader_config(io: &IoToml) -> Result<ReaderConfig> {
    let cfg = ReaderConfig::default()
        .with_na_marker(&io.na)
        .with_year_column(&io.year_column)
        .with_long_columns(&io.month_column, &io.precip_column)
        .with_anpp_column(&io.anpp_column)
        .with_event_columns(io.event_columns.clone());
    cfg.validate().context("invalid [io] configuration")?;
    Ok(cfg)
}

/// Builds [`Priors`] from the TOML prior configuration.
pub fn build_priors(p: &PriorsToml) -> Result<Priors> {
    let priors = Priors::default()
        .with_delta(p.delta_shape, p.delta_rate)
        .with_coef_precision(p.coef_precision)
        .with_sig_upper(p.sig_upper)
        .with_event_upper(p.event_mean_upper, p.event_sd_upper);
    priors.validate().context("invalid [priors] configuration")?;
    Ok(priors)
}
