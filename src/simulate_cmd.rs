//! Simulate command: prior-predictive draws of parameters and ANPP.

use anyhow::{Context, Result, bail};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{info, info_span, trace};

use sam_model::SamModel;
use sam_stats::{Summary, summarize_columns, tail_probability};

use crate::cli::SimulateArgs;
use crate::inputs;

#[derive(Debug, Serialize)]
pub struct ParameterSummary {
    pub name: String,
    /// `None` if any draw was not finite.
    pub summary: Option<Summary>,
}

#[derive(Debug, Serialize)]
pub struct ObservationSummary {
    pub year: i32,
    pub observed: f64,
    #[serde(rename = "antX")]
    pub ant_x: Option<Summary>,
    #[serde(rename = "ANPP.rep")]
    pub replicate: Option<Summary>,
    /// Share of replicates at or above the observed value.
    pub p_tail: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub draws: usize,
    pub seed: Option<u64>,
    pub parameters: Vec<ParameterSummary>,
    pub observations: Vec<ObservationSummary>,
}

/// Run the simulate command.
pub fn run(args: SimulateArgs) -> Result<()> {
    let _cmd = info_span!("simulate").entered();
    let (config, model) = inputs::load_model(&args.model)?;

    let draws = args.draws.unwrap_or(config.simulate.draws);
    if draws == 0 {
        bail!("number of draws must be at least 1");
    }
    let seed = args.seed.or(config.seed);
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };

    let mut report = simulate(&model, draws, &mut rng)?;
    report.seed = seed;
    inputs::write_json(&report, args.output.as_deref())
}

/// Draws `draws` prior points, their antecedent values and one ANPP
/// replicate each, then summarizes every quantity.
pub fn simulate(model: &SamModel, draws: usize, rng: &mut impl Rng) -> Result<SimulationReport> {
    let mut param_rows = Vec::with_capacity(draws);
    let mut ant_rows = Vec::with_capacity(draws);
    let mut rep_rows = Vec::with_capacity(draws);

    for d in 0..draws {
        let params = model
            .draw_prior(rng)
            .with_context(|| format!("prior draw {d} failed"))?;
        ant_rows.push(
            model
                .antecedent(&params)
                .with_context(|| format!("antecedent values for draw {d} failed"))?,
        );
        rep_rows.push(
            model
                .replicate(&params, rng)
                .with_context(|| format!("replicates for draw {d} failed"))?,
        );
        param_rows.push(params.to_flat());
        trace!(draw = d, "prior draw complete");
    }

    let parameters = model
        .layout()
        .names()
        .into_iter()
        .zip(summarize_columns(&param_rows))
        .map(|(name, summary)| ParameterSummary { name, summary })
        .collect();

    let ant_summaries = summarize_columns(&ant_rows);
    let rep_summaries = summarize_columns(&rep_rows);
    let observations = model
        .dataset()
        .observations()
        .iter()
        .enumerate()
        .map(|(i, obs)| {
            let reps: Vec<f64> = rep_rows.iter().map(|r| r[i]).collect();
            ObservationSummary {
                year: obs.year,
                observed: obs.anpp,
                ant_x: ant_summaries[i],
                replicate: rep_summaries[i],
                p_tail: tail_probability(&reps, obs.anpp),
            }
        })
        .collect();

    info!(draws, n_obs = model.n_obs(), "prior-predictive simulation complete");
    Ok(SimulationReport {
        draws,
        seed: None,
        parameters,
        observations,
    })
}
