//! Missing-data submodel for the event-size covariates.
//!
//! Every cell of class `k`, observed or not, is `Normal(mu_ev[k], sig_ev[k])`.
//! Observed cells contribute likelihood terms; missing cells are latent
//! parameters stored in row-major order.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use sam_io::{EventMatrix, N_EVENT_CLASSES};

use crate::density;
use crate::error::ModelError;

/// Completed event matrix with `missing` written into the missing cells.
///
/// # Errors
///
/// Returns [`ModelError::ShapeMismatch`] if `missing` does not hold one
/// value per missing cell.
pub fn complete(
    events: &EventMatrix,
    missing: &[f64],
) -> Result<Vec<[f64; N_EVENT_CLASSES]>, ModelError> {
    events.fill(missing).ok_or(ModelError::ShapeMismatch {
        name: "Event.missing",
        expected: events.n_missing(),
        got: missing.len(),
    })
}

/// Log density of every event cell given the class means and sds.
///
/// `sig_ev` must already be positive.
pub fn log_density(
    events: &[[f64; N_EVENT_CLASSES]],
    mu_ev: &[f64; N_EVENT_CLASSES],
    sig_ev: &[f64; N_EVENT_CLASSES],
) -> Result<f64, ModelError> {
    let mut lp = 0.0;
    for row in events {
        for k in 0..N_EVENT_CLASSES {
            lp += density::normal(mu_ev[k], sig_ev[k], row[k], "event cells")?;
        }
    }
    Ok(lp)
}

/// Draw a value for every missing cell of `events`.
///
/// # Errors
///
/// Returns [`ModelError::NonFinite`] if a class mean or sd cannot
/// parameterize a Normal.
pub fn draw_missing(
    events: &EventMatrix,
    mu_ev: &[f64; N_EVENT_CLASSES],
    sig_ev: &[f64; N_EVENT_CLASSES],
    rng: &mut impl Rng,
) -> Result<Vec<f64>, ModelError> {
    let dists = (0..N_EVENT_CLASSES)
        .map(|k| Normal::new(mu_ev[k], sig_ev[k]))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ModelError::NonFinite {
            stage: "event draws",
        })?;
    Ok(events
        .missing_cells()
        .into_iter()
        .map(|(_, k)| dists[k].sample(rng))
        .collect())
}

/// Mean and sample sd of the observed cells of each class.
///
/// Classes with fewer than two observed cells get `None`.
pub fn observed_moments(events: &EventMatrix) -> [Option<(f64, f64)>; N_EVENT_CLASSES] {
    std::array::from_fn(|k| {
        let values: Vec<f64> = events.observed(k).collect();
        if values.len() < 2 {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        Some((mean, var.sqrt()))
    })
}
