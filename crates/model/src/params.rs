//! Parameter point of the SAM model and its flat-vector layout.

use sam_io::N_EVENT_CLASSES;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::priors::Priors;

/// Number of regression coefficients: intercept, antecedent precipitation
/// and one per event-size class.
pub const N_COEF: usize = 2 + N_EVENT_CLASSES;

/// One point in the parameter space.
///
/// Field names in serialized form follow the BUGS model (`deltaX`, `a`,
/// `sig`, `mu.ev`, `sig.ev`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamParams {
    /// Raw block weights, one per block.
    #[serde(rename = "deltaX")]
    pub delta_x: Vec<f64>,
    /// Regression coefficients.
    pub a: [f64; N_COEF],
    /// Residual standard deviation.
    pub sig: f64,
    /// Mean of each event-size class.
    #[serde(rename = "mu.ev")]
    pub mu_ev: [f64; N_EVENT_CLASSES],
    /// Standard deviation of each event-size class.
    #[serde(rename = "sig.ev")]
    pub sig_ev: [f64; N_EVENT_CLASSES],
    /// Imputed event cells, in the row-major order of the missing cells.
    #[serde(rename = "Event.missing", default)]
    pub event_missing: Vec<f64>,
}

impl SamParams {
    /// Flatten in layout order.
    pub fn to_flat(&self) -> Vec<f64> {
        let mut flat = Vec::with_capacity(
            self.delta_x.len() + N_COEF + 1 + 2 * N_EVENT_CLASSES + self.event_missing.len(),
        );
        flat.extend_from_slice(&self.delta_x);
        flat.extend_from_slice(&self.a);
        flat.push(self.sig);
        flat.extend_from_slice(&self.mu_ev);
        flat.extend_from_slice(&self.sig_ev);
        flat.extend_from_slice(&self.event_missing);
        flat
    }

    /// Rebuild from a flat vector produced by [`to_flat`](Self::to_flat).
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ParamLength`] if `flat.len() != layout.dim()`.
    pub fn from_flat(layout: &ParamLayout, flat: &[f64]) -> Result<Self, ModelError> {
        if flat.len() != layout.dim() {
            return Err(ModelError::ParamLength {
                expected: layout.dim(),
                got: flat.len(),
            });
        }
        let (delta_x, rest) = flat.split_at(layout.n_blocks);
        let (a, rest) = rest.split_at(N_COEF);
        let (sig, rest) = rest.split_at(1);
        let (mu_ev, rest) = rest.split_at(N_EVENT_CLASSES);
        let (sig_ev, event_missing) = rest.split_at(N_EVENT_CLASSES);

        Ok(Self {
            delta_x: delta_x.to_vec(),
            a: copy_array(a),
            sig: sig[0],
            mu_ev: copy_array(mu_ev),
            sig_ev: copy_array(sig_ev),
            event_missing: event_missing.to_vec(),
        })
    }

    /// Check the variable-length blocks against `layout`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ShapeMismatch`] for the first block of the
    /// wrong length.
    pub fn check_shape(&self, layout: &ParamLayout) -> Result<(), ModelError> {
        if self.delta_x.len() != layout.n_blocks {
            return Err(ModelError::ShapeMismatch {
                name: "deltaX",
                expected: layout.n_blocks,
                got: self.delta_x.len(),
            });
        }
        if self.event_missing.len() != layout.missing.len() {
            return Err(ModelError::ShapeMismatch {
                name: "Event.missing",
                expected: layout.missing.len(),
                got: self.event_missing.len(),
            });
        }
        Ok(())
    }
}

fn copy_array<const N: usize>(src: &[f64]) -> [f64; N] {
    let mut out = [0.0; N];
    out.copy_from_slice(src);
    out
}

/// Order and names of the free parameters in a flat vector:
/// `deltaX`, `a`, `sig`, `mu.ev`, `sig.ev`, then one entry per missing
/// event cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamLayout {
    n_blocks: usize,
    /// `(row, class)` of each missing event cell, 0-based.
    missing: Vec<(usize, usize)>,
}

impl ParamLayout {
    pub fn new(n_blocks: usize, missing: Vec<(usize, usize)>) -> Self {
        Self { n_blocks, missing }
    }

    pub fn n_blocks(&self) -> usize {
        self.n_blocks
    }

    /// Missing event cells in parameter order.
    pub fn missing(&self) -> &[(usize, usize)] {
        &self.missing
    }

    /// Length of the flat vector.
    pub fn dim(&self) -> usize {
        self.n_blocks + N_COEF + 1 + 2 * N_EVENT_CLASSES + self.missing.len()
    }

    /// BUGS-style names, 1-based (`deltaX[1]`, `a[1]`, ..., `Event[3,2]`).
    pub fn names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.dim());
        names.extend((1..=self.n_blocks).map(|b| format!("deltaX[{b}]")));
        names.extend((1..=N_COEF).map(|j| format!("a[{j}]")));
        names.push("sig".into());
        names.extend((1..=N_EVENT_CLASSES).map(|k| format!("mu.ev[{k}]")));
        names.extend((1..=N_EVENT_CLASSES).map(|k| format!("sig.ev[{k}]")));
        names.extend(
            self.missing
                .iter()
                .map(|&(i, k)| format!("Event[{},{}]", i + 1, k + 1)),
        );
        names
    }

    /// `(lower, upper)` support of each parameter under `priors`.
    pub fn bounds(&self, priors: &Priors) -> Vec<(f64, f64)> {
        let mut b = Vec::with_capacity(self.dim());
        b.extend(std::iter::repeat_n((0.0, f64::INFINITY), self.n_blocks));
        b.extend(std::iter::repeat_n((f64::NEG_INFINITY, f64::INFINITY), N_COEF));
        b.push((0.0, priors.sig_upper()));
        b.extend(std::iter::repeat_n((0.0, priors.event_mean_upper()), N_EVENT_CLASSES));
        b.extend(std::iter::repeat_n((0.0, priors.event_sd_upper()), N_EVENT_CLASSES));
        b.extend(std::iter::repeat_n(
            (f64::NEG_INFINITY, f64::INFINITY),
            self.missing.len(),
        ));
        b
    }
}
