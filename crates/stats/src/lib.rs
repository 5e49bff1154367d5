//! Summary statistics for parameter and replicate draws.

use serde::Serialize;

/// Arithmetic mean of a slice. Returns 0.0 if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Sample variance with N-1 denominator (matching R's `var()`).
/// Returns 0.0 if fewer than 2 elements.
pub fn variance(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;
    let mean = data.iter().sum::<f64>() / nf;
    data.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / (nf - 1.0)
}

/// Sample standard deviation with N-1 denominator (matching R's `sd()`).
/// Returns 0.0 if fewer than 2 elements.
pub fn sd(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// R's default quantile algorithm (type=7).
///
/// **Expects pre-sorted input** (caller's responsibility).
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn quantile_type7(sorted: &[f64], p: f64) -> f64 {
    assert!(
        !sorted.is_empty(),
        "quantile_type7: input must not be empty"
    );
    let n = sorted.len();
    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    sorted[lo] + (h - h.floor()) * (sorted[hi] - sorted[lo])
}

/// Equal-tailed interval holding `level` of the mass of pre-sorted draws.
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn credible_interval(sorted: &[f64], level: f64) -> (f64, f64) {
    let tail = 0.5 * (1.0 - level);
    (
        quantile_type7(sorted, tail),
        quantile_type7(sorted, 1.0 - tail),
    )
}

/// Share of draws at or above `observed`: the posterior (or prior)
/// predictive p-value of one statistic. Returns `None` for no draws.
pub fn tail_probability(draws: &[f64], observed: f64) -> Option<f64> {
    if draws.is_empty() {
        return None;
    }
    let above = draws.iter().filter(|&&d| d >= observed).count();
    Some(above as f64 / draws.len() as f64)
}

/// Mean, sd and the 2.5/50/97.5 % quantiles of a set of draws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub n: usize,
    pub mean: f64,
    pub sd: f64,
    pub q025: f64,
    pub q50: f64,
    pub q975: f64,
}

impl Summary {
    /// Summarizes `draws`. Returns `None` if there are no draws or any draw
    /// is not finite.
    pub fn from_draws(draws: &[f64]) -> Option<Self> {
        if draws.is_empty() || draws.iter().any(|d| !d.is_finite()) {
            return None;
        }
        let mut sorted = draws.to_vec();
        sorted.sort_by(f64::total_cmp);
        let (q025, q975) = credible_interval(&sorted, 0.95);
        Some(Self {
            n: draws.len(),
            mean: mean(draws),
            sd: sd(draws),
            q025,
            q50: quantile_type7(&sorted, 0.5),
            q975,
        })
    }
}

/// Summarizes each column of a draws-by-variable table.
///
/// Every row must have the same length; a column whose draws are not all
/// finite gets `None`.
pub fn summarize_columns(rows: &[Vec<f64>]) -> Vec<Option<Summary>> {
    let n_cols = rows.first().map_or(0, Vec::len);
    (0..n_cols)
        .map(|j| {
            let column: Vec<f64> = rows.iter().map(|r| r[j]).collect();
            Summary::from_draws(&column)
        })
        .collect()
}
