//! Normalized monthly weights derived from one raw block-weight draw.

use ndarray::Array2;

use crate::block::BlockTable;
use crate::error::AntecedentError;
use crate::mask::HarvestMask;

/// Weights derived from one raw weight vector.
///
/// All matrices have shape `(12, n_lag)`: rows are 0-based calendar months,
/// columns are lag-years (0 = observation year).
#[derive(Debug, Clone, PartialEq)]
pub struct AntecedentWeights {
    delta: Array2<f64>,
    weight: Array2<f64>,
    lag_totals: Vec<f64>,
    total: f64,
    ordered: Vec<f64>,
    cumulative: Vec<f64>,
}

impl AntecedentWeights {
    /// Zero-filled buffers for a window of `n_lag` lag-years.
    pub fn zeros(n_lag: usize) -> Self {
        Self {
            delta: Array2::zeros((12, n_lag)),
            weight: Array2::zeros((12, n_lag)),
            lag_totals: vec![0.0; n_lag],
            total: 0.0,
            ordered: vec![0.0; 12 * n_lag],
            cumulative: vec![0.0; 12 * n_lag],
        }
    }

    /// Number of lag-years.
    pub fn n_lag(&self) -> usize {
        self.delta.ncols()
    }

    /// Masked, unnormalized month weights (`delta`).
    pub fn month_weights(&self) -> &Array2<f64> {
        &self.delta
    }

    /// Globally normalized weights; the whole matrix sums to 1.
    pub fn weight(&self) -> &Array2<f64> {
        &self.weight
    }

    /// Normalized weight of 0-based `month` at `lag`.
    pub fn get(&self, month: usize, lag: usize) -> f64 {
        self.weight[[month, lag]]
    }

    /// Sum of the masked month weights (the normalization denominator).
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Share of the total weight carried by each lag-year; sums to 1.
    pub fn yearly(&self) -> Vec<f64> {
        self.lag_totals.iter().map(|&s| s / self.total).collect()
    }

    /// Weights normalized within each lag-year, so every column sums to 1.
    ///
    /// # Errors
    ///
    /// Returns [`AntecedentError::ZeroLagWeight`] if some lag-year carries
    /// no weight at all, since its within-year weights are undefined.
    pub fn alpha(&self) -> Result<Array2<f64>, AntecedentError> {
        let mut alpha = self.delta.clone();
        for (lag, (mut col, &sum)) in alpha
            .columns_mut()
            .into_iter()
            .zip(&self.lag_totals)
            .enumerate()
        {
            if sum <= 0.0 {
                return Err(AntecedentError::ZeroLagWeight { lag });
            }
            col /= sum;
        }
        Ok(alpha)
    }

    /// Weights in chronological order from the most recent month backward.
    ///
    /// Entry `lag * 12 + (11 - month)` holds `weight[[month, lag]]`, so the
    /// sequence starts with December of the observation year.
    pub fn ordered(&self) -> &[f64] {
        &self.ordered
    }

    /// Running sum of [`ordered`](Self::ordered); the last entry is 1.
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }
}

/// Validates a raw weight vector against the block count.
pub(crate) fn check_raw(raw: &[f64], n_blocks: usize) -> Result<(), AntecedentError> {
    if raw.len() != n_blocks {
        return Err(AntecedentError::RawWeightLength {
            expected: n_blocks,
            got: raw.len(),
        });
    }
    for (i, &v) in raw.iter().enumerate() {
        if !v.is_finite() || v < 0.0 {
            return Err(AntecedentError::InvalidRawWeight {
                block: i + 1,
                value: v,
            });
        }
    }
    Ok(())
}

/// Fills `out` from a validated raw weight vector.
pub(crate) fn fill_weights(
    blocks: &BlockTable,
    mask: HarvestMask,
    raw: &[f64],
    out: &mut AntecedentWeights,
) -> Result<(), AntecedentError> {
    let n_lag = blocks.n_lag();
    if out.n_lag() != n_lag {
        return Err(AntecedentError::BufferLengthMismatch {
            expected: n_lag,
            got: out.n_lag(),
        });
    }

    // delta[m, t] = deltaX[block(t, m)] * mask(t, m)
    let mut total = 0.0;
    for t in 0..n_lag {
        let mut lag_total = 0.0;
        for m in 0..12 {
            let d = raw[blocks.block(t, m)] * mask.factor(t, m);
            out.delta[[m, t]] = d;
            lag_total += d;
        }
        out.lag_totals[t] = lag_total;
        total += lag_total;
    }

    if !total.is_finite() {
        return Err(AntecedentError::NonFinite {
            stage: "weight normalization",
        });
    }
    if total <= 0.0 {
        return Err(AntecedentError::ZeroTotalWeight);
    }
    out.total = total;

    let mut running = 0.0;
    for t in 0..n_lag {
        for m in 0..12 {
            let w = out.delta[[m, t]] / total;
            out.weight[[m, t]] = w;
            out.ordered[t * 12 + (11 - m)] = w;
        }
    }
    for (c, &w) in out.cumulative.iter_mut().zip(&out.ordered) {
        running += w;
        *c = running;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ogle_weights(raw: &[f64]) -> Result<AntecedentWeights, AntecedentError> {
        let blocks = BlockTable::ogle_default();
        let mut out = AntecedentWeights::zeros(blocks.n_lag());
        check_raw(raw, blocks.n_blocks())?;
        fill_weights(&blocks, HarvestMask::default(), raw, &mut out)?;
        Ok(out)
    }

    #[test]
    fn uniform_raw_gives_equal_unmasked_weights() {
        let w = ogle_weights(&[1.0; 38]).unwrap();
        assert_relative_eq!(w.total(), 57.0, epsilon = 1e-12);
        assert_relative_eq!(w.get(0, 0), 1.0 / 57.0, epsilon = 1e-12);
        assert_eq!(w.get(10, 0), 0.0);
        assert_relative_eq!(w.get(10, 4), 1.0 / 57.0, epsilon = 1e-12);
    }

    #[test]
    fn ordered_starts_with_latest_month() {
        let mut raw = [1.0; 38];
        // Block 9 covers September of the observation year.
        raw[8] = 5.0;
        let w = ogle_weights(&raw).unwrap();
        assert_eq!(&w.ordered()[..3], &[0.0, 0.0, 0.0]);
        assert_relative_eq!(w.ordered()[3], 5.0 / 61.0, epsilon = 1e-12);
        assert_relative_eq!(w.ordered()[12], w.get(11, 1), epsilon = 1e-15);
    }

    #[test]
    fn cumulative_is_monotone_and_ends_at_one() {
        let raw: Vec<f64> = (0..38).map(|i| 0.1 + i as f64).collect();
        let w = ogle_weights(&raw).unwrap();
        assert!(w.cumulative().windows(2).all(|p| p[1] >= p[0]));
        assert_relative_eq!(w.cumulative()[59], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn alpha_undefined_for_empty_lag() {
        let mut raw = [1.0; 38];
        for r in &mut raw[30..34] {
            *r = 0.0;
        }
        let w = ogle_weights(&raw).unwrap();
        assert_eq!(w.alpha(), Err(AntecedentError::ZeroLagWeight { lag: 3 }));
        assert_relative_eq!(w.yearly()[3], 0.0);
    }

    #[test]
    fn zero_in_unmasked_cells_only_is_error() {
        let mut raw = [0.0; 38];
        // Blocks 10..12 are fully masked, so weight there never counts.
        raw[9] = 1.0;
        raw[10] = 1.0;
        raw[11] = 1.0;
        assert_eq!(
            ogle_weights(&raw).unwrap_err(),
            AntecedentError::ZeroTotalWeight
        );
    }

    #[test]
    fn check_raw_rejects_bad_entries() {
        assert!(matches!(
            check_raw(&[1.0, 2.0], 3),
            Err(AntecedentError::RawWeightLength {
                expected: 3,
                got: 2
            })
        ));
        assert!(matches!(
            check_raw(&[1.0, f64::NAN], 2),
            Err(AntecedentError::InvalidRawWeight { block: 2, .. })
        ));
        assert!(matches!(
            check_raw(&[-1.0, 1.0], 2),
            Err(AntecedentError::InvalidRawWeight { block: 1, .. })
        ));
    }

    #[test]
    fn buffer_shape_mismatch() {
        let blocks = BlockTable::ogle_default();
        let mut out = AntecedentWeights::zeros(3);
        assert!(matches!(
            fill_weights(&blocks, HarvestMask::default(), &[1.0; 38], &mut out),
            Err(AntecedentError::BufferLengthMismatch {
                expected: 5,
                got: 3
            })
        ));
    }
}
