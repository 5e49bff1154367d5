//! Post-harvest masking of current-year months.

use crate::error::AntecedentError;

/// Zeroes the weight of months that fall after the annual harvest in the
/// observation year itself (lag 0).
///
/// Precipitation after the harvest cannot influence an ANPP value that has
/// already been measured. With the default harvest month of September,
/// October through December of lag 0 are masked; every other cell keeps
/// its raw weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestMask {
    harvest_month: u8,
}

impl HarvestMask {
    /// Creates a mask for the given 1-indexed harvest month.
    ///
    /// A harvest month of 12 masks nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AntecedentError::InvalidMonth`] if `harvest_month` is
    /// outside 1..=12.
    pub fn new(harvest_month: u8) -> Result<Self, AntecedentError> {
        if !(1..=12).contains(&harvest_month) {
            return Err(AntecedentError::InvalidMonth {
                month: harvest_month,
            });
        }
        Ok(Self { harvest_month })
    }

    /// 1-indexed harvest month.
    pub fn harvest_month(&self) -> u8 {
        self.harvest_month
    }

    /// Returns `true` when the cell at `lag` and 0-based `month` is masked.
    pub fn is_masked(&self, lag: usize, month: usize) -> bool {
        lag == 0 && month + 1 > self.harvest_month as usize
    }

    /// Multiplicative factor applied to the raw weight of a cell.
    pub fn factor(&self, lag: usize, month: usize) -> f64 {
        if self.is_masked(lag, month) { 0.0 } else { 1.0 }
    }

    /// Number of masked cells in a table with `n_lag` lag-years.
    pub fn n_masked(&self, n_lag: usize) -> usize {
        if n_lag == 0 {
            0
        } else {
            12 - self.harvest_month as usize
        }
    }
}

impl Default for HarvestMask {
    fn default() -> Self {
        Self { harvest_month: 9 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_masks_october_to_december_of_lag_zero() {
        let mask = HarvestMask::default();
        for m in 0..9 {
            assert!(!mask.is_masked(0, m), "month index {m} should be kept");
        }
        for m in 9..12 {
            assert!(mask.is_masked(0, m), "month index {m} should be masked");
            assert_eq!(mask.factor(0, m), 0.0);
        }
        assert_eq!(mask.n_masked(5), 3);
    }

    #[test]
    fn earlier_lags_never_masked() {
        let mask = HarvestMask::default();
        for lag in 1..5 {
            for m in 0..12 {
                assert_eq!(mask.factor(lag, m), 1.0);
            }
        }
    }

    #[test]
    fn december_harvest_masks_nothing() {
        let mask = HarvestMask::new(12).unwrap();
        assert!((0..12).all(|m| !mask.is_masked(0, m)));
        assert_eq!(mask.n_masked(5), 0);
    }

    #[test]
    fn rejects_invalid_month() {
        assert_eq!(
            HarvestMask::new(0),
            Err(AntecedentError::InvalidMonth { month: 0 })
        );
        assert_eq!(
            HarvestMask::new(13),
            Err(AntecedentError::InvalidMonth { month: 13 })
        );
    }
}
