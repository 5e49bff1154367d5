//! Configuration for the antecedent weight calculator.

use serde::{Deserialize, Serialize};

use crate::block::BlockTable;
use crate::error::AntecedentError;
use crate::mask::HarvestMask;

/// Millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Unit of the monthly precipitation series.
///
/// Antecedent values are always reported in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecipUnit {
    /// Series is already in millimeters.
    #[default]
    Millimeters,
    /// Series is in inches and is scaled by 25.4.
    Inches,
}

impl PrecipUnit {
    /// Factor converting one unit of the series to millimeters.
    pub fn to_mm(self) -> f64 {
        match self {
            Self::Millimeters => 1.0,
            Self::Inches => MM_PER_INCH,
        }
    }
}

/// Immutable configuration of a [`WeightCalculator`](crate::WeightCalculator).
///
/// # Example
///
/// ```
/// use sam_antecedent::{AntecedentConfig, BlockTable, PrecipUnit};
///
/// let config = AntecedentConfig::new(BlockTable::ogle_default())
///     .with_n_years(91)
///     .with_unit(PrecipUnit::Inches);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AntecedentConfig {
    blocks: BlockTable,
    n_years: usize,
    harvest_month: u8,
    unit: PrecipUnit,
}

impl AntecedentConfig {
    /// Creates a configuration around a validated block table.
    ///
    /// Defaults: `n_years = n_lag` (one eligible year), harvest in
    /// September, series in millimeters.
    pub fn new(blocks: BlockTable) -> Self {
        let n_years = blocks.n_lag();
        Self {
            blocks,
            n_years,
            harvest_month: 9,
            unit: PrecipUnit::Millimeters,
        }
    }

    /// Sets the number of years in the precipitation series.
    pub fn with_n_years(mut self, n_years: usize) -> Self {
        self.n_years = n_years;
        self
    }

    /// Sets the 1-indexed harvest month.
    pub fn with_harvest_month(mut self, month: u8) -> Self {
        self.harvest_month = month;
        self
    }

    /// Sets the unit of the precipitation series.
    pub fn with_unit(mut self, unit: PrecipUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Returns the block table.
    pub fn blocks(&self) -> &BlockTable {
        &self.blocks
    }

    /// Number of lag-years in the lookback window.
    pub fn n_lag(&self) -> usize {
        self.blocks.n_lag()
    }

    /// Number of distinct weight blocks.
    pub fn n_blocks(&self) -> usize {
        self.blocks.n_blocks()
    }

    /// Number of years in the precipitation series.
    pub fn n_years(&self) -> usize {
        self.n_years
    }

    /// Returns the 1-indexed harvest month.
    pub fn harvest_month(&self) -> u8 {
        self.harvest_month
    }

    /// Returns the precipitation unit.
    pub fn unit(&self) -> PrecipUnit {
        self.unit
    }

    /// Number of years with a complete lookback window.
    pub fn n_eligible(&self) -> usize {
        (self.n_years + 1).saturating_sub(self.n_lag())
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// - [`AntecedentError::InsufficientYears`] if `n_years < n_lag`.
    /// - [`AntecedentError::InvalidMonth`] if the harvest month is outside
    ///   1..=12.
    pub fn validate(&self) -> Result<(), AntecedentError> {
        if self.n_years < self.n_lag() {
            return Err(AntecedentError::InsufficientYears {
                n_years: self.n_years,
                n_lag: self.n_lag(),
            });
        }
        self.mask()?;
        Ok(())
    }

    pub(crate) fn mask(&self) -> Result<HarvestMask, AntecedentError> {
        HarvestMask::new(self.harvest_month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = AntecedentConfig::new(BlockTable::ogle_default());
        assert_eq!(cfg.n_lag(), 5);
        assert_eq!(cfg.n_blocks(), 38);
        assert_eq!(cfg.n_years(), 5);
        assert_eq!(cfg.n_eligible(), 1);
        assert_eq!(cfg.harvest_month(), 9);
        assert_eq!(cfg.unit(), PrecipUnit::Millimeters);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn builder_chaining() {
        let cfg = AntecedentConfig::new(BlockTable::ogle_default())
            .with_n_years(91)
            .with_harvest_month(10)
            .with_unit(PrecipUnit::Inches);
        assert_eq!(cfg.n_years(), 91);
        assert_eq!(cfg.n_eligible(), 87);
        assert_eq!(cfg.harvest_month(), 10);
        assert_eq!(cfg.unit().to_mm(), MM_PER_INCH);
    }

    #[test]
    fn validate_too_few_years() {
        let cfg = AntecedentConfig::new(BlockTable::ogle_default()).with_n_years(4);
        assert_eq!(
            cfg.validate(),
            Err(AntecedentError::InsufficientYears {
                n_years: 4,
                n_lag: 5
            })
        );
        assert_eq!(cfg.n_eligible(), 0);
    }

    #[test]
    fn validate_bad_harvest_month() {
        let cfg = AntecedentConfig::new(BlockTable::ogle_default()).with_harvest_month(13);
        assert!(matches!(
            cfg.validate(),
            Err(AntecedentError::InvalidMonth { month: 13 })
        ));
    }
}
