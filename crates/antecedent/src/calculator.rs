//! Weight calculator and antecedent precipitation sums.

use tracing::{debug, trace};

use crate::config::AntecedentConfig;
use crate::error::AntecedentError;
use crate::mask::HarvestMask;
use crate::precip::MonthlyPrecip;
use crate::weights::{self, AntecedentWeights};

/// Antecedent precipitation (mm) for every year with a complete lookback
/// window.
#[derive(Debug, Clone, PartialEq)]
pub struct AntecedentSeries {
    first_year: i32,
    values: Vec<f64>,
}

impl AntecedentSeries {
    /// First calendar year with a value.
    pub fn first_year(&self) -> i32 {
        self.first_year
    }

    /// Last calendar year with a value.
    pub fn last_year(&self) -> i32 {
        self.first_year + self.values.len() as i32 - 1
    }

    /// Values in calendar order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Antecedent value for a calendar year.
    ///
    /// # Errors
    ///
    /// Returns [`AntecedentError::YearOutOfRange`] if the year has no
    /// complete lookback window.
    pub fn get(&self, year: i32) -> Result<f64, AntecedentError> {
        if year < self.first_year || year > self.last_year() {
            return Err(AntecedentError::YearOutOfRange {
                year,
                first: self.first_year,
                last: self.last_year(),
            });
        }
        Ok(self.values[(year - self.first_year) as usize])
    }

    /// Iterates over `(year, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &v)| (self.first_year + i as i32, v))
    }
}

/// Deterministic transform from raw block weights to antecedent values.
///
/// The configuration is validated once in [`WeightCalculator::new`]; every
/// later call is a pure function of the raw weights and precipitation.
///
/// # Example
///
/// ```
/// use sam_antecedent::{AntecedentConfig, BlockTable, MonthlyPrecip, WeightCalculator};
///
/// let config = AntecedentConfig::new(BlockTable::ogle_default()).with_n_years(10);
/// let calc = WeightCalculator::new(config).unwrap();
/// let precip = MonthlyPrecip::constant(2000, 10, 25.4).unwrap();
///
/// let series = calc.antecedent(&[1.0; 38], &precip).unwrap();
/// assert_eq!(series.values().len(), 6);
/// assert!((series.get(2009).unwrap() - 25.4).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct WeightCalculator {
    config: AntecedentConfig,
    mask: HarvestMask,
}

impl WeightCalculator {
    /// Creates a calculator after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns any configuration error reported by
    /// [`AntecedentConfig::validate`].
    pub fn new(config: AntecedentConfig) -> Result<Self, AntecedentError> {
        config.validate()?;
        let mask = config.mask()?;
        debug!(
            n_lag = config.n_lag(),
            n_blocks = config.n_blocks(),
            n_years = config.n_years(),
            harvest_month = mask.harvest_month(),
            "antecedent weight calculator ready"
        );
        Ok(Self { config, mask })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AntecedentConfig {
        &self.config
    }

    /// Returns the harvest mask.
    pub fn mask(&self) -> HarvestMask {
        self.mask
    }

    /// Zero-filled weight buffers sized for this calculator.
    pub fn buffer(&self) -> AntecedentWeights {
        AntecedentWeights::zeros(self.config.n_lag())
    }

    /// Masked, unnormalized month weights `delta` with shape `(12, n_lag)`.
    pub fn month_weights(&self, raw: &[f64]) -> Result<ndarray::Array2<f64>, AntecedentError> {
        weights::check_raw(raw, self.config.n_blocks())?;
        let blocks = self.config.blocks();
        Ok(ndarray::Array2::from_shape_fn(
            (12, self.config.n_lag()),
            |(m, t)| raw[blocks.block(t, m)] * self.mask.factor(t, m),
        ))
    }

    /// Computes all weight views for one raw weight vector.
    ///
    /// # Errors
    ///
    /// - [`AntecedentError::RawWeightLength`] or
    ///   [`AntecedentError::InvalidRawWeight`] for a malformed vector.
    /// - [`AntecedentError::ZeroTotalWeight`] if no unmasked cell carries
    ///   weight.
    pub fn weights(&self, raw: &[f64]) -> Result<AntecedentWeights, AntecedentError> {
        let mut out = self.buffer();
        self.weights_into(raw, &mut out)?;
        Ok(out)
    }

    /// Like [`weights`](Self::weights) but reuses `out`.
    pub fn weights_into(
        &self,
        raw: &[f64],
        out: &mut AntecedentWeights,
    ) -> Result<(), AntecedentError> {
        weights::check_raw(raw, self.config.n_blocks())?;
        weights::fill_weights(self.config.blocks(), self.mask, raw, out)
    }

    /// Computes the antecedent series for one raw weight vector.
    pub fn antecedent(
        &self,
        raw: &[f64],
        precip: &MonthlyPrecip,
    ) -> Result<AntecedentSeries, AntecedentError> {
        let w = self.weights(raw)?;
        let mut values = vec![0.0; self.config.n_eligible()];
        self.antecedent_into(&w, precip, &mut values)?;
        Ok(AntecedentSeries {
            first_year: self.first_eligible_year(precip),
            values,
        })
    }

    /// Calendar year of the first complete lookback window in `precip`.
    pub fn first_eligible_year(&self, precip: &MonthlyPrecip) -> i32 {
        precip.first_year() + self.config.n_lag() as i32 - 1
    }

    /// Writes the antecedent value of every eligible year into `out`.
    ///
    /// `out[j]` belongs to year index `n_lag - 1 + j` of `precip`. Only the
    /// first `n_years` years of the series are used.
    ///
    /// # Errors
    ///
    /// - [`AntecedentError::BufferLengthMismatch`] if `out` does not hold
    ///   `n_eligible` values.
    /// - [`AntecedentError::SeriesTooShort`] if `precip` covers fewer than
    ///   `n_years` years.
    /// - [`AntecedentError::MissingPrecip`] for a missing, negative or
    ///   non-finite unmasked cell.
    pub fn antecedent_into(
        &self,
        weights: &AntecedentWeights,
        precip: &MonthlyPrecip,
        out: &mut [f64],
    ) -> Result<(), AntecedentError> {
        let n_lag = self.config.n_lag();
        let n_years = self.config.n_years();

        if out.len() != self.config.n_eligible() {
            return Err(AntecedentError::BufferLengthMismatch {
                expected: self.config.n_eligible(),
                got: out.len(),
            });
        }
        if weights.n_lag() != n_lag {
            return Err(AntecedentError::BufferLengthMismatch {
                expected: n_lag,
                got: weights.n_lag(),
            });
        }
        if precip.n_years() < n_years {
            return Err(AntecedentError::SeriesTooShort {
                expected: n_years,
                got: precip.n_years(),
            });
        }

        let factor = self.config.unit().to_mm();
        for (j, slot) in out.iter_mut().enumerate() {
            let i = n_lag - 1 + j;
            *slot = factor * self.window_sum(weights, precip, i)?;
        }

        trace!(n_values = out.len(), "antecedent values computed");
        Ok(())
    }

    /// Antecedent value (mm) for a single year index of `precip`.
    pub fn antecedent_at(
        &self,
        weights: &AntecedentWeights,
        precip: &MonthlyPrecip,
        year_idx: usize,
    ) -> Result<f64, AntecedentError> {
        let n_lag = self.config.n_lag();
        if year_idx + 1 < n_lag || year_idx >= precip.n_years() {
            return Err(AntecedentError::YearOutOfRange {
                year: precip.first_year() + year_idx as i32,
                first: self.first_eligible_year(precip),
                last: precip.last_year(),
            });
        }
        Ok(self.config.unit().to_mm() * self.window_sum(weights, precip, year_idx)?)
    }

    fn window_sum(
        &self,
        weights: &AntecedentWeights,
        precip: &MonthlyPrecip,
        i: usize,
    ) -> Result<f64, AntecedentError> {
        let mut sum = 0.0;
        for t in 0..self.config.n_lag() {
            for m in 0..12 {
                if self.mask.is_masked(t, m) {
                    continue;
                }
                sum += weights.get(m, t) * precip.get(i - t, m)?;
            }
        }
        if !sum.is_finite() {
            return Err(AntecedentError::NonFinite {
                stage: "antecedent sum",
            });
        }
        Ok(sum)
    }
}
