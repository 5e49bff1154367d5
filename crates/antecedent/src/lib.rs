//! # sam-antecedent
//!
//! Antecedent precipitation weights for stochastic antecedent models
//! (Ogle et al. 2015, *Ecology Letters* 18: 221-235).
//!
//! Monthly precipitation over an `n_lag`-year lookback window is collapsed
//! into one covariate per observation year. Month slots share weights
//! through a [`BlockTable`], post-harvest months of the observation year
//! are zeroed by a [`HarvestMask`], and the remaining weights are
//! normalized to sum to 1.
//!
//! ## Pipeline
//!
//! ```text
//!  raw deltaX[b]          delta[m, t]            weight[m, t]            antX[i]
//!  (one per block) ──▶ (block lookup, mask) ──▶ (÷ Σ delta) ──────▶ Σ weight·ppt[i-t, m]
//!                                                  │
//!                                                  ├─▶ alpha (÷ Σ_m delta[m, t])
//!                                                  ├─▶ yearly shares
//!                                                  └─▶ ordered / cumulative
//! ```
//!
//! ## Quick start
//!
//! ```rust
//! use sam_antecedent::{AntecedentConfig, BlockTable, MonthlyPrecip, PrecipUnit, WeightCalculator};
//!
//! let config = AntecedentConfig::new(BlockTable::ogle_default())
//!     .with_n_years(20)
//!     .with_unit(PrecipUnit::Inches);
//! let calc = WeightCalculator::new(config).unwrap();
//!
//! let weights = calc.weights(&[1.0; 38]).unwrap();
//! assert!((weights.weight().sum() - 1.0).abs() < 1e-12);
//!
//! let precip = MonthlyPrecip::constant(1990, 20, 1.0).unwrap();
//! let series = calc.antecedent(&[1.0; 38], &precip).unwrap();
//! assert!((series.values()[0] - 25.4).abs() < 1e-9);
//! ```

mod block;
mod calculator;
mod config;
mod error;
mod mask;
mod precip;
mod weights;

pub use block::{BlockTable, OGLE_BLOCKS, OGLE_N_BLOCKS};
pub use calculator::{AntecedentSeries, WeightCalculator};
pub use config::{AntecedentConfig, MM_PER_INCH, PrecipUnit};
pub use error::{AntecedentError, ErrorKind};
pub use mask::HarvestMask;
pub use precip::MonthlyPrecip;
pub use weights::AntecedentWeights;
