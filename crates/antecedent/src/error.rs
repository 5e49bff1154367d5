//! Error types for the sam-antecedent crate.

/// Broad classification of an [`AntecedentError`].
///
/// None of the kinds is recoverable for the computation that raised it;
/// the classification only tells the caller whether to look at the model
/// configuration, the input data, or the current parameter draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or inconsistent static configuration.
    Configuration,
    /// Missing or invalid precipitation data.
    Data,
    /// Degenerate normalization or non-finite arithmetic.
    Numerical,
}

/// Error type for all fallible operations in the sam-antecedent crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AntecedentError {
    /// Returned when the block table has no lag-years.
    #[error("block table is empty")]
    EmptyBlockTable,

    /// Returned when a block table row does not hold 12 months.
    #[error("block table row {lag} has {got} months, expected 12")]
    BlockRowLength {
        /// Zero-based lag-year of the offending row.
        lag: usize,
        /// Number of entries found.
        got: usize,
    },

    /// Returned when a block id falls outside `1..=n_blocks`.
    #[error("block id {id} at lag {lag}, month {month} is outside 1..={n_blocks}")]
    BlockIdOutOfRange {
        /// The offending (1-based) block id.
        id: usize,
        /// Zero-based lag-year.
        lag: usize,
        /// 1-indexed calendar month.
        month: u8,
        /// Number of declared blocks.
        n_blocks: usize,
    },

    /// Returned when a declared block is never referenced by the table.
    #[error("block {id} is declared but not assigned to any month")]
    UnusedBlock {
        /// The unused (1-based) block id.
        id: usize,
    },

    /// Returned when fewer precipitation years are configured than lags.
    #[error("insufficient years: n_years = {n_years} is less than n_lag = {n_lag}")]
    InsufficientYears {
        /// Configured number of precipitation years.
        n_years: usize,
        /// Number of lag-years in the block table.
        n_lag: usize,
    },

    /// Returned when a month value is outside 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The invalid month value.
        month: u8,
    },

    /// Returned when the raw weight vector does not match the block count.
    #[error("raw weight length mismatch: expected {expected}, got {got}")]
    RawWeightLength {
        /// Number of blocks.
        expected: usize,
        /// Length of the supplied vector.
        got: usize,
    },

    /// Returned when a raw weight is negative or non-finite.
    #[error("invalid raw weight for block {block}: {value} (must be finite and >= 0)")]
    InvalidRawWeight {
        /// 1-based block id.
        block: usize,
        /// The invalid value.
        value: f64,
    },

    /// Returned when the precipitation series covers fewer years than needed.
    #[error("precipitation series has {got} years, need at least {expected}")]
    SeriesTooShort {
        /// Required number of years.
        expected: usize,
        /// Number of years present.
        got: usize,
    },

    /// Returned when a required precipitation cell is missing or invalid.
    #[error("missing or invalid precipitation for year {year}, month {month}")]
    MissingPrecip {
        /// Calendar year of the cell.
        year: i32,
        /// 1-indexed calendar month.
        month: u8,
    },

    /// Returned when a requested year has no complete lookback window.
    #[error("year {year} is outside the antecedent range {first}..={last}")]
    YearOutOfRange {
        /// The requested calendar year.
        year: i32,
        /// First year with a complete window.
        first: i32,
        /// Last year in the series.
        last: i32,
    },

    /// Returned when the total of the masked month weights is zero.
    #[error("normalization denominator is zero: all unmasked raw weights are zero")]
    ZeroTotalWeight,

    /// Returned when one lag-year carries no weight, leaving its
    /// within-year weights undefined.
    #[error("lag-year {lag} has zero total weight")]
    ZeroLagWeight {
        /// Zero-based lag-year.
        lag: usize,
    },

    /// Returned when an intermediate value is NaN or infinite.
    #[error("non-finite value in {stage}")]
    NonFinite {
        /// Name of the computation stage.
        stage: &'static str,
    },

    /// Returned when a pre-allocated buffer has the wrong length.
    #[error("buffer length mismatch: expected {expected}, got {got}")]
    BufferLengthMismatch {
        /// Expected buffer length.
        expected: usize,
        /// Actual buffer length.
        got: usize,
    },
}

impl AntecedentError {
    /// Returns the broad classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyBlockTable
            | Self::BlockRowLength { .. }
            | Self::BlockIdOutOfRange { .. }
            | Self::UnusedBlock { .. }
            | Self::InsufficientYears { .. }
            | Self::InvalidMonth { .. }
            | Self::RawWeightLength { .. }
            | Self::InvalidRawWeight { .. }
            | Self::BufferLengthMismatch { .. } => ErrorKind::Configuration,
            Self::SeriesTooShort { .. }
            | Self::MissingPrecip { .. }
            | Self::YearOutOfRange { .. } => ErrorKind::Data,
            Self::ZeroTotalWeight | Self::ZeroLagWeight { .. } | Self::NonFinite { .. } => {
                ErrorKind::Numerical
            }
        }
    }
}
