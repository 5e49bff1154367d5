//! Monthly precipitation matrix indexed by (year, month).

use ndarray::Array2;

use crate::error::AntecedentError;

/// Monthly precipitation totals, one row per consecutive calendar year.
///
/// Missing cells are stored as NaN. They are accepted at construction and
/// only rejected when a computation needs them, so a series with gaps
/// outside the requested windows remains usable.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyPrecip {
    first_year: i32,
    /// `values[[i, m]]` is the total of month `m` (0-based) in year
    /// `first_year + i`.
    values: Array2<f64>,
}

impl MonthlyPrecip {
    /// Wraps an `(n_years, 12)` matrix.
    ///
    /// # Errors
    ///
    /// Returns [`AntecedentError::SeriesTooShort`] if the matrix has no rows
    /// and [`AntecedentError::BufferLengthMismatch`] if it does not have 12
    /// columns.
    pub fn new(first_year: i32, values: Array2<f64>) -> Result<Self, AntecedentError> {
        if values.ncols() != 12 {
            return Err(AntecedentError::BufferLengthMismatch {
                expected: 12,
                got: values.ncols(),
            });
        }
        if values.nrows() == 0 {
            return Err(AntecedentError::SeriesTooShort {
                expected: 1,
                got: 0,
            });
        }
        Ok(Self { first_year, values })
    }

    /// Builds a series from per-year rows; `None` marks a missing month.
    pub fn from_rows(first_year: i32, rows: &[[Option<f64>; 12]]) -> Result<Self, AntecedentError> {
        let mut values = Array2::from_elem((rows.len(), 12), f64::NAN);
        for (i, row) in rows.iter().enumerate() {
            for (m, cell) in row.iter().enumerate() {
                if let Some(v) = cell {
                    values[[i, m]] = *v;
                }
            }
        }
        Self::new(first_year, values)
    }

    /// A series where every month of every year holds `value`.
    pub fn constant(first_year: i32, n_years: usize, value: f64) -> Result<Self, AntecedentError> {
        Self::new(first_year, Array2::from_elem((n_years, 12), value))
    }

    /// First calendar year of the series.
    pub fn first_year(&self) -> i32 {
        self.first_year
    }

    /// Last calendar year of the series.
    pub fn last_year(&self) -> i32 {
        self.first_year + self.values.nrows() as i32 - 1
    }

    /// Number of years in the series.
    pub fn n_years(&self) -> usize {
        self.values.nrows()
    }

    /// Row index of a calendar year, if it is covered.
    pub fn year_index(&self, year: i32) -> Option<usize> {
        if year < self.first_year || year > self.last_year() {
            return None;
        }
        Some((year - self.first_year) as usize)
    }

    /// Raw cell value (NaN when missing).
    ///
    /// # Panics
    ///
    /// Panics if `year_idx >= n_years()` or `month >= 12`.
    pub fn raw(&self, year_idx: usize, month: usize) -> f64 {
        self.values[[year_idx, month]]
    }

    /// Validated cell value.
    ///
    /// # Errors
    ///
    /// Returns [`AntecedentError::MissingPrecip`] if the cell is missing,
    /// negative or non-finite, or if `year_idx` is outside the series.
    pub fn get(&self, year_idx: usize, month: usize) -> Result<f64, AntecedentError> {
        let missing = || AntecedentError::MissingPrecip {
            year: self.first_year + year_idx as i32,
            month: (month + 1) as u8,
        };
        let v = *self.values.get([year_idx, month]).ok_or_else(missing)?;
        if !v.is_finite() || v < 0.0 {
            return Err(missing());
        }
        Ok(v)
    }

    /// Number of missing (NaN) cells.
    pub fn n_missing(&self) -> usize {
        self.values.iter().filter(|v| v.is_nan()).count()
    }

    /// Borrow the underlying matrix.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }
}
