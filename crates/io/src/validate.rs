//! Accumulated validation utilities.
//!
//! Provides [`ValidationCollector`] for gathering multiple validation errors
//! into a single [`IoError::Validation`], plus helpers that check the
//! invariants of loaded ANPP and precipitation tables.

use crate::error::IoError;

// ---------------------------------------------------------------------------
// ValidationCollector
// ---------------------------------------------------------------------------

/// Accumulates validation errors and converts them into a single
/// [`IoError::Validation`].
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
}

impl ValidationCollector {
    /// Create an empty collector.
    pub(crate) fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record one validation error.
    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Move every error of `other` into `self`.
    pub(crate) fn extend(&mut self, other: ValidationCollector) {
        self.errors.extend(other.errors);
    }

    /// Returns `true` when no errors have been recorded.
    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of recorded errors.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.errors.len()
    }

    /// Consume the collector and return `Ok(())` if no errors were recorded,
    /// or `Err(IoError::Validation { count, details })` otherwise.
    ///
    /// The `details` string joins all messages with `"; "`.
    pub(crate) fn finish(self) -> Result<(), IoError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(IoError::Validation {
                count: self.errors.len(),
                details: self.errors.join("; "),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Standalone validation helpers
// ---------------------------------------------------------------------------

/// Check that every present value in a column is non-negative.
///
/// `lines` holds the 1-based file line of each value. Missing (`None`)
/// values are skipped; they are handled by imputation or rejected
/// elsewhere.
pub(crate) fn validate_non_negative(
    column: &str,
    values: &[Option<f64>],
    lines: &[usize],
) -> ValidationCollector {
    let mut c = ValidationCollector::new();

    for (v, &line) in values.iter().zip(lines) {
        if let Some(v) = *v
            && v < 0.0
        {
            c.push(format!("negative {column} at line {line}: {v}"));
        }
    }

    c
}

/// Check that calendar years increase by exactly one from row to row.
pub(crate) fn validate_consecutive_years(years: &[i32], lines: &[usize]) -> ValidationCollector {
    let mut c = ValidationCollector::new();

    for (pair, &line) in years.windows(2).zip(lines.iter().skip(1)) {
        if pair[1] != pair[0] + 1 {
            c.push(format!(
                "year {} at line {line} does not follow {}",
                pair[1], pair[0]
            ));
        }
    }

    c
}

/// Check that no calendar year appears twice.
pub(crate) fn validate_unique_years(years: &[i32], lines: &[usize]) -> ValidationCollector {
    let mut c = ValidationCollector::new();
    let mut seen = std::collections::BTreeMap::new();

    for (&year, &line) in years.iter().zip(lines) {
        if let Some(first) = seen.insert(year, line) {
            c.push(format!(
                "year {year} at line {line} duplicates line {first}"
            ));
        }
    }

    c
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
