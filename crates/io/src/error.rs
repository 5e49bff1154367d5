//! Error types for sam-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the sam-io crate.
///
/// Covers file access, tokenizing of whitespace-delimited tables, header
/// lookups, accumulated validation failures, and errors raised while
/// assembling the precipitation matrix.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an operating-system error while reading a file.
    #[error("failed to read {}: {reason}", path.display())]
    Read {
        /// Path being read.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Returned when a table has no header or no data rows.
    #[error("table is empty")]
    EmptyTable,

    /// Returned when a row has a different number of fields than the header.
    #[error("line {line}: expected {expected} fields, got {got}")]
    RaggedRow {
        /// 1-based line number in the file.
        line: usize,
        /// Number of header fields.
        expected: usize,
        /// Number of fields on the line.
        got: usize,
    },

    /// Returned when a field is neither a number nor the missing marker.
    #[error("line {line}, column '{column}': cannot parse '{token}' as a number")]
    Parse {
        /// 1-based line number in the file.
        line: usize,
        /// Header name of the column.
        column: String,
        /// The offending token.
        token: String,
    },

    /// Returned when a required column is not present in the header.
    #[error("column '{name}' not found in header")]
    MissingColumn {
        /// Name of the missing column.
        name: String,
    },

    /// Returned when a column that cannot be imputed holds the missing marker.
    #[error("line {line}: required value '{column}' is missing")]
    MissingValue {
        /// 1-based line number in the file.
        line: usize,
        /// Header name of the column.
        column: String,
    },

    /// Returned when one or more validation checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// Wraps an error from the sam-antecedent crate.
    #[error("precipitation series: {0}")]
    Antecedent(#[from] sam_antecedent::AntecedentError),
}
