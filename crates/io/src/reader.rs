//! Reader configuration and loaders for the precipitation and ANPP tables.

use std::path::Path;

use ndarray::Array2;
use sam_antecedent::MonthlyPrecip;
use tracing::{debug, info};

use crate::dataset::{AnppDataset, EventMatrix, N_EVENT_CLASSES, Observation};
use crate::error::IoError;
use crate::table::Table;
use crate::validate::{
    ValidationCollector, validate_consecutive_years, validate_non_negative, validate_unique_years,
};

// ---------------------------------------------------------------------------
// ReaderConfig
// ---------------------------------------------------------------------------

/// Column names and the missing-value marker used by the table readers.
///
/// Column lookups are case-insensitive. The [`Default`] matches the
/// layout of the Ogle et al. (2015) example data.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Token that marks a missing cell.
    na_marker: String,
    /// Calendar year column (both tables).
    year_column: String,
    /// Month column of a long-format precipitation table.
    month_column: String,
    /// Value column of a long-format precipitation table.
    precip_column: String,
    /// ANPP column.
    anpp_column: String,
    /// The four event-size class columns, smallest class first.
    event_columns: [String; N_EVENT_CLASSES],
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            na_marker: "NA".into(),
            year_column: "Year".into(),
            month_column: "Month".into(),
            precip_column: "ppt".into(),
            anpp_column: "ANPP".into(),
            event_columns: [
                "Event1".into(),
                "Event2".into(),
                "Event3".into(),
                "Event4".into(),
            ],
        }
    }
}

impl ReaderConfig {
    /// Set the missing-value marker.
    pub fn with_na_marker(mut self, marker: impl Into<String>) -> Self {
        self.na_marker = marker.into();
        self
    }

    /// Set the year column name.
    pub fn with_year_column(mut self, name: impl Into<String>) -> Self {
        self.year_column = name.into();
        self
    }

    /// Set the month and value column names of long-format precipitation.
    pub fn with_long_columns(
        mut self,
        month: impl Into<String>,
        precip: impl Into<String>,
    ) -> Self {
        self.month_column = month.into();
        self.precip_column = precip.into();
        self
    }

    /// Set the ANPP column name.
    pub fn with_anpp_column(mut self, name: impl Into<String>) -> Self {
        self.anpp_column = name.into();
        self
    }

    /// Set the four event-size class column names.
    pub fn with_event_columns(mut self, names: [String; N_EVENT_CLASSES]) -> Self {
        self.event_columns = names;
        self
    }

    /// Returns the missing-value marker.
    pub fn na_marker(&self) -> &str {
        &self.na_marker
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if the marker or any column name is
    /// empty or contains whitespace.
    pub fn validate(&self) -> Result<(), IoError> {
        let mut c = ValidationCollector::new();
        let names = [
            ("na_marker", &self.na_marker),
            ("year_column", &self.year_column),
            ("month_column", &self.month_column),
            ("precip_column", &self.precip_column),
            ("anpp_column", &self.anpp_column),
        ];
        let events = self
            .event_columns
            .iter()
            .map(|name| ("event_columns", name));
        for (field, value) in names.into_iter().chain(events) {
            if value.is_empty() || value.contains(char::is_whitespace) {
                c.push(format!("{field} must be a non-empty single token, got {value:?}"));
            }
        }
        c.finish()
    }
}

// ---------------------------------------------------------------------------
// Monthly precipitation
// ---------------------------------------------------------------------------

/// Read a monthly precipitation table from disk.
///
/// See [`parse_monthly_precip`] for the accepted layouts.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if `path` does not exist, plus any
/// error from [`parse_monthly_precip`].
pub fn read_monthly_precip(path: &Path, config: &ReaderConfig) -> Result<MonthlyPrecip, IoError> {
    config.validate()?;
    let text = read_text(path)?;
    info!(path = %path.display(), "reading monthly precipitation");
    parse_monthly_precip(&text, config)
}

/// Parse a monthly precipitation table.
///
/// Two layouts are accepted:
///
/// - **wide**: a year column followed by twelve month columns (January
///   first). Header names of the month columns are not checked.
/// - **long**: year, month (1..=12) and value columns, selected by name.
///   Year/month pairs absent from the file are treated as missing, but
///   every year between the first and last must have at least one row.
///
/// The long layout is used when the header has both the configured month
/// and value columns. Years must be unique; in the wide layout they must
/// also be consecutive.
///
/// # Errors
///
/// Returns [`IoError`] on tokenizing failures, missing columns, a missing
/// year, invalid months, or validation failures.
pub fn parse_monthly_precip(text: &str, config: &ReaderConfig) -> Result<MonthlyPrecip, IoError> {
    let table = Table::parse(text, &config.na_marker)?;

    let precip = match (
        table.find(&config.month_column),
        table.find(&config.precip_column),
    ) {
        (Some(month_col), Some(value_col)) => parse_long(&table, config, month_col, value_col)?,
        _ => parse_wide(&table, config)?,
    };

    debug!(
        first_year = precip.first_year(),
        n_years = precip.n_years(),
        n_missing = precip.n_missing(),
        "monthly precipitation loaded"
    );
    Ok(precip)
}

fn parse_wide(table: &Table, config: &ReaderConfig) -> Result<MonthlyPrecip, IoError> {
    let year_col = table.find(&config.year_column).unwrap_or(0);
    if table.header().len() < year_col + 13 {
        return Err(IoError::Validation {
            count: 1,
            details: format!(
                "wide precipitation table needs 12 month columns after '{}', found {}",
                table.header()[year_col],
                table.header().len() - year_col - 1
            ),
        });
    }

    let years = table.years(year_col)?;
    let mut c = validate_unique_years(&years, table.lines());
    c.extend(validate_consecutive_years(&years, table.lines()));

    let mut values = Array2::from_elem((table.n_rows(), 12), f64::NAN);
    for m in 0..12 {
        let col = table.values(year_col + 1 + m);
        c.extend(validate_non_negative(&table.header()[year_col + 1 + m], &col, table.lines()));
        for (i, v) in col.into_iter().enumerate() {
            if let Some(v) = v {
                values[[i, m]] = v;
            }
        }
    }
    c.finish()?;

    Ok(MonthlyPrecip::new(years[0], values)?)
}

fn parse_long(
    table: &Table,
    config: &ReaderConfig,
    month_col: usize,
    value_col: usize,
) -> Result<MonthlyPrecip, IoError> {
    let year_col = table.column(&config.year_column)?;
    let years = table.years(year_col)?;
    let months = table.years(month_col)?;
    let cells = table.values(value_col);

    let mut c = validate_non_negative(&table.header()[value_col], &cells, table.lines());
    for (&m, &line) in months.iter().zip(table.lines()) {
        if !(1..=12).contains(&m) {
            c.push(format!("invalid month {m} at line {line}"));
        }
    }
    c.finish()?;

    // years is non-empty: Table::parse rejects tables without data rows.
    let first = years.iter().copied().min().unwrap_or_default();
    let last = years.iter().copied().max().unwrap_or_default();
    // Each year of the span needs at least one row, so a stray year cannot
    // inflate the matrix beyond the size of the table.
    let span = i64::from(last) - i64::from(first) + 1;
    if span > table.n_rows() as i64 {
        return Err(IoError::Validation {
            count: 1,
            details: format!(
                "long precipitation table spans {span} years ({first}..={last}) but has only {} rows",
                table.n_rows()
            ),
        });
    }
    let n_years = span as usize;

    let mut values = Array2::from_elem((n_years, 12), f64::NAN);
    let mut seen = vec![None; n_years * 12];
    let mut c = ValidationCollector::new();
    for (((&y, &m), v), &line) in years.iter().zip(&months).zip(&cells).zip(table.lines()) {
        let (i, j) = ((y - first) as usize, (m - 1) as usize);
        if let Some(prev) = seen[i * 12 + j].replace(line) {
            c.push(format!(
                "year {y}, month {m} at line {line} duplicates line {prev}"
            ));
        }
        if let Some(v) = v {
            values[[i, j]] = *v;
        }
    }
    c.finish()?;

    Ok(MonthlyPrecip::new(first, values)?)
}

// ---------------------------------------------------------------------------
// ANPP / event dataset
// ---------------------------------------------------------------------------

/// Read the ANPP and event-size table from disk.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if `path` does not exist, plus any
/// error from [`parse_anpp_dataset`].
pub fn read_anpp_dataset(path: &Path, config: &ReaderConfig) -> Result<AnppDataset, IoError> {
    config.validate()?;
    let text = read_text(path)?;
    info!(path = %path.display(), "reading ANPP dataset");
    parse_anpp_dataset(&text, config)
}

/// Parse the ANPP and event-size table.
///
/// Year and ANPP must be present on every row; event cells may hold the
/// missing marker and are imputed downstream. All present values must be
/// non-negative.
///
/// # Errors
///
/// Returns [`IoError::MissingColumn`], [`IoError::MissingValue`],
/// [`IoError::Validation`] or a tokenizing error.
pub fn parse_anpp_dataset(text: &str, config: &ReaderConfig) -> Result<AnppDataset, IoError> {
    let table = Table::parse(text, &config.na_marker)?;

    let year_col = table.column(&config.year_column)?;
    let anpp_col = table.column(&config.anpp_column)?;
    let event_cols = config
        .event_columns
        .iter()
        .map(|name| table.column(name))
        .collect::<Result<Vec<_>, _>>()?;

    let years = table.years(year_col)?;
    let anpp = table.required(anpp_col)?;

    let mut c = validate_unique_years(&years, table.lines());
    let anpp_cells: Vec<Option<f64>> = anpp.iter().copied().map(Some).collect();
    c.extend(validate_non_negative(
        &config.anpp_column,
        &anpp_cells,
        table.lines(),
    ));

    let mut rows = vec![[None; N_EVENT_CLASSES]; table.n_rows()];
    for (k, &col) in event_cols.iter().enumerate() {
        let cells = table.values(col);
        c.extend(validate_non_negative(
            &config.event_columns[k],
            &cells,
            table.lines(),
        ));
        for (row, cell) in rows.iter_mut().zip(cells) {
            row[k] = cell;
        }
    }
    c.finish()?;

    let observations = years
        .iter()
        .zip(&anpp)
        .map(|(&year, &anpp)| Observation { year, anpp })
        .collect();
    let events = EventMatrix::new(rows);
    debug!(
        n_obs = events.n_rows(),
        n_missing_events = events.n_missing(),
        "ANPP dataset loaded"
    );

    AnppDataset::new(observations, events).ok_or(IoError::EmptyTable)
}

fn read_text(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|e| IoError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
