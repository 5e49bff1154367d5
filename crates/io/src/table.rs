//! Whitespace-delimited numeric tables with one header row.

use crate::error::IoError;

/// A parsed table: header names plus numeric cells, `None` where the file
/// holds the missing-value marker.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Table {
    header: Vec<String>,
    rows: Vec<Vec<Option<f64>>>,
    /// 1-based file line of each row.
    lines: Vec<usize>,
}

impl Table {
    /// Parses `text`, treating `na_marker` as a missing cell.
    ///
    /// Blank lines and lines starting with `#` are ignored. Surrounding
    /// double quotes are stripped from every token. A data row with exactly
    /// one more field than the header is taken to carry a leading row label
    /// (as written by R's `write.table`), which is dropped.
    pub(crate) fn parse(text: &str, na_marker: &str) -> Result<Self, IoError> {
        let mut content = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'));

        let (_, header_line) = content.next().ok_or(IoError::EmptyTable)?;
        let header: Vec<String> = header_line
            .split_whitespace()
            .map(|t| unquote(t).to_string())
            .collect();
        let width = header.len();

        let mut rows = Vec::new();
        let mut lines = Vec::new();
        for (line, body) in content {
            let mut tokens: Vec<&str> = body.split_whitespace().map(unquote).collect();
            if tokens.len() == width + 1 {
                tokens.remove(0);
            }
            if tokens.len() != width {
                return Err(IoError::RaggedRow {
                    line,
                    expected: width,
                    got: tokens.len(),
                });
            }

            let row = tokens
                .iter()
                .zip(&header)
                .map(|(&tok, col)| parse_cell(tok, na_marker, line, col))
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
            lines.push(line);
        }

        if rows.is_empty() {
            return Err(IoError::EmptyTable);
        }

        Ok(Self {
            header,
            rows,
            lines,
        })
    }

    /// Header names.
    pub(crate) fn header(&self) -> &[String] {
        &self.header
    }

    /// Number of data rows.
    pub(crate) fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// 1-based file line of each data row.
    pub(crate) fn lines(&self) -> &[usize] {
        &self.lines
    }

    /// Index of a column, matched case-insensitively.
    pub(crate) fn find(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h.eq_ignore_ascii_case(name))
    }

    /// Index of a required column.
    pub(crate) fn column(&self, name: &str) -> Result<usize, IoError> {
        self.find(name).ok_or_else(|| IoError::MissingColumn {
            name: name.to_string(),
        })
    }

    /// All cells of one column, in row order.
    pub(crate) fn values(&self, col: usize) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r[col]).collect()
    }

    /// All cells of a column that must not contain the missing marker.
    pub(crate) fn required(&self, col: usize) -> Result<Vec<f64>, IoError> {
        self.rows
            .iter()
            .zip(&self.lines)
            .map(|(r, &line)| {
                r[col].ok_or_else(|| IoError::MissingValue {
                    line,
                    column: self.header[col].clone(),
                })
            })
            .collect()
    }

    /// Integer calendar years from a required column.
    pub(crate) fn years(&self, col: usize) -> Result<Vec<i32>, IoError> {
        let values = self.required(col)?;
        values
            .iter()
            .zip(&self.lines)
            .map(|(&v, &line)| {
                if v.fract() != 0.0 || v < i32::MIN as f64 || v > i32::MAX as f64 {
                    Err(IoError::Parse {
                        line,
                        column: self.header[col].clone(),
                        token: v.to_string(),
                    })
                } else {
                    Ok(v as i32)
                }
            })
            .collect()
    }
}

fn unquote(token: &str) -> &str {
    token
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(token)
}

fn parse_cell(token: &str, na_marker: &str, line: usize, column: &str) -> Result<Option<f64>, IoError> {
    if token == na_marker {
        return Ok(None);
    }
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(IoError::Parse {
            line,
            column: column.to_string(),
            token: token.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_rows() {
        let text = "Year ANPP Event1\n1950 120.5 3\n1951 NA 4.25\n";
        let t = Table::parse(text, "NA").unwrap();
        assert_eq!(t.header(), &["Year", "ANPP", "Event1"]);
        assert_eq!(t.n_rows(), 2);
        assert_eq!(t.lines(), &[2, 3]);
        assert_eq!(t.values(1), vec![Some(120.5), None]);
        assert_eq!(t.years(0).unwrap(), vec![1950, 1951]);
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let text = "# monthly totals\n\nYear Jan\n\n1950 1\n# gap\n1951 2\n";
        let t = Table::parse(text, "NA").unwrap();
        assert_eq!(t.n_rows(), 2);
        assert_eq!(t.lines(), &[5, 7]);
    }

    #[test]
    fn strips_quotes_and_row_labels() {
        let text = "\"Year\" \"ANPP\"\n\"1\" 1950 10\n\"2\" 1951 11\n";
        let t = Table::parse(text, "NA").unwrap();
        assert_eq!(t.header(), &["Year", "ANPP"]);
        assert_eq!(t.values(0), vec![Some(1950.0), Some(1951.0)]);
    }

    #[test]
    fn find_is_case_insensitive() {
        let t = Table::parse("year anpp\n1 2\n", "NA").unwrap();
        assert_eq!(t.find("Year"), Some(0));
        assert_eq!(t.find("ANPP"), Some(1));
        assert!(matches!(
            t.column("Event1"),
            Err(IoError::MissingColumn { .. })
        ));
    }

    #[test]
    fn ragged_row_is_error() {
        let err = Table::parse("a b c\n1 2\n", "NA").unwrap_err();
        assert!(matches!(
            err,
            IoError::RaggedRow {
                line: 2,
                expected: 3,
                got: 2
            }
        ));
    }

    #[test]
    fn bad_token_is_error() {
        let err = Table::parse("a b\n1 oops\n", "NA").unwrap_err();
        match err {
            IoError::Parse {
                line,
                column,
                token,
            } => {
                assert_eq!(line, 2);
                assert_eq!(column, "b");
                assert_eq!(token, "oops");
            }
            other => panic!("expected IoError::Parse, got {other:?}"),
        }
    }

    #[test]
    fn custom_na_marker() {
        let t = Table::parse("a b\n1 -999\n", "-999").unwrap();
        assert_eq!(t.values(1), vec![None]);
    }

    #[test]
    fn empty_inputs() {
        assert!(matches!(Table::parse("", "NA"), Err(IoError::EmptyTable)));
        assert!(matches!(
            Table::parse("a b\n", "NA"),
            Err(IoError::EmptyTable)
        ));
    }

    #[test]
    fn required_rejects_missing() {
        let t = Table::parse("Year ANPP\n1950 NA\n", "NA").unwrap();
        assert!(matches!(
            t.required(1),
            Err(IoError::MissingValue { line: 2, .. })
        ));
    }

    #[test]
    fn fractional_year_rejected() {
        let t = Table::parse("Year\n1950.5\n", "NA").unwrap();
        assert!(matches!(t.years(0), Err(IoError::Parse { .. })));
    }
}
