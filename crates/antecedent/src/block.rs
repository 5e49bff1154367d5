//! Assignment of (lag-year, month) cells to shared weight blocks.

use ndarray::Array2;

use crate::error::AntecedentError;

/// Block ids from Ogle et al. (2015), one row per lag-year.
///
/// Lag-years 0 and 1 estimate one weight per month, lag-year 2 pairs
/// adjacent months and lag-years 3 and 4 group months into seasons, so the
/// 60 month slots share 38 weights.
pub const OGLE_BLOCKS: [[usize; 12]; 5] = [
    [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
    [13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24],
    [25, 25, 26, 26, 27, 27, 28, 28, 29, 29, 30, 30],
    [31, 31, 31, 32, 32, 32, 33, 33, 33, 34, 34, 34],
    [35, 35, 35, 36, 36, 36, 37, 37, 37, 38, 38, 38],
];

/// Number of distinct blocks in [`OGLE_BLOCKS`].
pub const OGLE_N_BLOCKS: usize = 38;

/// Validated mapping from `(lag, month)` to a block index.
///
/// Ids are 1-based at the API boundary (matching published block tables)
/// and stored 0-based, so `block(t, m)` indexes the raw weight vector
/// directly.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockTable {
    /// `ids[[t, m]]` is the 0-based block of lag `t`, month index `m`.
    ids: Array2<usize>,
    n_blocks: usize,
}

impl BlockTable {
    /// Builds a table from 1-based block ids, one row of 12 months per
    /// lag-year.
    ///
    /// # Errors
    ///
    /// - [`AntecedentError::EmptyBlockTable`] if `rows` is empty.
    /// - [`AntecedentError::BlockRowLength`] if a row is not 12 long.
    /// - [`AntecedentError::BlockIdOutOfRange`] if an id is outside
    ///   `1..=n_blocks`.
    /// - [`AntecedentError::UnusedBlock`] if some id in `1..=n_blocks`
    ///   never appears.
    pub fn new<R: AsRef<[usize]>>(rows: &[R], n_blocks: usize) -> Result<Self, AntecedentError> {
        if rows.is_empty() {
            return Err(AntecedentError::EmptyBlockTable);
        }

        let n_lag = rows.len();
        let mut ids = Array2::zeros((n_lag, 12));
        let mut used = vec![false; n_blocks];

        for (lag, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != 12 {
                return Err(AntecedentError::BlockRowLength {
                    lag,
                    got: row.len(),
                });
            }
            for (m, &id) in row.iter().enumerate() {
                if id == 0 || id > n_blocks {
                    return Err(AntecedentError::BlockIdOutOfRange {
                        id,
                        lag,
                        month: (m + 1) as u8,
                        n_blocks,
                    });
                }
                ids[[lag, m]] = id - 1;
                used[id - 1] = true;
            }
        }

        if let Some(unused) = used.iter().position(|&u| !u) {
            return Err(AntecedentError::UnusedBlock { id: unused + 1 });
        }

        Ok(Self { ids, n_blocks })
    }

    /// Returns the 5-year, 38-block table of Ogle et al. (2015).
    pub fn ogle_default() -> Self {
        Self::new(&OGLE_BLOCKS, OGLE_N_BLOCKS).expect("OGLE_BLOCKS is a valid block table")
    }

    /// Number of lag-years (rows).
    pub fn n_lag(&self) -> usize {
        self.ids.nrows()
    }

    /// Number of distinct blocks.
    pub fn n_blocks(&self) -> usize {
        self.n_blocks
    }

    /// 0-based block index for lag `lag` and 0-based month index `month`.
    ///
    /// # Panics
    ///
    /// Panics if `lag >= n_lag()` or `month >= 12`.
    pub fn block(&self, lag: usize, month: usize) -> usize {
        self.ids[[lag, month]]
    }

    /// Number of month slots assigned to each block.
    pub fn block_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.n_blocks];
        for &id in &self.ids {
            sizes[id] += 1;
        }
        sizes
    }

    /// Returns the table as 1-based rows, the inverse of [`BlockTable::new`].
    pub fn to_rows(&self) -> Vec<[usize; 12]> {
        self.ids
            .rows()
            .into_iter()
            .map(|row| {
                let mut out = [0; 12];
                for (o, &id) in out.iter_mut().zip(row) {
                    *o = id + 1;
                }
                out
            })
            .collect()
    }
}

impl Default for BlockTable {
    fn default() -> Self {
        Self::ogle_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ogle_default_shape() {
        let table = BlockTable::ogle_default();
        assert_eq!(table.n_lag(), 5);
        assert_eq!(table.n_blocks(), 38);
        assert_eq!(table.block(0, 0), 0);
        assert_eq!(table.block(1, 11), 23);
        assert_eq!(table.block(4, 11), 37);
    }

    #[test]
    fn ogle_block_sizes() {
        let sizes = BlockTable::ogle_default().block_sizes();
        assert!(sizes[..24].iter().all(|&s| s == 1));
        assert!(sizes[24..30].iter().all(|&s| s == 2));
        assert!(sizes[30..].iter().all(|&s| s == 3));
        assert_eq!(sizes.iter().sum::<usize>(), 60);
    }

    #[test]
    fn round_trips_rows() {
        let table = BlockTable::ogle_default();
        let rows = table.to_rows();
        assert_eq!(rows.as_slice(), &OGLE_BLOCKS);
    }

    #[test]
    fn rejects_empty() {
        let rows: [[usize; 12]; 0] = [];
        assert_eq!(
            BlockTable::new(&rows, 1),
            Err(AntecedentError::EmptyBlockTable)
        );
    }

    #[test]
    fn rejects_short_row() {
        let rows = vec![vec![1; 11]];
        assert_eq!(
            BlockTable::new(&rows, 1),
            Err(AntecedentError::BlockRowLength { lag: 0, got: 11 })
        );
    }

    #[test]
    fn rejects_zero_id() {
        let mut row = [1; 12];
        row[3] = 0;
        assert!(matches!(
            BlockTable::new(&[row], 1),
            Err(AntecedentError::BlockIdOutOfRange {
                id: 0,
                lag: 0,
                month: 4,
                ..
            })
        ));
    }

    #[test]
    fn rejects_unused_block() {
        let row = [1; 12];
        assert_eq!(
            BlockTable::new(&[row], 2),
            Err(AntecedentError::UnusedBlock { id: 2 })
        );
    }
}
