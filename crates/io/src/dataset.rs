//! ANPP observations and event-size covariates.

/// Number of precipitation event-size classes.
pub const N_EVENT_CLASSES: usize = 4;

/// One ANPP measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Calendar year of the measurement.
    pub year: i32,
    /// Aboveground net primary productivity.
    pub anpp: f64,
}

/// Event-size covariates, one row per observation, with missing cells.
#[derive(Debug, Clone, PartialEq)]
pub struct EventMatrix {
    rows: Vec<[Option<f64>; N_EVENT_CLASSES]>,
}

impl EventMatrix {
    /// Wraps per-observation rows; `None` marks a missing cell.
    pub fn new(rows: Vec<[Option<f64>; N_EVENT_CLASSES]>) -> Self {
        Self { rows }
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Cell of `row`, `class`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= n_rows()` or `class >= N_EVENT_CLASSES`.
    pub fn get(&self, row: usize, class: usize) -> Option<f64> {
        self.rows[row][class]
    }

    /// Borrow the rows.
    pub fn rows(&self) -> &[[Option<f64>; N_EVENT_CLASSES]] {
        &self.rows
    }

    /// Number of missing cells.
    pub fn n_missing(&self) -> usize {
        self.rows.iter().flatten().filter(|c| c.is_none()).count()
    }

    /// `(row, class)` of every missing cell in row-major order.
    pub fn missing_cells(&self) -> Vec<(usize, usize)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, c)| c.is_none())
                    .map(move |(k, _)| (i, k))
            })
            .collect()
    }

    /// Completed matrix with `missing` written into the missing cells in
    /// row-major order. Returns `None` unless `missing.len() == n_missing()`.
    pub fn fill(&self, missing: &[f64]) -> Option<Vec<[f64; N_EVENT_CLASSES]>> {
        if missing.len() != self.n_missing() {
            return None;
        }
        let mut fill = missing.iter().copied();
        let filled = self
            .rows
            .iter()
            .map(|row| row.map(|cell| cell.or_else(|| fill.next()).unwrap_or(f64::NAN)))
            .collect();
        Some(filled)
    }

    /// Observed values of one class.
    pub fn observed(&self, class: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().filter_map(move |r| r[class])
    }
}

/// ANPP observations paired with their event-size covariates.
#[derive(Debug, Clone, PartialEq)]
pub struct AnppDataset {
    observations: Vec<Observation>,
    events: EventMatrix,
}

impl AnppDataset {
    /// Builds a dataset. Returns `None` if the row counts differ.
    pub fn new(observations: Vec<Observation>, events: EventMatrix) -> Option<Self> {
        if observations.len() != events.n_rows() {
            return None;
        }
        Some(Self {
            observations,
            events,
        })
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Returns `true` if there are no observations.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// The observations.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// ANPP values in observation order.
    pub fn anpp(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.anpp).collect()
    }

    /// The event covariates.
    pub fn events(&self) -> &EventMatrix {
        &self.events
    }
}
