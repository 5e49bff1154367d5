//! # sam-io
//!
//! Read the whitespace-delimited tables used by the antecedent-precipitation
//! model: monthly precipitation (wide or long layout) and the ANPP table with
//! its event-size covariates. Bridges text files into the
//! [`sam_antecedent::MonthlyPrecip`] and [`AnppDataset`] types.
//!
//! ```text
//! ppt file ──► Table ──► validate ──► MonthlyPrecip
//! anpp file ─► Table ──► validate ──► AnppDataset { observations, events }
//! ```

mod dataset;
mod error;
mod reader;
mod table;
mod validate;

pub use dataset::{AnppDataset, EventMatrix, N_EVENT_CLASSES, Observation};
pub use error::IoError;
pub use reader::{
    ReaderConfig, parse_anpp_dataset, parse_monthly_precip, read_anpp_dataset,
    read_monthly_precip,
};
