//! Error types for sam-model.

/// Error type for all fallible operations in the sam-model crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// Returned when a prior hyperparameter is invalid.
    #[error("invalid prior '{name}': {reason}")]
    InvalidPrior {
        /// Hyperparameter name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Returned when the ANPP dataset has no observations.
    #[error("ANPP dataset is empty")]
    EmptyDataset,

    /// Returned when an observation year has no complete lookback window.
    #[error("observation year {year} has no antecedent value (eligible years {first}..={last})")]
    ObservationYear {
        /// Calendar year of the observation.
        year: i32,
        /// First eligible calendar year.
        first: i32,
        /// Last eligible calendar year.
        last: i32,
    },

    /// Returned when a flat parameter vector has the wrong length.
    #[error("expected {expected} parameters, got {got}")]
    ParamLength {
        /// Length required by the parameter layout.
        expected: usize,
        /// Length supplied.
        got: usize,
    },

    /// Returned when one parameter block has the wrong length.
    #[error("parameter '{name}' expects {expected} values, got {got}")]
    ShapeMismatch {
        /// Parameter block name.
        name: &'static str,
        /// Required length.
        expected: usize,
        /// Supplied length.
        got: usize,
    },

    /// Returned when a parameter lies outside the support of its prior.
    #[error("{name}[{index}] = {value} is outside the support of its prior")]
    OutOfSupport {
        /// Parameter block name.
        name: &'static str,
        /// 1-based index within the block.
        index: usize,
        /// Offending value.
        value: f64,
    },

    /// Returned when a log density term is not finite.
    #[error("non-finite log density in {stage}")]
    NonFinite {
        /// Term that produced the value.
        stage: &'static str,
    },

    /// Returned when a graph node name is registered twice.
    #[error("node '{name}' is already declared")]
    DuplicateNode {
        /// Node name.
        name: String,
    },

    /// Returned when a node refers to a node that has not been declared.
    #[error("node '{node}' refers to undeclared node '{parent}'")]
    UnknownParent {
        /// Node being declared.
        node: String,
        /// Missing parent.
        parent: String,
    },

    /// Returned when a node is declared with zero elements.
    #[error("node '{name}' has an empty shape")]
    EmptyShape {
        /// Node name.
        name: String,
    },

    /// Wraps an error from the antecedent weight calculator.
    #[error("antecedent: {0}")]
    Antecedent(#[from] sam_antecedent::AntecedentError),
}
