use thiserror::Error;

/// Error taxonomy for the discovery engine.
///
/// Every unrecoverable condition the engine can hit surfaces as one of these
/// variants; there is no panic-based control flow inside the search.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AfdError {
    #[error("column index {0} is out of range for a dataset with {1} columns")]
    InvalidColumn(usize, usize),

    #[error("empty column set requested from the PLI cache")]
    EmptyColumnSet,

    #[error("row {row} has {actual} values, expected {expected}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("value {0} is outside the required domain [0, 1]")]
    NumericDomain(f64),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AfdError>;
