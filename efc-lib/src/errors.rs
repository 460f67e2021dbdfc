use thiserror::Error;

/// Result type used by every fallible routine of this crate
pub type EfcResult<T> = Result<T, EfcError>;

/// Errors raised while fitting a Potts model or scoring samples with it.
///
/// No routine returns a partial result: any of these aborts the whole call.
#[derive(Error, Debug)]
pub enum EfcError {
    /// Array dimensions are inconsistent with each other
    #[error("shape mismatch: {0}")]
    Shape(String),

    /// The connected correlation matrix could not be inverted
    #[error("numerical failure: {0}")]
    Numerical(String),

    /// A category value lies outside of `[0, max_bin)`
    #[error("category {value} at row {row}, column {col} is outside of [0, {max_bin})")]
    Range { row: usize, col: usize, value: usize, max_bin: usize },

    /// A configuration value is out of its admissible range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The class passed to a classifier was not seen at fit
    #[error("unknown class: {0}")]
    UnknownClass(String),

    /// A dataset line could not be parsed
    #[error("line {line}: {msg}")]
    Parse { line: usize, msg: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
