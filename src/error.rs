use thiserror::Error;

/// Validation failures raised by the signature and feature stages.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LipError {
    #[error("column index {index} is out of bounds for a sinogram with {columns} columns")]
    ColumnOutOfRange { index: usize, columns: usize },

    #[error("unknown aggregation mode '{0}' (expected 'default', 'ref_by_LIP0' or 'ref_by_LIP0_fft')")]
    UnknownMode(String),

    #[error("unknown statistic '{0}' (expected one of max, min, median, mean, std)")]
    UnknownStatistic(String),

    #[error("{what}: expected length {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("signature is empty")]
    EmptySignature,

    #[error("invalid LIP matrix: {0}")]
    InvalidMatrix(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type LipResult<T> = std::result::Result<T, LipError>;
