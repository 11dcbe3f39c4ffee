//! Error types for od-io.

use thiserror::Error;

use od_core::{OdError, ZoneNumber};

/// Errors raised while reading or writing matrices and zone files.
#[derive(Debug, Error)]
pub enum MatrixIoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: zone {zone} does not exist in the zone system")]
    UnknownZone { zone: ZoneNumber, line: usize },

    #[error("binary matrix has {got} bytes, expected {expected}")]
    Length { expected: usize, got: usize },

    #[error(transparent)]
    Core(#[from] OdError),
}

/// Alias for `Result<T, MatrixIoError>`.
pub type MatrixIoResult<T> = Result<T, MatrixIoError>;
