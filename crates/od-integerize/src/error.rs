use thiserror::Error;

use od_core::OdError;

#[derive(Debug, Error)]
pub enum IntegerizeError {
    /// Shape or index errors in the input matrix or its grouping.
    #[error(transparent)]
    Core(#[from] OdError),
}

pub type IntegerizeResult<T> = Result<T, IntegerizeError>;
