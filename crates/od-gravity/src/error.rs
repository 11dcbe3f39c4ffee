use od_core::OdError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GravityError {
    #[error("gravity configuration error: {0}")]
    Config(String),

    /// Shape, index, and zone errors from the input arrays.
    #[error(transparent)]
    Core(#[from] OdError),
}

pub type GravityResult<T> = Result<T, GravityError>;
