use std::fmt;

use thiserror::Error;

use od_core::{OdError, ZoneNumber};

/// Which column of the mapping file a zone number came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MappingSide {
    Original,
    Converted,
}

impl fmt::Display for MappingSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingSide::Original  => f.write_str("original"),
            MappingSide::Converted => f.write_str("converted"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RemapError {
    #[error("mapping line {line}: {side} zone {zone} does not exist in the {side} zone system")]
    UnknownZoneInMapping {
        side: MappingSide,
        zone: ZoneNumber,
        line: usize,
    },

    #[error("mapping line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("mapping file error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] OdError),
}

pub type RemapResult<T> = Result<T, RemapError>;
