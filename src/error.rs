use std::fmt;
use std::io;

use num_bigint::ParseBigIntError;
use thiserror::Error;

/// Which coefficient list of a record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Old,
    New,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Old => f.write_str("old"),
            Side::New => f.write_str("new"),
        }
    }
}

/// Errors that abort a run. Record indices are 1-based.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("record {record}: input ended before the {line} line")]
    UnexpectedEof { record: usize, line: &'static str },

    #[error("record {record}: invalid {side} coefficient {token:?}: {source}")]
    ParseCoefficient {
        record: usize,
        side: Side,
        token: String,
        source: ParseBigIntError,
    },

    #[error("record {record}: {side} coefficient list is empty")]
    EmptyList { record: usize, side: Side },

    #[error("record {record}: largest old coefficient is zero")]
    DivisionByZero { record: usize },

    #[error("record {record}: coefficient ratio is zero, log2 is undefined")]
    LogOfZero { record: usize },

    #[error("average GCD is too large for a float")]
    AverageOverflow,

    #[error("iteration count must be at least 1")]
    NoIterations,
}

pub type Result<T> = std::result::Result<T, Error>;
