//! Error types for loading and operating on CSR matrices

use std::collections::TryReserveError;
use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Kernel that rejected its operands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Add => "addition",
            Operation::Subtract => "subtraction",
            Operation::Multiply => "multiplication",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum SparseError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed input at line {line}: {message}")]
    Format { line: usize, message: String },

    #[error("failed to allocate {requested} elements for {what}")]
    Allocation {
        what: &'static str,
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    #[error(
        "incompatible dimensions for {operation}: {}×{} and {}×{}",
        .left.0, .left.1, .right.0, .right.1
    )]
    DimensionMismatch {
        operation: Operation,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("invalid CSR structure: {0}")]
    InvalidStructure(String),
}

pub type Result<T> = std::result::Result<T, SparseError>;

impl SparseError {
    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        SparseError::Format {
            line,
            message: message.into(),
        }
    }
}

/// Reserves `additional` slots in `vec` without aborting on failure
pub(crate) fn try_reserve<T>(vec: &mut Vec<T>, additional: usize, what: &'static str) -> Result<()> {
    vec.try_reserve_exact(additional)
        .map_err(|source| SparseError::Allocation {
            what,
            requested: additional,
            source,
        })
}

/// Allocates a vector of `len` copies of `value`, reporting allocation failure
pub(crate) fn try_filled<T: Clone>(len: usize, value: T, what: &'static str) -> Result<Vec<T>> {
    let mut vec = Vec::new();
    try_reserve(&mut vec, len, what)?;
    vec.resize(len, value);
    Ok(vec)
}
