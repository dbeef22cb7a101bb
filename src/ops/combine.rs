//! Elementwise addition and subtraction
//!
//! Both operations share one merge: A's row is copied into the output, then
//! B's row is folded in with a column marker that remembers where each
//! column of the current row was written.

use num_traits::Num;
use std::ops::{AddAssign, Neg};

use crate::error::{try_filled, Operation, Result, SparseError};
use crate::matrix::{CsrBuffer, SparseMatrixCSR};
use crate::ops::compact::compact;

/// Marker value for "column not written in the current row"
const UNMARKED: usize = usize::MAX;

/// Factor applied to the right operand's values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    fn apply<T: Neg<Output = T>>(self, val: T) -> T {
        match self {
            Sign::Plus => val,
            Sign::Minus => -val,
        }
    }

    fn operation(self) -> Operation {
        match self {
            Sign::Plus => Operation::Add,
            Sign::Minus => Operation::Subtract,
        }
    }
}

/// Computes `A + sign·B`
///
/// Within each output row, A's entries come first in A's order, followed by
/// the columns that only B contributes, in B's order. Entries that cancel to
/// exactly zero are removed.
///
/// # Errors
///
/// [`SparseError::DimensionMismatch`] when the shapes differ, and
/// [`SparseError::Allocation`] when the output cannot be reserved.
pub fn combine<T>(
    a: &SparseMatrixCSR<T>,
    b: &SparseMatrixCSR<T>,
    sign: Sign,
) -> Result<SparseMatrixCSR<T>>
where
    T: Copy + Num + AddAssign + Neg<Output = T>,
{
    if a.shape() != b.shape() {
        return Err(SparseError::DimensionMismatch {
            operation: sign.operation(),
            left: a.shape(),
            right: b.shape(),
        });
    }

    let (n_rows, n_cols) = a.shape();
    let mut output = CsrBuffer::with_capacity(n_rows, n_cols, a.nnz() + b.nnz())?;
    let mut marker = try_filled(n_cols, UNMARKED, "column marker")?;

    for i in 0..n_rows {
        output.start_row(i);

        for (col, &val) in a.row_iter(i) {
            marker[col] = output.push(col, val)?;
        }

        for (col, &val) in b.row_iter(i) {
            let val = sign.apply(val);
            match marker[col] {
                UNMARKED => marker[col] = output.push(col, val)?,
                pos => output.accumulate(pos, val),
            }
        }

        // Only the columns this row touched need clearing
        for (col, _) in a.row_iter(i).chain(b.row_iter(i)) {
            marker[col] = UNMARKED;
        }
    }

    let result = compact(output);
    log::debug!(
        "{}: {}×{}, nnz {} + {} -> {}",
        sign.operation(),
        n_rows,
        n_cols,
        a.nnz(),
        b.nnz(),
        result.nnz()
    );
    Ok(result)
}

/// Computes `A + B`
pub fn add<T>(a: &SparseMatrixCSR<T>, b: &SparseMatrixCSR<T>) -> Result<SparseMatrixCSR<T>>
where
    T: Copy + Num + AddAssign + Neg<Output = T>,
{
    combine(a, b, Sign::Plus)
}

/// Computes `A - B`
pub fn subtract<T>(a: &SparseMatrixCSR<T>, b: &SparseMatrixCSR<T>) -> Result<SparseMatrixCSR<T>>
where
    T: Copy + Num + AddAssign + Neg<Output = T>,
{
    combine(a, b, Sign::Minus)
}
