//! Growable output buffer shared by the kernels
//!
//! Kernels write their result row by row into a [`CsrBuffer`]. The buffer
//! may still hold explicit zeros produced by cancellation; it only becomes a
//! [`SparseMatrixCSR`] through [`compact`](crate::ops::compact::compact) or
//! [`CsrBuffer::finish`], so a failing kernel never hands out a partial matrix.

use num_traits::Num;
use std::ops::AddAssign;

use crate::error::{try_filled, try_reserve, Result};
use crate::matrix::SparseMatrixCSR;

/// Over-allocated CSR storage under construction
#[derive(Debug)]
pub struct CsrBuffer<T> {
    pub(crate) n_rows: usize,
    pub(crate) n_cols: usize,
    pub(crate) row_ptr: Vec<usize>,
    pub(crate) col_idx: Vec<usize>,
    pub(crate) values: Vec<T>,
}

impl<T> CsrBuffer<T>
where
    T: Copy + Num,
{
    /// Creates a buffer with room for `capacity` entries
    pub fn with_capacity(n_rows: usize, n_cols: usize, capacity: usize) -> Result<Self> {
        let row_ptr = try_filled(n_rows + 1, 0, "row_ptr")?;
        let mut col_idx = Vec::new();
        try_reserve(&mut col_idx, capacity, "col_idx")?;
        let mut values = Vec::new();
        try_reserve(&mut values, capacity, "values")?;

        Ok(Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx,
            values,
        })
    }

    /// Number of entries written so far
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.values.capacity().min(self.col_idx.capacity())
    }

    /// Records that row `row` starts at the current fill position
    pub fn start_row(&mut self, row: usize) {
        self.row_ptr[row] = self.values.len();
    }

    /// Start position recorded for `row`
    pub fn row_start(&self, row: usize) -> usize {
        self.row_ptr[row]
    }

    /// Appends an entry, doubling the storage when it is full
    ///
    /// Returns the position of the new entry.
    pub fn push(&mut self, col: usize, val: T) -> Result<usize> {
        if self.values.len() == self.capacity() {
            self.grow()?;
        }
        let pos = self.values.len();
        self.col_idx.push(col);
        self.values.push(val);
        Ok(pos)
    }

    /// Closes the last row so that `row_ptr[n_rows] == len()`
    pub fn seal(&mut self) {
        self.row_ptr[self.n_rows] = self.values.len();
    }

    /// Converts the buffer into a matrix as-is, keeping any stored zeros
    pub fn finish(mut self) -> SparseMatrixCSR<T> {
        self.seal();
        self.col_idx.shrink_to_fit();
        self.values.shrink_to_fit();
        SparseMatrixCSR {
            n_rows: self.n_rows,
            n_cols: self.n_cols,
            row_ptr: self.row_ptr,
            col_idx: self.col_idx,
            values: self.values,
        }
    }

    fn grow(&mut self) -> Result<()> {
        let len = self.values.len();
        let additional = len.max(1);
        log::trace!("growing CSR output buffer from {} to {} entries", len, len + additional);
        try_reserve(&mut self.col_idx, additional, "col_idx")?;
        try_reserve(&mut self.values, additional, "values")?;
        Ok(())
    }
}

impl<T> CsrBuffer<T>
where
    T: Copy + AddAssign,
{
    /// Adds `val` into the entry at `pos`
    pub fn accumulate(&mut self, pos: usize, val: T) {
        self.values[pos] += val;
    }
}
