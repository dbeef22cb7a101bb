//! Compressed Sparse Row (CSR) matrix format implementation

use std::fmt;
use num_traits::Num;

use crate::error::{Result, SparseError};

/// A sparse matrix in Compressed Sparse Row (CSR) format
///
/// The CSR format stores a sparse matrix using three arrays:
/// - row_ptr: Array of size n_rows + 1 containing indices into col_idx and values arrays
/// - col_idx: Array of size nnz containing column indices of non-zero elements
/// - values: Array of size nnz containing the non-zero values
///
/// Column indices inside a row are kept in the order they were inserted;
/// nothing in this crate sorts them implicitly. The one exception is
/// [`transpose`](crate::transpose), whose output rows come out sorted as a
/// consequence of the counting sort.
#[derive(Clone, PartialEq)]
pub struct SparseMatrixCSR<T> {
    /// Number of rows in the matrix
    pub n_rows: usize,

    /// Number of columns in the matrix
    pub n_cols: usize,

    /// Row pointers (size: n_rows + 1)
    /// row_ptr[i] is the index in col_idx and values where row i starts
    /// row_ptr[n_rows] is equal to nnz
    pub row_ptr: Vec<usize>,

    /// Column indices (size: nnz)
    pub col_idx: Vec<usize>,

    /// Non-zero values (size: nnz)
    pub values: Vec<T>,
}

impl<T> SparseMatrixCSR<T>
where
    T: Copy + Num,
{
    /// Creates a new CSR matrix with the given dimensions and data
    ///
    /// # Panics
    ///
    /// Panics if the input arrays are inconsistent. See [`try_new`](Self::try_new)
    /// for the checks performed.
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        match Self::try_new(n_rows, n_cols, row_ptr, col_idx, values) {
            Ok(matrix) => matrix,
            Err(err) => panic!("{}", err),
        }
    }

    /// Creates a new CSR matrix, checking the structural invariants
    ///
    /// # Errors
    ///
    /// Returns [`SparseError::InvalidStructure`] if:
    /// - row_ptr.len() is not n_rows + 1
    /// - col_idx.len() differs from values.len()
    /// - row_ptr[0] is not 0 or row_ptr[n_rows] is not nnz
    /// - row_ptr decreases anywhere
    /// - a column index is out of bounds
    pub fn try_new(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        let matrix = Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx,
            values,
        };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Checks the CSR invariants of this matrix
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(SparseError::InvalidStructure(msg));

        if self.row_ptr.len() != self.n_rows + 1 {
            return invalid(format!(
                "row_ptr.len() must be n_rows + 1 (got {}, n_rows = {})",
                self.row_ptr.len(),
                self.n_rows
            ));
        }
        if self.col_idx.len() != self.values.len() {
            return invalid(format!(
                "col_idx.len() must equal values.len() ({} != {})",
                self.col_idx.len(),
                self.values.len()
            ));
        }
        if self.row_ptr[0] != 0 {
            return invalid(format!("row_ptr[0] must be 0 (got {})", self.row_ptr[0]));
        }
        if self.row_ptr[self.n_rows] != self.col_idx.len() {
            return invalid(format!(
                "row_ptr[n_rows] must equal col_idx.len() ({} != {})",
                self.row_ptr[self.n_rows],
                self.col_idx.len()
            ));
        }
        if let Some(i) = self.row_ptr.windows(2).position(|w| w[0] > w[1]) {
            return invalid(format!(
                "row_ptr decreases at row {} ({} > {})",
                i,
                self.row_ptr[i],
                self.row_ptr[i + 1]
            ));
        }
        if let Some(&col) = self.col_idx.iter().find(|&&col| col >= self.n_cols) {
            return invalid(format!(
                "Column index {} out of bounds (n_cols = {})",
                col, self.n_cols
            ));
        }
        Ok(())
    }

    /// Builds a matrix from `(row, col, value)` triplets
    ///
    /// Entries keep the order in which they appear in `triplets` within each
    /// row. Repeated coordinates are stored as separate entries.
    pub fn from_triplets(
        n_rows: usize,
        n_cols: usize,
        triplets: &[(usize, usize, T)],
    ) -> Result<Self> {
        let mut row_ptr = vec![0; n_rows + 1];
        for &(row, col, _) in triplets {
            if row >= n_rows || col >= n_cols {
                return Err(SparseError::InvalidStructure(format!(
                    "triplet ({}, {}) out of bounds for {}×{} matrix",
                    row, col, n_rows, n_cols
                )));
            }
            row_ptr[row + 1] += 1;
        }
        for i in 1..=n_rows {
            row_ptr[i] += row_ptr[i - 1];
        }

        let mut cursor = row_ptr.clone();
        let mut col_idx = vec![0; triplets.len()];
        let mut values = vec![T::zero(); triplets.len()];
        for &(row, col, val) in triplets {
            let pos = cursor[row];
            cursor[row] += 1;
            col_idx[pos] = col;
            values[pos] = val;
        }

        Self::try_new(n_rows, n_cols, row_ptr, col_idx, values)
    }

    /// Returns the number of non-zero elements in the matrix
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Returns `(n_rows, n_cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// True when no entries are stored
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns an iterator over the non-zero elements in row i
    ///
    /// Each item is a tuple (col_idx, value) representing a non-zero element
    pub fn row_iter(&self, i: usize) -> impl Iterator<Item = (usize, &T)> {
        assert!(i < self.n_rows, "Row index out of bounds");

        let start = self.row_ptr[i];
        let end = self.row_ptr[i + 1];

        self.col_idx[start..end]
            .iter()
            .zip(&self.values[start..end])
            .map(|(&col, val)| (col, val))
    }

    /// Iterates over all stored entries as `(row, col, value)` in storage order
    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        (0..self.n_rows).flat_map(move |i| self.row_iter(i).map(move |(col, &val)| (i, col, val)))
    }

    /// Creates an empty matrix with the given dimensions
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            row_ptr: vec![0; n_rows + 1],
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Creates an identity matrix of the given size
    pub fn identity(n: usize) -> Self {
        Self {
            n_rows: n,
            n_cols: n,
            row_ptr: (0..=n).collect(),
            col_idx: (0..n).collect(),
            values: vec![T::one(); n],
        }
    }
}

impl<T> SparseMatrixCSR<T> {
    /// Frees the storage and resets this value to the empty 0×0 matrix
    ///
    /// Calling this on an already released or default matrix does nothing.
    pub fn release(&mut self) {
        self.n_rows = 0;
        self.n_cols = 0;
        self.row_ptr = vec![0];
        self.col_idx = Vec::new();
        self.values = Vec::new();
    }
}

impl<T> Default for SparseMatrixCSR<T> {
    fn default() -> Self {
        Self {
            n_rows: 0,
            n_cols: 0,
            row_ptr: vec![0],
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SparseMatrixCSR<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SparseMatrixCSR {{")?;
        writeln!(f, "  dimensions: {} × {}", self.n_rows, self.n_cols)?;
        writeln!(f, "  nnz: {}", self.values.len())?;

        // Print a sample of the matrix content
        let max_rows_to_print = 5.min(self.n_rows);

        if max_rows_to_print > 0 {
            writeln!(f, "  content sample:")?;

            for i in 0..max_rows_to_print {
                write!(f, "    row {}: ", i)?;
                let start = self.row_ptr[i];
                let end = self.row_ptr[i + 1];

                if start == end {
                    writeln!(f, "(empty)")?;
                } else {
                    let max_elements = 5.min(end - start);

                    for j in start..(start + max_elements) {
                        write!(f, "({}, {:?}) ", self.col_idx[j], self.values[j])?;
                    }

                    if end - start > max_elements {
                        write!(f, "... ({} more)", end - start - max_elements)?;
                    }

                    writeln!(f)?;
                }
            }

            if self.n_rows > max_rows_to_print {
                writeln!(f, "    ... ({} more rows)", self.n_rows - max_rows_to_print)?;
            }
        }

        write!(f, "}}")
    }
}

/// Raw array report: non-zero count, row pointers, column indices, values
impl<T: fmt::Display> fmt::Display for SparseMatrixCSR<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of non-zeros: {}", self.values.len())?;
        write!(f, "Row Pointer:")?;
        for ptr in &self.row_ptr {
            write!(f, " {}", ptr)?;
        }
        writeln!(f)?;
        write!(f, "Column Index:")?;
        for col in &self.col_idx {
            write!(f, " {}", col)?;
        }
        writeln!(f)?;
        write!(f, "Values:")?;
        for val in &self.values {
            write!(f, " {:.4}", val)?;
        }
        Ok(())
    }
}
