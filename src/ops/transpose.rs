//! Transpose by counting sort

use num_traits::Num;

use crate::matrix::SparseMatrixCSR;
use crate::utils::exclusive_scan;

/// Returns the transpose of `a`
///
/// Entries are distributed with a counting sort: one pass counts the entries
/// of each source column, a prefix sum turns the counts into `row_ptr`, and a
/// second pass scatters the entries while walking source rows in ascending
/// order. As a result every row of the transpose lists its column indices in
/// increasing order, whatever the order inside the rows of `a`. The order is
/// strict unless `a` stores the same coordinate twice.
///
/// No values are combined, so `nnz` is preserved exactly.
pub fn transpose<T>(a: &SparseMatrixCSR<T>) -> SparseMatrixCSR<T>
where
    T: Copy + Num,
{
    let n_rows = a.n_cols;
    let n_cols = a.n_rows;
    let nnz = a.nnz();

    // Count non-zeros per column of A
    let mut counts = vec![0; n_rows];
    for &col in &a.col_idx {
        counts[col] += 1;
    }
    let row_ptr = exclusive_scan(&counts);

    let mut col_idx = vec![0; nnz];
    let mut values = vec![T::zero(); nnz];
    let mut cursor = vec![0; n_rows];

    for row in 0..a.n_rows {
        for (col, &val) in a.row_iter(row) {
            let dest = row_ptr[col] + cursor[col];
            col_idx[dest] = row;
            values[dest] = val;
            cursor[col] += 1;
        }
    }

    log::debug!("transpose: {}×{} -> {}×{}, nnz {}", a.n_rows, a.n_cols, n_rows, n_cols, nnz);

    SparseMatrixCSR {
        n_rows,
        n_cols,
        row_ptr,
        col_idx,
        values,
    }
}
