//! Utilities for converting between our CSR format and sprs

use crate::matrix::SparseMatrixCSR;
use num_traits::Num;
use sprs::{CsMat, TriMat};

/// Converts our CSR matrix format to sprs CsMat format
///
/// sprs requires sorted, duplicate-free rows, so the entries go through a
/// `TriMat`. Repeated coordinates are summed on the way.
pub fn to_sprs_csr<T>(matrix: &SparseMatrixCSR<T>) -> CsMat<T>
where
    T: Copy + Num + Default,
{
    let mut triplets = TriMat::with_capacity((matrix.n_rows, matrix.n_cols), matrix.nnz());
    for (row, col, val) in matrix.triplets() {
        triplets.add_triplet(row, col, val);
    }
    triplets.to_csr()
}

/// Converts sprs CsMat to our SparseMatrixCSR format
pub fn from_sprs_csr<T>(matrix: CsMat<T>) -> SparseMatrixCSR<T>
where
    T: Copy + Num + Default,
{
    // Ensure matrix is in CSR format
    let matrix = if matrix.is_csr() {
        matrix
    } else {
        matrix.to_csr()
    };

    let shape = matrix.shape();
    let (indptr, indices, data) = matrix.into_raw_storage();

    SparseMatrixCSR::new(shape.0, shape.1, indptr, indices, data)
}
