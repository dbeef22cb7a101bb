//! Sparse matrix-matrix multiplication (SpGEMM) by row-wise gathering
//!
//! For every row `i` of A the partial products `A[i,k]·B[k,j]` are gathered
//! straight into the output buffer. A marker per output column remembers
//! where the running sum for that column lives.
//!
//! The marker array is never reset between rows. A marker is considered
//! stale when it is unset or points before `row_ptr[i]`, the position at
//! which row `i` started. This works because the output `row_ptr` never
//! decreases: any position recorded while filling an earlier row is
//! strictly smaller than the start of every later row.

use num_traits::Num;
use std::ops::AddAssign;

use crate::config::CsrConfig;
use crate::error::{try_filled, Operation, Result, SparseError};
use crate::matrix::{CsrBuffer, SparseMatrixCSR};
use crate::ops::compact::compact;

/// Computes `C = A·B` with the default configuration
///
/// # Errors
///
/// [`SparseError::DimensionMismatch`] unless `a.n_cols == b.n_rows`, and
/// [`SparseError::Allocation`] when the output buffers cannot grow.
///
/// # Examples
///
/// ```
/// use csrkit::{multiply, SparseMatrixCSR};
///
/// // A = [1 0; 0 2], B = [0 3; 4 0]
/// let a = SparseMatrixCSR::new(2, 2, vec![0, 1, 2], vec![0, 1], vec![1.0, 2.0]);
/// let b = SparseMatrixCSR::new(2, 2, vec![0, 1, 2], vec![1, 0], vec![3.0, 4.0]);
///
/// let c = multiply(&a, &b).unwrap();
/// assert_eq!(c.col_idx, vec![1, 0]);
/// assert_eq!(c.values, vec![3.0, 8.0]);
/// ```
pub fn multiply<T>(a: &SparseMatrixCSR<T>, b: &SparseMatrixCSR<T>) -> Result<SparseMatrixCSR<T>>
where
    T: Copy + Num + AddAssign,
{
    multiply_with_config(a, b, &CsrConfig::default())
}

/// Computes `C = A·B`, sizing the initial output buffers from `config`
pub fn multiply_with_config<T>(
    a: &SparseMatrixCSR<T>,
    b: &SparseMatrixCSR<T>,
    config: &CsrConfig,
) -> Result<SparseMatrixCSR<T>>
where
    T: Copy + Num + AddAssign,
{
    if a.n_cols != b.n_rows {
        return Err(SparseError::DimensionMismatch {
            operation: Operation::Multiply,
            left: a.shape(),
            right: b.shape(),
        });
    }

    let n_rows = a.n_rows;
    let n_cols = b.n_cols;

    let capacity = config.initial_output_capacity.max(a.nnz());
    let mut output = CsrBuffer::with_capacity(n_rows, n_cols, capacity)?;
    let mut marker: Vec<Option<usize>> = try_filled(n_cols, None, "column marker")?;

    for i in 0..n_rows {
        output.start_row(i);
        let row_start = output.row_start(i);

        for (k, &a_val) in a.row_iter(i) {
            for (j, &b_val) in b.row_iter(k) {
                let product = a_val * b_val;
                match marker[j] {
                    Some(pos) if pos >= row_start => output.accumulate(pos, product),
                    _ => marker[j] = Some(output.push(j, product)?),
                }
            }
        }
    }

    let produced = output.len();
    let result = compact(output);
    log::debug!(
        "multiplication: {}×{} by {}×{}, {} gathered entries -> nnz {}",
        a.n_rows,
        a.n_cols,
        b.n_rows,
        b.n_cols,
        produced,
        result.nnz()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dense_of(matrix: &SparseMatrixCSR<f64>) -> Vec<Vec<f64>> {
        let mut dense = vec![vec![0.0; matrix.n_cols]; matrix.n_rows];
        for (i, j, val) in matrix.triplets() {
            dense[i][j] += val;
        }
        dense
    }

    #[test]
    fn test_multiplication() {
        // A = [1 2; 0 3]
        // B = [4 5; 6 7]
        // Expected result: C = A*B = [16 19; 18 21]
        let a = SparseMatrixCSR::new(2, 2, vec![0, 2, 3], vec![0, 1, 1], vec![1.0, 2.0, 3.0]);
        let b = SparseMatrixCSR::new(2, 2, vec![0, 2, 4], vec![0, 1, 0, 1], vec![4.0, 5.0, 6.0, 7.0]);

        let c = multiply(&a, &b).unwrap();

        assert_eq!(c.shape(), (2, 2));
        assert_eq!(c.nnz(), 4);
        assert_eq!(dense_of(&c), vec![vec![16.0, 19.0], vec![18.0, 21.0]]);
    }

    #[test]
    fn test_first_produced_column_order() {
        // Row 0 of A hits row 1 of B first (cols 2, 0), then row 0 of B (cols 1, 2)
        let a = SparseMatrixCSR::new(1, 2, vec![0, 2], vec![1, 0], vec![1.0, 1.0]);
        let b = SparseMatrixCSR::new(2, 3, vec![0, 2, 4], vec![1, 2, 2, 0], vec![1.0, 1.0, 2.0, 3.0]);

        let c = multiply(&a, &b).unwrap();
        assert_eq!(c.col_idx, vec![2, 0, 1]);
        assert_eq!(c.values, vec![3.0, 3.0, 1.0]);
    }

    #[test]
    fn test_stale_markers_from_previous_rows() {
        // Both rows produce column 0; the marker from row 0 must not be reused in row 1
        let a = SparseMatrixCSR::new(3, 1, vec![0, 1, 1, 2], vec![0, 0], vec![2.0, 5.0]);
        let b = SparseMatrixCSR::new(1, 2, vec![0, 2], vec![0, 1], vec![1.0, 10.0]);

        let c = multiply(&a, &b).unwrap();
        assert_eq!(c.row_ptr, vec![0, 2, 2, 4]);
        assert_eq!(c.col_idx, vec![0, 1, 0, 1]);
        assert_eq!(c.values, vec![2.0, 20.0, 5.0, 50.0]);
    }

    #[test]
    fn test_cancellation_is_compacted() {
        // A = [1 1], B = [2; -2] -> C = [0]
        let a = SparseMatrixCSR::new(1, 2, vec![0, 2], vec![0, 1], vec![1.0, 1.0]);
        let b = SparseMatrixCSR::new(2, 1, vec![0, 1, 2], vec![0, 0], vec![2.0, -2.0]);

        let c = multiply(&a, &b).unwrap();
        assert_eq!(c.shape(), (1, 1));
        assert_eq!(c.nnz(), 0);
        assert_eq!(c.row_ptr, vec![0, 0]);
    }

    #[test]
    fn test_growth_from_tiny_capacity() {
        let n = 50;
        let a = SparseMatrixCSR::new(n, 1, (0..=n).collect(), vec![0; n], vec![1.0; n]);
        let b = SparseMatrixCSR::new(1, n, vec![0, n], (0..n).collect(), vec![2.0; n]);
        let config = CsrConfig::default().with_initial_output_capacity(0);

        let c = multiply_with_config(&a, &b, &config).unwrap();
        assert_eq!(c.nnz(), n * n);
        assert!(c.values.iter().all(|&v| v == 2.0));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_identity_multiplication() {
        let identity = SparseMatrixCSR::<i32>::identity(3);
        let diagonal = SparseMatrixCSR::new(3, 3, vec![0, 1, 2, 3], vec![0, 1, 2], vec![5, 6, 7]);

        let result = multiply(&identity, &diagonal).unwrap();
        assert_eq!(result, diagonal);
    }

    #[test]
    fn test_repeated_coordinates_are_summed_into_one_entry() {
        // A holds (0,0) twice; both copies gather into the same output slots
        let a = SparseMatrixCSR::new(1, 1, vec![0, 2], vec![0, 0], vec![1.0, 2.0]);
        let b = SparseMatrixCSR::new(1, 2, vec![0, 2], vec![1, 0], vec![3.0, 4.0]);

        let c = multiply(&a, &b).unwrap();
        assert_eq!(c.row_ptr, vec![0, 2]);
        assert_eq!(c.col_idx, vec![1, 0]);
        assert_eq!(c.values, vec![9.0, 12.0]);

        // A repeated column in B collapses as well
        let a = SparseMatrixCSR::new(1, 1, vec![0, 1], vec![0], vec![2.0]);
        let b = SparseMatrixCSR::new(1, 2, vec![0, 2], vec![1, 1], vec![1.0, 2.0]);

        let c = multiply(&a, &b).unwrap();
        assert_eq!(c.col_idx, vec![1]);
        assert_eq!(c.values, vec![6.0]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = SparseMatrixCSR::<f64>::zeros(2, 3);
        let b = SparseMatrixCSR::<f64>::zeros(2, 3);

        assert!(matches!(
            multiply(&a, &b),
            Err(SparseError::DimensionMismatch { operation: Operation::Multiply, left: (2, 3), right: (2, 3) })
        ));
    }
}
