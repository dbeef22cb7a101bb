//! Removal of explicit zeros left behind by cancellation

use num_traits::Num;

use crate::matrix::{CsrBuffer, SparseMatrixCSR};

/// Drops every entry whose value is exactly zero and trims the storage
///
/// Relative order inside each row is preserved and `row_ptr` is rebuilt for
/// the survivors. Compaction happens in place, so it cannot fail.
/// The test is `is_zero()`, i.e. exact equality with zero;
/// values that are merely tiny survive.
pub fn compact<T>(mut buffer: CsrBuffer<T>) -> SparseMatrixCSR<T>
where
    T: Copy + Num,
{
    buffer.seal();
    let before = buffer.len();

    let mut write = 0;
    let mut row_start = 0;
    for i in 0..buffer.n_rows {
        let row_end = buffer.row_ptr[i + 1];
        buffer.row_ptr[i] = write;

        for read in row_start..row_end {
            let val = buffer.values[read];
            if !val.is_zero() {
                buffer.col_idx[write] = buffer.col_idx[read];
                buffer.values[write] = val;
                write += 1;
            }
        }
        row_start = row_end;
    }
    buffer.row_ptr[buffer.n_rows] = write;
    buffer.col_idx.truncate(write);
    buffer.values.truncate(write);

    if before != write {
        log::debug!("compaction dropped {} cancelled entries", before - write);
    }

    buffer.finish()
}
