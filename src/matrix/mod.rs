// Matrix data structures

pub mod buffer;
pub mod csr;

pub use buffer::CsrBuffer;
pub use csr::SparseMatrixCSR;
