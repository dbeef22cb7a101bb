//! # csrkit: Compressed Sparse Row matrix engine
//!
//! csrkit loads sparse matrices from coordinate-format (Matrix Market style)
//! text files into Compressed Sparse Row form and provides four kernels on
//! them: addition, subtraction, multiplication and transpose.
//!
//! ## Components
//!
//! 1. **Matrix value type**: [`SparseMatrixCSR`], three owned arrays plus the
//!    dimensions.
//!
//! 2. **Loader**: [`load`] reads a file in two passes, counting entries per
//!    row first and placing them second.
//!
//! 3. **Kernels**:
//!    - **Elementwise combinator**: [`add`] and [`subtract`] merge rows with a
//!      column marker
//!    - **Gather multiply**: [`multiply`] accumulates partial products per
//!      output row without resetting its marker array
//!    - **Counting-sort transpose**: [`transpose`]
//!
//! 4. **Compaction**: entries that cancel to exactly zero in addition,
//!    subtraction or multiplication are removed before the result is
//!    returned.
//!
//! Column order inside a row is insertion order and is never sorted
//! implicitly.
//!
//! ## Usage
//!
//! ```
//! use csrkit::{add, multiply, transpose, SparseMatrixCSR};
//!
//! // A = [1 0; 0 2], B = [0 3; 4 0]
//! let a = SparseMatrixCSR::new(2, 2, vec![0, 1, 2], vec![0, 1], vec![1.0, 2.0]);
//! let b = SparseMatrixCSR::new(2, 2, vec![0, 1, 2], vec![1, 0], vec![3.0, 4.0]);
//!
//! let sum = add(&a, &b).unwrap();
//! assert_eq!(sum.nnz(), 4);
//!
//! let product = multiply(&a, &b).unwrap();
//! assert_eq!(product.values, vec![3.0, 8.0]);
//!
//! assert_eq!(transpose(&a), a);
//! ```

pub mod config;
pub mod error;
pub mod io;
pub mod matrix;
pub mod ops;
pub mod utils;

// Re-export primary components
pub use config::CsrConfig;
pub use error::{Operation, Result, SparseError};
pub use io::{load, load_from_reader, load_with_config};
pub use matrix::{CsrBuffer, SparseMatrixCSR};
pub use ops::{add, combine, multiply, multiply_with_config, subtract, transpose, Sign};
pub use utils::{from_sprs_csr, to_sprs_csr};

/// Version information for the csrkit library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
