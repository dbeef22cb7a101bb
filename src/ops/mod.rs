//! Algebraic kernels on CSR matrices
//!
//! Addition and subtraction share the merge in [`combine`]; multiplication
//! gathers row-wise in [`multiply`]; [`transpose`] is a counting sort.
//! Kernels that can cancel values finish with [`compact`].

pub mod combine;
pub mod compact;
pub mod multiply;
pub mod transpose;

pub use combine::{add, combine, subtract, Sign};
pub use compact::compact;
pub use multiply::{multiply, multiply_with_config};
pub use transpose::transpose;
