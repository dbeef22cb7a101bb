//! Reading matrices from coordinate-format text files

pub mod loader;

pub use loader::{load, load_from_reader, load_with_config};
