//! Configuration for loading and kernel buffer sizing

/// Default comment marker of the coordinate format
pub const DEFAULT_COMMENT_MARKER: char = '%';

/// Default starting capacity of the multiply output buffers
pub const DEFAULT_INITIAL_OUTPUT_CAPACITY: usize = 1024;

/// Configuration shared by the loader and the kernels
#[derive(Debug, Clone, PartialEq)]
pub struct CsrConfig {
    /// Lines starting with this character before the header are ignored
    pub comment_marker: char,

    /// Lower bound for the initial capacity of the multiply output buffers.
    /// The buffers start at `max(initial_output_capacity, a.nnz())` and double
    /// when full.
    pub initial_output_capacity: usize,
}

impl Default for CsrConfig {
    fn default() -> Self {
        Self {
            comment_marker: DEFAULT_COMMENT_MARKER,
            initial_output_capacity: DEFAULT_INITIAL_OUTPUT_CAPACITY,
        }
    }
}

impl CsrConfig {
    pub fn with_comment_marker(mut self, marker: char) -> Self {
        self.comment_marker = marker;
        self
    }

    pub fn with_initial_output_capacity(mut self, capacity: usize) -> Self {
        self.initial_output_capacity = capacity;
        self
    }
}
