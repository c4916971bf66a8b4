//! Error types for occupancy grids.

use thiserror::Error;

/// Errors that can occur while binding a grid view to its buffers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// Grid layout parameters are unusable.
    #[error("invalid grid layout: {0}")]
    InvalidLayout(String),

    /// A buffer does not match the `[levels, nx, ny, nz]` layout.
    #[error("{name} has {actual} elements, expected {expected}")]
    ShapeMismatch {
        /// Name of the offending buffer.
        name: &'static str,
        /// Element count implied by the layout.
        expected: usize,
        /// Element count found.
        actual: usize,
    },

    /// A declared shape has the wrong rank.
    #[error("{name} must have rank {expected}, got shape {shape:?}")]
    InvalidRank {
        /// Name of the offending buffer.
        name: &'static str,
        /// Required rank.
        expected: usize,
        /// Shape found.
        shape: Vec<usize>,
    },
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
