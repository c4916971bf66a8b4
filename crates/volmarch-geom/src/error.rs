//! Error types for ray and box construction.

use thiserror::Error;

/// Errors that can occur while binding geometry views to buffers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeomError {
    /// Origins and directions describe a different number of rays.
    #[error("rays buffer mismatch: {origins} origins, {dirs} directions")]
    LengthMismatch {
        /// Number of origins.
        origins: usize,
        /// Number of directions.
        dirs: usize,
    },

    /// A flat coordinate buffer is not a whole number of xyz triples.
    #[error("{name} has {len} floats, expected a multiple of 3")]
    NotTriples {
        /// Name of the offending buffer.
        name: &'static str,
        /// Its length in floats.
        len: usize,
    },

    /// A ray window with `tmin > tmax` or a NaN bound.
    #[error("invalid ray window [{tmin}, {tmax}]")]
    InvalidWindow {
        /// Lower bound.
        tmin: f32,
        /// Upper bound.
        tmax: f32,
    },
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeomError>;
