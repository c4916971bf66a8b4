//! Error types for ray segment collections.

use thiserror::Error;

/// Errors that can occur while binding or validating ray segments.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SegmentsError {
    /// A per-edge or per-ray buffer has the wrong length.
    #[error("{name} has {actual} elements, expected {expected}")]
    ShapeMismatch {
        /// Name of the offending buffer.
        name: &'static str,
        /// Length implied by the collection.
        expected: usize,
        /// Length found.
        actual: usize,
    },

    /// Chunk counts do not add up to the number of edges.
    #[error("chunk counts sum to {sum}, but there are {n_edges} edges")]
    CountMismatch {
        /// Sum of `chunk_cnts`.
        sum: i64,
        /// Length of `edges`.
        n_edges: usize,
    },

    /// A ray has a negative edge count.
    #[error("ray {ray} has negative edge count {count}")]
    NegativeCount {
        /// Ray id.
        ray: usize,
        /// The count found.
        count: i64,
    },

    /// Chunk counts add up to more than an index can address.
    #[error("chunk counts overflow at ray {ray}")]
    CountOverflow {
        /// First ray whose count no longer fits.
        ray: usize,
    },

    /// A chunk extends outside the edges buffer.
    #[error("chunk of ray {ray} [{start}, {start} + {count}) exceeds {n_edges} edges")]
    ChunkOutOfBounds {
        /// Ray id.
        ray: usize,
        /// Chunk start.
        start: i64,
        /// Chunk length.
        count: i64,
        /// Length of `edges`.
        n_edges: usize,
    },

    /// A required field was not supplied.
    #[error("missing required field {0}")]
    MissingField(&'static str),

    /// The edges shape is neither `[n_edges]` nor `[n_rays, n_edges_per_ray]`.
    #[error("edges must have rank 1 or 2, got shape {0:?}")]
    InvalidRank(Vec<usize>),

    /// An operation does not apply to the collection's layout.
    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    /// Edges of a ray decrease.
    #[error("edges of ray {ray} decrease at flattened index {index}")]
    UnsortedChunk {
        /// Ray id.
        ray: usize,
        /// Flattened index of the first decreasing edge.
        index: usize,
    },

    /// A `ray_ids` entry is not a valid ray id.
    #[error("ray_ids[{index}] = {id} is outside [0, {n_rays})")]
    RayIdOutOfRange {
        /// Flattened edge index.
        index: usize,
        /// Value stored in `ray_ids`.
        id: i64,
        /// Number of rays.
        n_rays: usize,
    },

    /// A `ray_ids` entry names a different ray than the chunk holding it.
    #[error("ray_ids[{index}] = {actual}, but the edge belongs to ray {expected}")]
    RayIdMismatch {
        /// Flattened edge index.
        index: usize,
        /// Owning ray by chunk layout.
        expected: usize,
        /// Value stored in `ray_ids`.
        actual: i64,
    },
}

/// Result type for segment operations.
pub type Result<T> = std::result::Result<T, SegmentsError>;
