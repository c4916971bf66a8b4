#![warn(missing_docs)]

//! Per-ray interval storage for volmarch.
//!
//! A ray marcher produces, for every ray, a sorted list of edges along the
//! ray parameter `t`. This crate stores those lists either packed (variable
//! length chunks described by per-ray counts) or batched (a fixed number of
//! edges per ray), and exposes them through a read-only view.
//!
//! - [`RaySegmentsView`] - Borrowed collection, packed or batched
//! - [`RaySegments`] - Owned packed collection built in parallel
//! - [`pack`] - Prefix sums and per-ray chunk splitting
//!
//! # Example
//!
//! ```
//! use volmarch_segments::{exclusive_sum, RaySegmentsView};
//!
//! let edges = [0.0, 1.0, 2.0, 0.5, 0.7];
//! let cnts = [3, 2];
//! let starts = exclusive_sum(&cnts);
//!
//! let view = RaySegmentsView::packed(&edges, &cnts)
//!     .unwrap()
//!     .with_chunk_starts(&starts)
//!     .unwrap();
//! assert_eq!(view.chunk_range(1), 3..5);
//! assert_eq!(view.chunk(1).edges, &[0.5, 0.7]);
//! ```

pub mod error;
mod owned;
pub mod pack;
mod view;

pub use error::{Result, SegmentsError};
pub use owned::{ChunkMut, RaySegments};
pub use pack::{
    check_counts, exclusive_sum, inclusive_sum, split_chunks_mut, total_count, unpack_ray_ids,
};
pub use view::{Intervals, RayChunk, RaySegmentsView, SegmentLayout};
