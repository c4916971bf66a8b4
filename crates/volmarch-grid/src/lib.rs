#![warn(missing_docs)]

//! Multiscale occupancy grid views for volmarch.
//!
//! An occupancy grid marks which regions of space may hold visible content
//! so that a marching pass can skip the rest. It has `levels` voxel grids
//! of one shared resolution; level `l` covers the level-0 box enlarged by
//! `2^l` about its center.
//!
//! - [`GridLayout`] - Resolution, level count and level-0 extent
//! - [`OccupancyGridView`] - O(1) point lookups over borrowed buffers
//! - [`gpu`] - Uniform layout for compute drivers
//!
//! # Example
//!
//! ```
//! use volmarch_grid::{GridLayout, OccupancyGridView};
//! use volmarch_math::Point3;
//!
//! let layout = GridLayout::new([4, 4, 4], 2, [0.0, 0.0, 0.0, 1.0, 1.0, 1.0]).unwrap();
//! let data = vec![0.0; layout.n_cells()];
//! let mut occupied = vec![false; layout.n_cells()];
//! occupied[0] = true;
//!
//! let grid = OccupancyGridView::new(layout, &data, &occupied).unwrap();
//! assert!(grid.is_occupied(&Point3::new(0.1, 0.1, 0.1), 0));
//! assert!(!grid.is_occupied(&Point3::new(5.0, 0.1, 0.1), 0));
//! ```

pub mod error;
pub mod gpu;
mod layout;
mod view;

pub use error::{GridError, Result};
pub use layout::GridLayout;
pub use view::OccupancyGridView;
