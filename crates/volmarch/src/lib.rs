#![warn(missing_docs)]

//! Indexed geometric building blocks for volumetric ray marching.
//!
//! Re-exports the volmarch crates. Samplers and renderers call these with
//! borrowed buffers; nothing here allocates per ray or decides how many
//! samples to take.
//!
//! # Example
//!
//! ```
//! use volmarch::{GridLayout, OccupancyGridView, RayWindow, RaysView};
//!
//! let layout = GridLayout::new([2, 2, 2], 1, [0.0, 0.0, 0.0, 1.0, 1.0, 1.0]).unwrap();
//! let data = [0.0; 8];
//! let occupied = [true; 8];
//! let grid = OccupancyGridView::new(layout, &data, &occupied).unwrap();
//!
//! let origins = [[-1.0, 0.5, 0.5]];
//! let dirs = [[1.0, 0.0, 0.0]];
//! let rays = RaysView::new(&origins, &dirs).unwrap();
//! let ray = rays.ray(0, RayWindow::default());
//!
//! let (t0, t1) = ray.intersect_aabb(&grid.level_aabb(0)).hit().unwrap();
//! assert_eq!((t0, t1), (1.0, 2.0));
//! assert!(grid.is_occupied(&ray.at(1.5), 0));
//! ```

pub use volmarch_geom;
pub use volmarch_grid;
pub use volmarch_math;
pub use volmarch_segments;

pub use volmarch_geom::{
    intersect_rays_aabbs, Aabb3, AabbHits, GeomError, Ray, RayInterval, RayWindow, RaysView,
};
pub use volmarch_grid::{GridError, GridLayout, OccupancyGridView};
pub use volmarch_math::{Point3, Vec3};
pub use volmarch_segments::{
    exclusive_sum, inclusive_sum, unpack_ray_ids, RayChunk, RaySegments, RaySegmentsView,
    SegmentLayout, SegmentsError,
};
