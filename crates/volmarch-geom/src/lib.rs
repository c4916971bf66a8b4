#![warn(missing_docs)]

//! Rays, axis-aligned boxes and slab intersection for volmarch.
//!
//! Every operation here is a pure per-ray function over borrowed buffers,
//! callable from a rayon parallel-for or mirrored in a GPU kernel body.
//!
//! # Architecture
//!
//! - [`Aabb3`] - Axis-aligned box (voxel or grid level extent)
//! - [`Ray`] - Origin, direction, reciprocal direction and `[tmin, tmax]`
//! - [`RaysView`] - Flattened `[N, 3]` origins/directions buffer
//! - [`batch`] - All-pairs ray/box intersection on the CPU
//! - [`gpu`] - POD layouts for upload
//!
//! # Example
//!
//! ```
//! use volmarch_geom::{Aabb3, RayWindow, RaysView};
//!
//! let origins = [[0.0, 0.0, 0.0]];
//! let dirs = [[1.0, 0.0, 0.0]];
//! let rays = RaysView::new(&origins, &dirs).unwrap();
//!
//! let ray = rays.ray(0, RayWindow::new(0.0, 10.0));
//! let aabb = Aabb3::from_array([2.0, -1.0, -1.0, 5.0, 1.0, 1.0]);
//! assert_eq!(ray.intersect_aabb(&aabb).hit(), Some((2.0, 5.0)));
//! ```

mod aabb;
pub mod batch;
pub mod error;
pub mod gpu;
mod ray;
mod rays;

pub use aabb::Aabb3;
pub use batch::{intersect_rays_aabbs, AabbHits};
pub use error::{GeomError, Result};
pub use ray::{Ray, RayInterval, RayWindow};
pub use rays::RaysView;
