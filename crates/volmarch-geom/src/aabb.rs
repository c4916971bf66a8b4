//! Axis-aligned bounding boxes.
//!
//! One box describes a voxel or a whole occupancy-grid level. The slab
//! intersection against a ray lives on [`Ray`](crate::Ray).

use volmarch_math::{Point3, Vec3};

/// Axis-aligned bounding box in 3D.
///
/// `min[k] <= max[k]` is assumed on every axis and is not checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Create an AABB from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from the flat `[minx, miny, minz, maxx, maxy, maxz]` layout.
    pub fn from_array(a: [f32; 6]) -> Self {
        Self {
            min: Point3::new(a[0], a[1], a[2]),
            max: Point3::new(a[3], a[4], a[5]),
        }
    }

    /// The flat `[minx, miny, minz, maxx, maxy, maxz]` layout.
    pub fn to_array(&self) -> [f32; 6] {
        [
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z,
        ]
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Point3 {
        self.min + self.size() * 0.5
    }

    /// Edge lengths `max - min`.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Scale the box about its center by `factor`.
    ///
    /// Occupancy grid level `l` is the base box enlarged by `2^l`.
    pub fn enlarged(&self, factor: f32) -> Self {
        let center = self.center();
        let half = self.size() * 0.5 * factor;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Test whether `p` lies in `[min, max)` on every axis.
    ///
    /// The max face is excluded so that containment agrees with voxel lookup,
    /// where a coordinate equal to `max` falls one cell past the grid.
    #[inline]
    pub fn contains(&self, p: &Point3) -> bool {
        p.x >= self.min.x
            && p.x < self.max.x
            && p.y >= self.min.y
            && p.y < self.max.y
            && p.z >= self.min.z
            && p.z < self.max.z
    }
}
