//! GPU-compatible layouts for rays and boxes.
//!
//! Same data as [`Ray`] and [`Aabb3`], packed into 16-byte aligned POD
//! structs so a compute driver can upload them with `bytemuck::cast_slice`
//! and run the slab test as a per-ray kernel body.

use bytemuck::{Pod, Zeroable};

use crate::aabb::Aabb3;
use crate::ray::{Ray, RayWindow};
use crate::rays::RaysView;

/// GPU-compatible ray: `vec4(origin, tmin)`, `vec4(direction, tmax)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuRay {
    /// Origin xyz.
    pub origin: [f32; 3],
    /// Near bound.
    pub tmin: f32,
    /// Direction xyz (not normalized).
    pub direction: [f32; 3],
    /// Far bound.
    pub tmax: f32,
}

impl From<&Ray> for GpuRay {
    fn from(ray: &Ray) -> Self {
        Self {
            origin: [ray.origin.x, ray.origin.y, ray.origin.z],
            tmin: ray.tmin,
            direction: [ray.direction.x, ray.direction.y, ray.direction.z],
            tmax: ray.tmax,
        }
    }
}

/// GPU-compatible AABB: `vec4(min, 0)`, `vec4(max, 0)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuAabb {
    /// Minimum corner.
    pub min: [f32; 3],
    /// Padding for alignment
    pub _pad0: f32,
    /// Maximum corner.
    pub max: [f32; 3],
    /// Padding for alignment
    pub _pad1: f32,
}

impl From<&Aabb3> for GpuAabb {
    fn from(aabb: &Aabb3) -> Self {
        Self {
            min: [aabb.min.x, aabb.min.y, aabb.min.z],
            _pad0: 0.0,
            max: [aabb.max.x, aabb.max.y, aabb.max.z],
            _pad1: 0.0,
        }
    }
}

/// Pack every ray of a view with a shared window.
pub fn pack_rays(rays: &RaysView<'_>, window: RayWindow) -> Vec<GpuRay> {
    (0..rays.len())
        .map(|i| GpuRay::from(&rays.ray(i, window)))
        .collect()
}
