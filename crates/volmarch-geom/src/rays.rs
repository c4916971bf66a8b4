//! Read-only view over a flattened rays buffer.
//!
//! The buffer is two parallel `[N, 3]` float arrays (origins, directions)
//! owned by the caller. [`RaysView::ray`] rebuilds ray `i` on demand; no
//! per-ray state is stored.

use tracing::debug;
use volmarch_math::{point3, vec3, Point3, Vec3};

use crate::error::{GeomError, Result};
use crate::ray::{Ray, RayWindow};

/// Borrowed origins and directions of `N` rays.
#[derive(Debug, Clone, Copy)]
pub struct RaysView<'a> {
    origins: &'a [[f32; 3]],
    dirs: &'a [[f32; 3]],
}

impl<'a> RaysView<'a> {
    /// Bind a view to `[N, 3]` origins and directions.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::LengthMismatch`] if the two arrays hold a
    /// different number of rays.
    pub fn new(origins: &'a [[f32; 3]], dirs: &'a [[f32; 3]]) -> Result<Self> {
        if origins.len() != dirs.len() {
            return Err(GeomError::LengthMismatch {
                origins: origins.len(),
                dirs: dirs.len(),
            });
        }
        debug!(n_rays = origins.len(), "bound rays view");
        Ok(Self { origins, dirs })
    }

    /// Bind a view to row-major flat float buffers of length `3 * N`.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::NotTriples`] if either buffer length is not a
    /// multiple of 3, or [`GeomError::LengthMismatch`] on differing `N`.
    pub fn from_flat(origins: &'a [f32], dirs: &'a [f32]) -> Result<Self> {
        let origins = as_triples("origins", origins)?;
        let dirs = as_triples("dirs", dirs)?;
        Self::new(origins, dirs)
    }

    /// Number of rays.
    #[inline]
    pub fn len(&self) -> usize {
        self.origins.len()
    }

    /// True if the buffer holds no rays.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    /// Origin of ray `i`.
    #[inline]
    pub fn origin(&self, i: usize) -> Point3 {
        debug_assert!(i < self.len(), "ray index {i} out of range");
        point3(self.origins[i])
    }

    /// Direction of ray `i`, exactly as stored.
    #[inline]
    pub fn direction(&self, i: usize) -> Vec3 {
        debug_assert!(i < self.len(), "ray index {i} out of range");
        vec3(self.dirs[i])
    }

    /// Ray `i` with the caller's parameter window.
    ///
    /// `i` must be in `0..len()`; out-of-range indices panic.
    #[inline]
    pub fn ray(&self, i: usize, window: RayWindow) -> Ray {
        Ray::new(self.origin(i), self.direction(i), window)
    }

    /// The underlying origins.
    pub fn origins(&self) -> &'a [[f32; 3]] {
        self.origins
    }

    /// The underlying directions.
    pub fn dirs(&self) -> &'a [[f32; 3]] {
        self.dirs
    }
}

fn as_triples<'a>(name: &'static str, flat: &'a [f32]) -> Result<&'a [[f32; 3]]> {
    bytemuck::try_cast_slice(flat).map_err(|_| GeomError::NotTriples {
        name,
        len: flat.len(),
    })
}
