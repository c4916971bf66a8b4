//! Occupancy grid layout: resolution, level count and level-0 extent.

use serde::{Deserialize, Serialize};
use volmarch_geom::Aabb3;

use crate::error::{GridError, Result};

/// Shape and extent of a multiscale occupancy grid.
///
/// Every level shares `resolution`. Level `l` covers `base_aabb` enlarged
/// about its center by `2^l`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    /// Cells per axis `(nx, ny, nz)`.
    pub resolution: [u32; 3],
    /// Number of levels.
    pub levels: u32,
    /// Level-0 extent as `[minx, miny, minz, maxx, maxy, maxz]`.
    pub base_aabb: [f32; 6],
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            resolution: [128; 3],
            levels: 1,
            base_aabb: [0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
        }
    }
}

impl GridLayout {
    /// Create a layout, validating it.
    pub fn new(resolution: [u32; 3], levels: u32, base_aabb: [f32; 6]) -> Result<Self> {
        let layout = Self {
            resolution,
            levels,
            base_aabb,
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Validate layout.
    pub fn validate(&self) -> Result<()> {
        if self.resolution.iter().any(|&r| r == 0) {
            return Err(GridError::InvalidLayout(format!(
                "resolution must be positive on every axis, got {:?}",
                self.resolution
            )));
        }
        if self.levels == 0 {
            return Err(GridError::InvalidLayout(
                "levels must be at least 1".into(),
            ));
        }
        // 2^levels must stay representable as a finite f32 scale.
        if self.levels > 64 {
            return Err(GridError::InvalidLayout(format!(
                "too many levels: {}",
                self.levels
            )));
        }
        let a = &self.base_aabb;
        if a.iter().any(|v| !v.is_finite()) {
            return Err(GridError::InvalidLayout(format!(
                "base_aabb must be finite, got {a:?}"
            )));
        }
        if (0..3).any(|k| a[k] >= a[k + 3]) {
            return Err(GridError::InvalidLayout(format!(
                "base_aabb min must be below max on every axis, got {a:?}"
            )));
        }
        Ok(())
    }

    /// Resolution as `usize` per axis.
    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        [
            self.resolution[0] as usize,
            self.resolution[1] as usize,
            self.resolution[2] as usize,
        ]
    }

    /// Number of cells in one level (`nx * ny * nz`).
    #[inline]
    pub fn cells_per_level(&self) -> usize {
        let [nx, ny, nz] = self.dims();
        nx * ny * nz
    }

    /// Number of cells across all levels.
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.levels as usize * self.cells_per_level()
    }

    /// Level-0 extent.
    #[inline]
    pub fn base(&self) -> Aabb3 {
        Aabb3::from_array(self.base_aabb)
    }

    /// Extent scale of level `l` relative to level 0 (`2^l`).
    #[inline]
    pub fn level_scale(level: usize) -> f32 {
        2f32.powi(level as i32)
    }

    /// Extent of level `l`.
    #[inline]
    pub fn level_aabb(&self, level: usize) -> Aabb3 {
        debug_assert!(level < self.levels as usize, "level {level} out of range");
        self.base().enlarged(Self::level_scale(level))
    }

    /// Extents of all levels, finest first.
    pub fn level_aabbs(&self) -> Vec<Aabb3> {
        (0..self.levels as usize)
            .map(|l| self.level_aabb(l))
            .collect()
    }
}
