//! Read-only view over a multiscale occupancy grid.
//!
//! Buffers are row-major `[levels, nx, ny, nz]`. Lookups are O(1) and never
//! allocate; anything outside a level's extent is empty space.

use tracing::debug;
use volmarch_geom::Aabb3;
use volmarch_math::{floor_i64, Point3, Vec3};

use crate::error::{GridError, Result};
use crate::layout::GridLayout;

/// Borrowed occupancy flags and backing data of a multiscale grid.
#[derive(Debug, Clone, Copy)]
pub struct OccupancyGridView<'a> {
    layout: GridLayout,
    dims: [usize; 3],
    data: &'a [f32],
    occupied: &'a [bool],
}

impl<'a> OccupancyGridView<'a> {
    /// Bind a view to `data` and `occupied` laid out per `layout`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidLayout`] for a bad layout and
    /// [`GridError::ShapeMismatch`] if either buffer is not
    /// `levels * nx * ny * nz` long.
    pub fn new(layout: GridLayout, data: &'a [f32], occupied: &'a [bool]) -> Result<Self> {
        layout.validate()?;
        let expected = layout.n_cells();
        if data.len() != expected {
            return Err(GridError::ShapeMismatch {
                name: "data",
                expected,
                actual: data.len(),
            });
        }
        if occupied.len() != expected {
            return Err(GridError::ShapeMismatch {
                name: "occupied",
                expected,
                actual: occupied.len(),
            });
        }
        debug!(
            levels = layout.levels,
            resolution = ?layout.resolution,
            "bound occupancy grid view"
        );
        Ok(Self {
            dims: layout.dims(),
            layout,
            data,
            occupied,
        })
    }

    /// Bind a view from a declared `[levels, nx, ny, nz]` shape and a flat
    /// 6-element `base_aabb`, as handed over by a tensor allocator.
    pub fn from_shape(
        shape: &[usize],
        data: &'a [f32],
        occupied: &'a [bool],
        base_aabb: &[f32],
    ) -> Result<Self> {
        let &[levels, nx, ny, nz] = shape else {
            return Err(GridError::InvalidRank {
                name: "occupied",
                expected: 4,
                shape: shape.to_vec(),
            });
        };
        let base_aabb: [f32; 6] = base_aabb.try_into().map_err(|_| GridError::ShapeMismatch {
            name: "base_aabb",
            expected: 6,
            actual: base_aabb.len(),
        })?;
        let to_u32 = |v: usize| {
            u32::try_from(v)
                .map_err(|_| GridError::InvalidLayout(format!("dimension {v} exceeds u32")))
        };
        let layout = GridLayout {
            resolution: [to_u32(nx)?, to_u32(ny)?, to_u32(nz)?],
            levels: to_u32(levels)?,
            base_aabb,
        };
        Self::new(layout, data, occupied)
    }

    /// The grid layout.
    #[inline]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Number of levels.
    #[inline]
    pub fn levels(&self) -> usize {
        self.layout.levels as usize
    }

    /// Cells per axis.
    #[inline]
    pub fn resolution(&self) -> [usize; 3] {
        self.dims
    }

    /// Extent of level `l`.
    #[inline]
    pub fn level_aabb(&self, level: usize) -> Aabb3 {
        self.layout.level_aabb(level)
    }

    /// Integer cell of `point` within level `l`, or `None` outside it.
    ///
    /// `idx[k] = floor((p[k] - min[k]) / (max[k] - min[k]) * res[k])`,
    /// rejected unless `0 <= idx[k] < res[k]`.
    #[inline]
    pub fn voxel_index(&self, point: &Point3, level: usize) -> Option<[usize; 3]> {
        let aabb = self.level_aabb(level);
        let res = Vec3::new(self.dims[0] as f32, self.dims[1] as f32, self.dims[2] as f32);
        let scaled = (*point - aabb.min).component_div(&aabb.size()).component_mul(&res);
        let idx = floor_i64(&scaled);

        let mut out = [0usize; 3];
        for k in 0..3 {
            if idx[k] < 0 || idx[k] >= self.dims[k] as i64 {
                return None;
            }
            out[k] = idx[k] as usize;
        }
        Some(out)
    }

    /// Flat index of cell `idx` at level `l` in the `[levels, nx, ny, nz]` buffers.
    #[inline]
    pub fn flat_index(&self, level: usize, idx: [usize; 3]) -> usize {
        let [nx, ny, nz] = self.dims;
        debug_assert!(level < self.levels(), "level {level} out of range");
        debug_assert!(idx[0] < nx && idx[1] < ny && idx[2] < nz, "cell {idx:?} out of range");
        ((level * nx + idx[0]) * ny + idx[1]) * nz + idx[2]
    }

    /// Occupancy flag of cell `idx` at level `l`.
    #[inline]
    pub fn occupied_at(&self, level: usize, idx: [usize; 3]) -> bool {
        self.occupied[self.flat_index(level, idx)]
    }

    /// Backing value of cell `idx` at level `l`.
    #[inline]
    pub fn data_at(&self, level: usize, idx: [usize; 3]) -> f32 {
        self.data[self.flat_index(level, idx)]
    }

    /// Whether `point` falls in an occupied cell of level `l`.
    ///
    /// Points outside the level are never occupied.
    #[inline]
    pub fn is_occupied(&self, point: &Point3, level: usize) -> bool {
        self.voxel_index(point, level)
            .is_some_and(|idx| self.occupied_at(level, idx))
    }

    /// Finest level whose extent contains `point`.
    #[inline]
    pub fn level_of(&self, point: &Point3) -> Option<usize> {
        (0..self.levels()).find(|&l| self.level_aabb(l).contains(point))
    }

    /// Occupancy at the finest level containing `point`; empty outside all levels.
    #[inline]
    pub fn is_occupied_any(&self, point: &Point3) -> bool {
        self.level_of(point)
            .is_some_and(|l| self.is_occupied(point, l))
    }

    /// World-space box of cell `idx` at level `l`.
    pub fn voxel_aabb(&self, level: usize, idx: [usize; 3]) -> Aabb3 {
        let aabb = self.level_aabb(level);
        let cell = self.cell_size(&aabb);
        let lo = Vec3::new(idx[0] as f32, idx[1] as f32, idx[2] as f32);
        let min = aabb.min + lo.component_mul(&cell);
        Aabb3::new(min, min + cell)
    }

    /// World-space center of cell `idx` at level `l`.
    pub fn voxel_center(&self, level: usize, idx: [usize; 3]) -> Point3 {
        let aabb = self.level_aabb(level);
        let cell = self.cell_size(&aabb);
        let c = Vec3::new(
            idx[0] as f32 + 0.5,
            idx[1] as f32 + 0.5,
            idx[2] as f32 + 0.5,
        );
        aabb.min + c.component_mul(&cell)
    }

    /// Fraction of occupied cells in level `l`.
    pub fn occupancy_ratio(&self, level: usize) -> f32 {
        let n = self.layout.cells_per_level();
        let start = level * n;
        let count = self.occupied[start..start + n].iter().filter(|&&o| o).count();
        count as f32 / n as f32
    }

    /// The underlying occupancy flags.
    pub fn occupied(&self) -> &'a [bool] {
        self.occupied
    }

    /// The underlying data values.
    pub fn data(&self) -> &'a [f32] {
        self.data
    }

    fn cell_size(&self, aabb: &Aabb3) -> Vec3 {
        let res = Vec3::new(self.dims[0] as f32, self.dims[1] as f32, self.dims[2] as f32);
        aabb.size().component_div(&res)
    }
}
