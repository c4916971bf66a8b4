//! GPU uniform layout for occupancy grid lookups.

use bytemuck::{Pod, Zeroable};

use crate::error::GridError;
use crate::layout::GridLayout;

/// Grid parameters packed for a uniform buffer.
///
/// The occupancy flags themselves are uploaded separately as one `u32`
/// per cell (see [`pack_occupancy`]), since WGSL has no `bool` storage.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuGridParams {
    /// Level-0 minimum corner.
    pub base_min: [f32; 3],
    /// Number of levels.
    pub levels: u32,
    /// Level-0 maximum corner.
    pub base_max: [f32; 3],
    /// Cells per level.
    pub cells_per_level: u32,
    /// Cells per axis.
    pub resolution: [u32; 3],
    /// Padding for alignment
    pub _pad: u32,
}

impl TryFrom<&GridLayout> for GpuGridParams {
    type Error = GridError;

    /// Fails when a level has more cells than a `u32` index can address.
    fn try_from(layout: &GridLayout) -> Result<Self, Self::Error> {
        let cells = layout.cells_per_level();
        let cells_per_level = u32::try_from(cells).map_err(|_| {
            GridError::InvalidLayout(format!("{cells} cells per level exceed u32 indexing"))
        })?;
        let a = layout.base_aabb;
        Ok(Self {
            base_min: [a[0], a[1], a[2]],
            levels: layout.levels,
            base_max: [a[3], a[4], a[5]],
            cells_per_level,
            resolution: layout.resolution,
            _pad: 0,
        })
    }
}

/// Widen occupancy flags to one `u32` per cell for storage-buffer upload.
pub fn pack_occupancy(occupied: &[bool]) -> Vec<u32> {
    occupied.iter().map(|&o| u32::from(o)).collect()
}
