//! Batched ray-AABB intersection on the CPU.
//!
//! Every ray is tested against every box; rows are written in parallel,
//! one ray per rayon task, so no two tasks touch the same output slot.

use rayon::prelude::*;
use tracing::debug;

use crate::aabb::Aabb3;
use crate::ray::RayWindow;
use crate::rays::RaysView;

/// Row-major `[n_rays, n_aabbs]` intersection results.
#[derive(Debug, Clone, Default)]
pub struct AabbHits {
    /// Number of rays (rows).
    pub n_rays: usize,
    /// Number of boxes (columns).
    pub n_aabbs: usize,
    /// Entry parameter per (ray, box).
    pub t_mins: Vec<f32>,
    /// Exit parameter per (ray, box).
    pub t_maxs: Vec<f32>,
    /// Whether the clipped interval is non-empty.
    pub hits: Vec<bool>,
}

impl AabbHits {
    /// Flat index of `(ray, aabb)`.
    #[inline]
    pub fn index(&self, ray: usize, aabb: usize) -> usize {
        ray * self.n_aabbs + aabb
    }

    /// `Some((t_min, t_max))` if ray `ray` hits box `aabb`.
    pub fn get(&self, ray: usize, aabb: usize) -> Option<(f32, f32)> {
        let i = self.index(ray, aabb);
        self.hits[i].then(|| (self.t_mins[i], self.t_maxs[i]))
    }
}

/// Intersect every ray with every box.
///
/// Misses keep the empty interval the slab test produced and are flagged
/// `false` in [`AabbHits::hits`].
pub fn intersect_rays_aabbs(rays: &RaysView<'_>, aabbs: &[Aabb3], window: RayWindow) -> AabbHits {
    let n_rays = rays.len();
    let n_aabbs = aabbs.len();
    debug!(n_rays, n_aabbs, "batched ray-aabb intersection");

    let mut t_mins = vec![0.0f32; n_rays * n_aabbs];
    let mut t_maxs = vec![0.0f32; n_rays * n_aabbs];
    let mut hits = vec![false; n_rays * n_aabbs];

    if n_aabbs > 0 {
        t_mins
            .par_chunks_mut(n_aabbs)
            .zip(t_maxs.par_chunks_mut(n_aabbs))
            .zip(hits.par_chunks_mut(n_aabbs))
            .enumerate()
            .for_each(|(i, ((row_min, row_max), row_hit))| {
                let ray = rays.ray(i, window);
                for (j, aabb) in aabbs.iter().enumerate() {
                    let interval = ray.intersect_aabb(aabb);
                    row_min[j] = interval.t_enter;
                    row_max[j] = interval.t_exit;
                    row_hit[j] = !interval.is_empty();
                }
            });
    }

    AabbHits {
        n_rays,
        n_aabbs,
        t_mins,
        t_maxs,
        hits,
    }
}
