//! End-to-end: intersect rays with grid levels, march through occupancy,
//! and pack the occupied intervals.

use approx::assert_relative_eq;
use volmarch::{
    intersect_rays_aabbs, unpack_ray_ids, GridLayout, OccupancyGridView, Ray, RaySegments,
    RaySegmentsView, RayWindow, RaysView,
};

const RES: u32 = 4;

/// Two-level 4^3 grid over the unit cube with two occupied level-0 cells
/// on the row `iy = 2, iz = 2`.
fn grid_buffers() -> (GridLayout, Vec<f32>, Vec<bool>) {
    let layout = GridLayout::new([RES; 3], 2, [0.0, 0.0, 0.0, 1.0, 1.0, 1.0]).unwrap();
    let mut occupied = vec![false; layout.n_cells()];
    let n = RES as usize;
    for ix in [1, 2] {
        occupied[(ix * n + 2) * n + 2] = true;
    }
    // Level 1 cell holding the level-1 region just outside level 0.
    occupied[((n + 3) * n + 2) * n + 2] = true;
    let data = occupied.iter().map(|&o| if o { 1.0 } else { 0.0 }).collect();
    (layout, data, occupied)
}

/// Fixed-step march through level 0, merging adjacent occupied steps.
fn march(grid: &OccupancyGridView<'_>, ray: &Ray, step: f32) -> Vec<(f32, f32)> {
    let Some((t0, t1)) = ray.intersect_aabb(&grid.level_aabb(0)).hit() else {
        return Vec::new();
    };
    let mut out: Vec<(f32, f32)> = Vec::new();
    let mut t = t0;
    while t < t1 {
        let t_next = (t + step).min(t1);
        if grid.is_occupied(&ray.at(0.5 * (t + t_next)), 0) {
            match out.last_mut() {
                Some(last) if last.1 == t => last.1 = t_next,
                _ => out.push((t, t_next)),
            }
        }
        t = t_next;
    }
    out
}

fn rays() -> (Vec<[f32; 3]>, Vec<[f32; 3]>) {
    let origins = vec![[-1.0, 0.6, 0.6], [-1.0, 5.0, 5.0], [-1.0, 0.1, 0.1]];
    let dirs = vec![[1.0, 0.0, 0.0]; 3];
    (origins, dirs)
}

#[test]
fn test_march_and_pack() {
    let (layout, data, occupied) = grid_buffers();
    let grid = OccupancyGridView::new(layout, &data, &occupied).unwrap();
    let (origins, dirs) = rays();
    let rays = RaysView::new(&origins, &dirs).unwrap();

    let intervals: Vec<_> = (0..rays.len())
        .map(|i| march(&grid, &rays.ray(i, RayWindow::default()), 0.125))
        .collect();
    assert_eq!(intervals[0], vec![(1.25, 1.75)]);
    assert!(intervals[1].is_empty());
    assert!(intervals[2].is_empty());

    let segments = RaySegments::from_intervals(&intervals).unwrap();
    let view = segments.view();
    assert_eq!(view.n_rays(), 3);
    assert_eq!(segments.chunk_cnts(), &[2, 0, 0]);
    assert_eq!(view.t_starts().unwrap().collect::<Vec<_>>(), vec![1.25]);
    assert_eq!(view.t_ends().unwrap().collect::<Vec<_>>(), vec![1.75]);
    assert!(view.validate().is_ok());

    let ids = unpack_ray_ids(segments.chunk_cnts(), view.n_edges()).unwrap();
    for (e, &id) in ids.iter().enumerate() {
        assert_eq!(view.ray_id(e), Some(id as usize));
    }
}

#[test]
fn test_batched_hits_match_single_ray() {
    let (layout, _, _) = grid_buffers();
    let (origins, dirs) = rays();
    let rays = RaysView::new(&origins, &dirs).unwrap();
    let window = RayWindow::default();

    let hits = intersect_rays_aabbs(&rays, &layout.level_aabbs(), window);
    assert_eq!(hits.get(0, 0), Some((1.0, 2.0)));
    assert_eq!(hits.get(0, 1), Some((0.5, 2.5)));
    assert_eq!(hits.get(1, 0), None);
    assert_eq!(hits.get(1, 1), None);

    for i in 0..rays.len() {
        for (l, aabb) in layout.level_aabbs().iter().enumerate() {
            let single = rays.ray(i, window).intersect_aabb(aabb).hit();
            assert_eq!(hits.get(i, l), single);
        }
    }
}

#[test]
fn test_level_hits_as_batched_segments() {
    let (layout, _, _) = grid_buffers();
    let (origins, dirs) = rays();
    let rays = RaysView::new(&origins, &dirs).unwrap();
    let hits = intersect_rays_aabbs(&rays, &layout.level_aabbs()[..1], RayWindow::default());

    let edges: Vec<f32> = (0..rays.len())
        .filter_map(|i| hits.get(i, 0))
        .flat_map(|(t0, t1)| [t0, t1])
        .collect();
    let view = RaySegmentsView::from_shape(&edges, &[edges.len() / 2, 2], None).unwrap();
    assert!(view.is_batched());
    assert_eq!(view.n_rays(), 2);
    assert_eq!(view.n_edges(), view.n_rays() * 2);
    assert_eq!(view.chunk(1).intervals().collect::<Vec<_>>(), vec![(1.0, 2.0)]);
    assert!(view.validate_ordering().is_ok());
}

#[test]
fn test_multiscale_lookup_outside_finest_level() {
    let (layout, data, occupied) = grid_buffers();
    let grid = OccupancyGridView::new(layout, &data, &occupied).unwrap();
    let (origins, dirs) = rays();
    let rays = RaysView::new(&origins, &dirs).unwrap();
    let ray = rays.ray(0, RayWindow::default());

    // x = 1.3 lies in level 1 only, in its occupied cell ix = 3.
    let p = ray.at(2.3);
    assert_eq!(grid.level_of(&p), Some(1));
    assert!(grid.is_occupied_any(&p));
    assert!(!grid.is_occupied(&p, 0));

    let far = ray.at(10.0);
    assert_eq!(grid.level_of(&far), None);
    assert!(!grid.is_occupied_any(&far));
}

#[test]
fn test_flat_buffers_diagonal_ray() {
    let (layout, _, _) = grid_buffers();
    let origins = [-1.0f32, -1.0, -1.0];
    let dirs = [1.0f32, 1.0, 1.0];
    let rays = RaysView::from_flat(&origins, &dirs).unwrap();
    let ray = rays.ray(0, RayWindow::new(0.0, 100.0));
    let (t0, t1) = ray.intersect_aabb(&layout.level_aabb(0)).hit().unwrap();
    assert_relative_eq!(t0, 1.0);
    assert_relative_eq!(t1, 2.0);
    let mid = ray.at(0.5 * (t0 + t1));
    assert_relative_eq!(mid.x, 0.5);
    assert_relative_eq!(mid.z, 0.5);
}
