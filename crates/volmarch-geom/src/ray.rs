//! Ray representation and the ray-AABB slab test.

use serde::{Deserialize, Serialize};
use volmarch_math::{recip, Point3, Vec3};

use crate::aabb::Aabb3;
use crate::error::{GeomError, Result};

/// Parameter window `[tmin, tmax]` along a ray.
///
/// Supplied by the caller per launch (near/far planes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayWindow {
    /// Near bound.
    pub tmin: f32,
    /// Far bound.
    pub tmax: f32,
}

impl Default for RayWindow {
    fn default() -> Self {
        Self {
            tmin: 0.0,
            tmax: f32::MAX,
        }
    }
}

impl RayWindow {
    /// Create a window from near and far bounds.
    pub fn new(tmin: f32, tmax: f32) -> Self {
        Self { tmin, tmax }
    }

    /// Validate the window.
    pub fn validate(&self) -> Result<()> {
        if self.tmin.is_nan() || self.tmax.is_nan() || self.tmin > self.tmax {
            return Err(GeomError::InvalidWindow {
                tmin: self.tmin,
                tmax: self.tmax,
            });
        }
        Ok(())
    }
}

/// A ray in 3D space with its parameter window.
///
/// The direction is used as given, not normalized, so `t` is measured in
/// units of the direction's length.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Direction of the ray.
    pub direction: Vec3,
    /// Near bound of the parameter window.
    pub tmin: f32,
    /// Far bound of the parameter window.
    pub tmax: f32,
    /// Precomputed reciprocal of direction components for fast AABB tests.
    inv_direction: Vec3,
}

impl Ray {
    /// Create a ray from origin, direction and parameter window.
    pub fn new(origin: Point3, direction: Vec3, window: RayWindow) -> Self {
        Self {
            origin,
            direction,
            tmin: window.tmin,
            tmax: window.tmax,
            inv_direction: recip(&direction),
        }
    }

    /// Componentwise reciprocal of the direction (`±inf` on zero components).
    #[inline]
    pub fn inv_direction(&self) -> Vec3 {
        self.inv_direction
    }

    /// The ray's parameter window.
    #[inline]
    pub fn window(&self) -> RayWindow {
        RayWindow::new(self.tmin, self.tmax)
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f32) -> Point3 {
        self.origin + self.direction * t
    }

    /// Clip the ray window against an AABB using the slab method.
    ///
    /// Returns the (possibly empty) interval `[t_enter, t_exit]`. A zero
    /// direction component gives an infinite reciprocal, so that axis
    /// contributes `[-inf, +inf]` when the origin lies inside the slab and
    /// an empty slab otherwise. With the origin exactly on a face of that
    /// slab, `0 * inf` is NaN; the slab is closed, so the axis is skipped.
    #[inline]
    pub fn intersect_aabb(&self, aabb: &Aabb3) -> RayInterval {
        let mut t_enter = self.tmin;
        let mut t_exit = self.tmax;

        for k in 0..3 {
            let t1 = (aabb.min[k] - self.origin[k]) * self.inv_direction[k];
            let t2 = (aabb.max[k] - self.origin[k]) * self.inv_direction[k];
            if t1.is_nan() || t2.is_nan() {
                continue;
            }
            t_enter = t_enter.max(t1.min(t2));
            t_exit = t_exit.min(t1.max(t2));
        }

        RayInterval { t_enter, t_exit }
    }
}

/// Entry/exit parameters of a ray against a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayInterval {
    /// Parameter where the ray enters the box (clipped to `tmin`).
    pub t_enter: f32,
    /// Parameter where the ray leaves the box (clipped to `tmax`).
    pub t_exit: f32,
}

impl RayInterval {
    /// True when the ray misses the box inside its window.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.t_enter > self.t_exit
    }

    /// `Some((t_enter, t_exit))` on a hit, `None` when empty.
    #[inline]
    pub fn hit(&self) -> Option<(f32, f32)> {
        if self.is_empty() {
            None
        } else {
            Some((self.t_enter, self.t_exit))
        }
    }

    /// Length of the interval, zero when empty.
    #[inline]
    pub fn length(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.t_exit - self.t_enter
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ray(o: [f32; 3], d: [f32; 3], tmin: f32, tmax: f32) -> Ray {
        Ray::new(
            Point3::new(o[0], o[1], o[2]),
            Vec3::new(d[0], d[1], d[2]),
            RayWindow::new(tmin, tmax),
        )
    }

    #[test]
    fn test_ray_at() {
        let r = ray([1.0, 0.0, 0.0], [0.0, 2.0, 0.0], 0.0, 10.0);
        let p = r.at(1.5);
        assert_relative_eq!(p.x, 1.0);
        assert_relative_eq!(p.y, 3.0);
        assert_relative_eq!(p.z, 0.0);
    }

    #[test]
    fn test_ray_aabb_hit() {
        let r = ray([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 0.0, 10.0);
        let aabb = Aabb3::from_array([2.0, -1.0, -1.0, 5.0, 1.0, 1.0]);
        let hit = r.intersect_aabb(&aabb);
        assert!(!hit.is_empty());
        assert_relative_eq!(hit.t_enter, 2.0);
        assert_relative_eq!(hit.t_exit, 5.0);
        assert_eq!(hit.hit(), Some((2.0, 5.0)));
    }

    #[test]
    fn test_ray_aabb_miss() {
        let r = ray([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 0.0, 10.0);
        let aabb = Aabb3::from_array([2.0, 5.0, 5.0, 3.0, 6.0, 6.0]);
        let hit = r.intersect_aabb(&aabb);
        assert!(hit.is_empty());
        assert_eq!(hit.hit(), None);
        assert_eq!(hit.length(), 0.0);
    }

    #[test]
    fn test_zero_component_does_not_restrict() {
        // x-range contains origin.x, so the x slab is [-inf, +inf].
        let r = ray([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], 0.0, 100.0);
        assert_eq!(r.inv_direction().x, f32::INFINITY);
        let aabb = Aabb3::from_array([-1.0, 3.0, -1.0, 1.0, 7.0, 1.0]);
        let hit = r.intersect_aabb(&aabb);
        assert_eq!(hit.hit(), Some((3.0, 7.0)));
    }

    #[test]
    fn test_zero_component_outside_slab() {
        let r = ray([5.0, 0.0, 0.0], [0.0, 1.0, 0.0], 0.0, 100.0);
        let aabb = Aabb3::from_array([-1.0, 3.0, -1.0, 1.0, 7.0, 1.0]);
        assert!(r.intersect_aabb(&aabb).is_empty());
    }

    #[test]
    fn test_negative_zero_component() {
        let r = ray([0.0, 0.0, 0.0], [-0.0, -1.0, 0.0], 0.0, 100.0);
        assert_eq!(r.inv_direction().x, f32::NEG_INFINITY);
        let aabb = Aabb3::from_array([-1.0, -4.0, -1.0, 1.0, -2.0, 1.0]);
        assert_eq!(r.intersect_aabb(&aabb).hit(), Some((2.0, 4.0)));
    }

    #[test]
    fn test_origin_on_min_face_zero_component() {
        let aabb = Aabb3::from_array([0.0, 3.0, 0.0, 1.0, 7.0, 1.0]);
        for dx in [0.0, -0.0] {
            let r = ray([0.0, 0.0, 0.5], [dx, 1.0, 0.0], 0.0, 100.0);
            assert_eq!(r.intersect_aabb(&aabb).hit(), Some((3.0, 7.0)));
        }
    }

    #[test]
    fn test_origin_on_max_face_zero_component() {
        let aabb = Aabb3::from_array([0.0, 3.0, 0.0, 1.0, 7.0, 1.0]);
        for dx in [0.0, -0.0] {
            let r = ray([1.0, 0.0, 0.5], [dx, 1.0, 0.0], 0.0, 100.0);
            assert_eq!(r.intersect_aabb(&aabb).hit(), Some((3.0, 7.0)));
        }
    }

    #[test]
    fn test_flat_box_containing_origin_plane() {
        // Zero-thickness slab in z, origin on its plane.
        let aabb = Aabb3::from_array([-1.0, 3.0, 0.5, 1.0, 7.0, 0.5]);
        let r = ray([0.0, 0.0, 0.5], [0.0, 1.0, 0.0], 0.0, 100.0);
        assert_eq!(r.intersect_aabb(&aabb).hit(), Some((3.0, 7.0)));
    }

    #[test]
    fn test_window_clips_interval() {
        let r = ray([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 3.0, 4.0);
        let aabb = Aabb3::from_array([2.0, -1.0, -1.0, 5.0, 1.0, 1.0]);
        assert_eq!(r.intersect_aabb(&aabb).hit(), Some((3.0, 4.0)));
    }

    #[test]
    fn test_window_excludes_box() {
        let r = ray([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 6.0, 10.0);
        let aabb = Aabb3::from_array([2.0, -1.0, -1.0, 5.0, 1.0, 1.0]);
        assert!(r.intersect_aabb(&aabb).is_empty());
    }

    #[test]
    fn test_origin_inside_box() {
        let r = ray([0.5, 0.5, 0.5], [1.0, 0.0, 0.0], 0.0, 10.0);
        let aabb = Aabb3::from_array([0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        let hit = r.intersect_aabb(&aabb);
        assert_relative_eq!(hit.t_enter, 0.0);
        assert_relative_eq!(hit.t_exit, 0.5);
    }

    #[test]
    fn test_ray_behind_box() {
        let r = ray([-5.0, 0.5, 0.5], [-1.0, 0.0, 0.0], 0.0, 100.0);
        let aabb = Aabb3::from_array([0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        assert!(r.intersect_aabb(&aabb).is_empty());
    }

    #[test]
    fn test_diagonal_unnormalized() {
        let r = ray([-1.0, -1.0, -1.0], [2.0, 2.0, 2.0], 0.0, 100.0);
        let aabb = Aabb3::from_array([0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        let hit = r.intersect_aabb(&aabb);
        assert_relative_eq!(hit.t_enter, 0.5);
        assert_relative_eq!(hit.t_exit, 1.0);
    }

    #[test]
    fn test_window_validate() {
        assert!(RayWindow::default().validate().is_ok());
        assert!(RayWindow::new(2.0, 1.0).validate().is_err());
        assert!(RayWindow::new(f32::NAN, 1.0).validate().is_err());
    }

    #[test]
    fn test_window_serde() {
        let w = RayWindow::new(0.05, 8.0);
        let json = serde_json::to_string(&w).unwrap();
        let back: RayWindow = serde_json::from_str(&json).unwrap();
        assert_eq!(w, back);
    }
}
