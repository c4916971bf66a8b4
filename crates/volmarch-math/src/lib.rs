#![warn(missing_docs)]

//! Math types for volmarch.
//!
//! Thin wrappers around nalgebra providing the single-precision point and
//! vector types used by every ray, box and grid in the workspace, plus the
//! few componentwise helpers the marching primitives need.

use nalgebra::Vector3;

/// A point in 3D world space.
pub type Point3 = nalgebra::Point3<f32>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f32>;

/// Build a point from a `[x, y, z]` triple.
#[inline]
pub fn point3(xyz: [f32; 3]) -> Point3 {
    Point3::new(xyz[0], xyz[1], xyz[2])
}

/// Build a vector from a `[x, y, z]` triple.
#[inline]
pub fn vec3(xyz: [f32; 3]) -> Vec3 {
    Vec3::new(xyz[0], xyz[1], xyz[2])
}

/// Componentwise reciprocal `1 / v[k]`.
///
/// Follows IEEE-754 division: a `+0.0` component yields `+inf` and a `-0.0`
/// component yields `-inf`. Axis-parallel rays rely on this, so there is no
/// branch on zero here.
#[inline]
pub fn recip(v: &Vec3) -> Vec3 {
    Vec3::new(1.0 / v.x, 1.0 / v.y, 1.0 / v.z)
}

/// Componentwise `floor(x)` converted to a signed cell index.
///
/// Non-finite inputs saturate (`NaN` maps to 0), which always lands outside
/// or on the boundary of a grid and is rejected by the caller's range check.
#[inline]
pub fn floor_i64(v: &Vec3) -> [i64; 3] {
    [
        v.x.floor() as i64,
        v.y.floor() as i64,
        v.z.floor() as i64,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_roundtrip() {
        let p = point3([1.0, -2.5, 3.25]);
        assert_eq!(p.x, 1.0);
        assert_eq!(p.y, -2.5);
        assert_eq!(p.z, 3.25);
    }

    #[test]
    fn test_recip_finite() {
        let r = recip(&vec3([2.0, -4.0, 0.5]));
        assert_eq!(r.x, 0.5);
        assert_eq!(r.y, -0.25);
        assert_eq!(r.z, 2.0);
    }

    #[test]
    fn test_recip_signed_zero() {
        let r = recip(&vec3([0.0, -0.0, 1.0]));
        assert_eq!(r.x, f32::INFINITY);
        assert_eq!(r.y, f32::NEG_INFINITY);
        assert_eq!(r.z, 1.0);
    }

    #[test]
    fn test_floor_negative() {
        let idx = floor_i64(&vec3([-0.5, 0.5, 3.999]));
        assert_eq!(idx, [-1, 0, 3]);
    }

    #[test]
    fn test_floor_non_finite() {
        let idx = floor_i64(&vec3([f32::NAN, f32::INFINITY, f32::NEG_INFINITY]));
        assert_eq!(idx[0], 0);
        assert_eq!(idx[1], i64::MAX);
        assert_eq!(idx[2], i64::MIN);
    }
}
