//! Double-precision math for Lumen.
//!
//! `Vec3` is glam's `DVec3`; the free functions in [`vec`] add the
//! renderer-specific operations glam does not provide with the exact
//! semantics the tracer relies on (thresholded normalize, reflection,
//! projection onto a plane).

// Re-export glam for convenience
pub use glam::DVec3;

/// Three doubles used for points, directions, normals and linear colors.
pub type Vec3 = DVec3;

mod interval;
mod ray;
pub mod vec;

pub use interval::Interval;
pub use ray::Ray;
pub use vec::{is_near_zero, normalize, perp_to_axis, reflect, NORMALIZE_EPSILON};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
    }
}
