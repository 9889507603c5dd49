//! Vector helpers on top of `DVec3`.

use crate::Vec3;

/// Lengths at or below this are treated as zero by [`normalize`].
pub const NORMALIZE_EPSILON: f64 = 1e-12;

/// Normalize a vector, returning the zero vector for (near) zero lengths.
///
/// Unlike `DVec3::normalize` this never produces NaN or infinity, which keeps
/// degenerate scatter directions from poisoning the whole path.
#[inline]
pub fn normalize(v: Vec3) -> Vec3 {
    let length = v.length();
    if length > NORMALIZE_EPSILON {
        v / length
    } else {
        Vec3::ZERO
    }
}

/// Reflect a vector about a normal: `d - 2(d·n)n`.
#[inline]
pub fn reflect(d: Vec3, n: Vec3) -> Vec3 {
    d - 2.0 * d.dot(n) * n
}

/// Component of `v` perpendicular to the unit vector `axis`.
#[inline]
pub fn perp_to_axis(v: Vec3, axis: Vec3) -> Vec3 {
    v - axis * v.dot(axis)
}

/// True when every component is strictly smaller than `eps` in magnitude.
#[inline]
pub fn is_near_zero(v: Vec3, eps: f64) -> bool {
    v.x.abs() < eps && v.y.abs() < eps && v.z.abs() < eps
}
