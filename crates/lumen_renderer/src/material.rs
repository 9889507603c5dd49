//! Surface scattering for each material kind.

use lumen_core::{Color, MaterialKind};
use lumen_math::{is_near_zero, normalize, reflect, Ray, Vec3};
use rand::RngCore;

use crate::hittable::HitRecord;
use crate::random::random_vec3_range;

/// Components below this magnitude make a scatter direction degenerate.
pub const NEAR_ZERO: f64 = 1e-8;

/// Result of scattering a ray off a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterResult {
    /// Direction of the continuation ray
    pub direction: Vec3,
    /// Per-channel multiplier applied to the continuation's color
    pub attenuation: Color,
}

impl ScatterResult {
    /// Magenta marker for hits whose material cannot be resolved.
    pub const UNRESOLVED: ScatterResult = ScatterResult {
        direction: Vec3::new(1.0, 0.0, 1.0),
        attenuation: Color::new(1.0, 0.0, 1.0),
    };
}

/// Trait for materials that describe how light leaves a surface.
pub trait Scatter {
    /// Scatter an incoming ray at `rec`.
    ///
    /// Random draws, if any, come from `rng` in x, y, z order.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> ScatterResult;
}

impl Scatter for MaterialKind {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> ScatterResult {
        let unit_direction = normalize(ray_in.direction());
        match *self {
            MaterialKind::Matte { albedo } => ScatterResult {
                direction: diffuse_direction(rec.normal, rng),
                attenuation: albedo,
            },
            MaterialKind::Metal { albedo, diffusion } => ScatterResult {
                direction: fuzzy_reflection(unit_direction, rec.normal, diffusion, rng),
                attenuation: albedo,
            },
            MaterialKind::Refractive { index } => ScatterResult {
                direction: refraction(unit_direction, rec.normal, index),
                attenuation: Color::ONE,
            },
        }
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Normal perturbed by a uniform offset in [-1, 1]^3.
fn diffuse_direction(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let mut direction = normal + random_vec3_range(rng, -1.0, 1.0);

    // Catch degenerate scatter direction
    if is_near_zero(direction, NEAR_ZERO) {
        direction = normal;
    }
    normalize(direction)
}

/// Mirror reflection plus a uniform offset in [-fuzz, fuzz]^3.
///
/// The sum is not renormalized.
fn fuzzy_reflection(unit_direction: Vec3, normal: Vec3, fuzz: f64, rng: &mut dyn RngCore) -> Vec3 {
    let reflected = normalize(reflect(unit_direction, normal));
    reflected + random_vec3_range(rng, -fuzz, fuzz)
}

/// Snell refraction with total internal reflection fallback.
fn refraction(unit_direction: Vec3, normal: Vec3, index: f64) -> Vec3 {
    let exiting = unit_direction.dot(normal) < 0.0;
    let cos_theta = (-unit_direction.dot(normal)).min(1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

    let (ratio, normal) = if exiting { (1.0 / index, normal) } else { (index, -normal) };

    let direction = if ratio * sin_theta > 1.0 {
        reflect(unit_direction, normal)
    } else {
        let r_out_perp = ratio * (unit_direction + cos_theta * normal);
        let r_out_parallel = -(1.0 - r_out_perp.dot(r_out_perp)).max(0.0).sqrt() * normal;
        r_out_perp + r_out_parallel
    };
    normalize(direction)
}
