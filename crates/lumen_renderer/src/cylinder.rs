//! Ray intersection for capped cylinders.
//!
//! A cylinder is tested as three surfaces in a fixed order: the curved wall,
//! the bottom cap at `base_center`, then the top cap at
//! `base_center + axis`. Each test only commits a hit strictly closer than
//! whatever the previous ones found.

use lumen_core::Cylinder;
use lumen_math::{normalize, perp_to_axis, Interval, Ray, Vec3};

use crate::hittable::{HitRecord, Hittable, EPS_DENOMINATOR};

impl Hittable for Cylinder {
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let axis = normalize(self.axis);
        let half_height = self.height() / 2.0;
        let center = self.midpoint();

        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        let interval = Interval::new(ray_t.min, closest_so_far);
        if let Some((t, normal)) = hit_wall(ray, center, axis, half_height, self.radius, interval) {
            rec.record(ray, t, normal, self.material);
            hit_anything = true;
            closest_so_far = t;
        }

        let caps = [(self.base_center, -axis), (self.base_center + self.axis, axis)];
        for (cap_center, cap_normal) in caps {
            let interval = Interval::new(ray_t.min, closest_so_far);
            if let Some(t) = hit_cap(ray, cap_center, cap_normal, self.radius, interval) {
                rec.record(ray, t, cap_normal, self.material);
                hit_anything = true;
                closest_so_far = t;
            }
        }

        hit_anything
    }
}

/// Curved wall of the finite cylinder centred on `center`.
///
/// Solves the infinite cylinder quadratic in the plane perpendicular to the
/// axis, then keeps the nearest root inside `ray_t` whose hit point lies
/// within `half_height` of the center along the axis.
fn hit_wall(
    ray: &Ray,
    center: Vec3,
    axis: Vec3,
    half_height: f64,
    radius: f64,
    ray_t: Interval,
) -> Option<(f64, Vec3)> {
    let oc = ray.origin() - center;
    let op = perp_to_axis(oc, axis);
    let dp = perp_to_axis(ray.direction(), axis);

    let a = dp.dot(dp);
    if a.abs() <= EPS_DENOMINATOR {
        // Ray runs parallel to the wall
        return None;
    }
    let b = 2.0 * op.dot(dp);
    let c = op.dot(op) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrtd = discriminant.sqrt();

    // Near root first. The far root is the exit point for rays that start
    // inside the tube, such as those refracted into a glass cylinder.
    [(-b - sqrtd) / (2.0 * a), (-b + sqrtd) / (2.0 * a)]
        .into_iter()
        .filter(|t| ray_t.half_open_contains(*t))
        .find_map(|t| {
            let offset = ray.at(t) - center;
            if offset.dot(axis).abs() > half_height {
                return None;
            }
            Some((t, perp_to_axis(offset, axis)))
        })
}

/// Disk of `radius` around `center`, facing `normal`.
fn hit_cap(ray: &Ray, center: Vec3, normal: Vec3, radius: f64, ray_t: Interval) -> Option<f64> {
    let denom = ray.direction().dot(normal);
    if denom.abs() <= EPS_DENOMINATOR {
        return None;
    }

    let t = (center - ray.origin()).dot(normal) / denom;
    if !ray_t.half_open_contains(t) {
        return None;
    }
    if (ray.at(t) - center).length() > radius {
        return None;
    }
    Some(t)
}
