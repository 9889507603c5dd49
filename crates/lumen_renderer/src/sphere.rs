//! Ray-sphere intersection.

use lumen_core::Sphere;
use lumen_math::{Interval, Ray};

use crate::hittable::{HitRecord, Hittable};

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.half_open_contains(root) {
            root = (h + sqrtd) / a;
            if !ray_t.half_open_contains(root) {
                return false;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        rec.record(ray, root, outward_normal, self.material);
        true
    }
}
