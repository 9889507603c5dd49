//! Hittable trait and HitRecord for ray-object intersection.

use lumen_core::Scene;
use lumen_math::{normalize, Interval, Ray, Vec3};

/// Hits closer than this are ignored to avoid self-intersection acne.
pub const EPS_INTERSECTION: f64 = 1e-3;

/// Ray/plane denominators at or below this magnitude count as parallel.
pub const EPS_DENOMINATOR: f64 = 1e-8;

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Whether anything has been hit yet
    pub hit: bool,
    /// Parameter t where the intersection occurs
    pub t: f64,
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal (always points against the ray)
    pub normal: Vec3,
    /// Index into the scene's materials
    pub material: usize,
}

impl Default for HitRecord {
    fn default() -> Self {
        Self {
            hit: false,
            t: f64::INFINITY,
            p: Vec3::ZERO,
            normal: Vec3::ZERO,
            material: 0,
        }
    }
}

impl HitRecord {
    /// Commit a hit at distance `t`.
    pub fn record(&mut self, ray: &Ray, t: f64, outward_normal: Vec3, material: usize) {
        self.hit = true;
        self.t = t;
        self.p = ray.at(t);
        self.material = material;
        self.set_face_normal(ray, normalize(outward_normal));
    }

    /// Store the normal flipped, if needed, so it opposes the ray direction.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.normal = if ray.direction().dot(outward_normal) > 0.0 {
            -outward_normal
        } else {
            outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object within `[ray_t.min, ray_t.max)`.
    ///
    /// Returns true if hit, and fills in the hit record.
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool;
}

/// Brute-force closest hit over every primitive, spheres first.
impl Hittable for Scene {
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        let objects = self
            .spheres
            .iter()
            .map(|s| s as &dyn Hittable)
            .chain(self.cylinders.iter().map(|c| c as &dyn Hittable));

        for object in objects {
            let interval = Interval::new(ray_t.min, closest_so_far);
            if object.hit(ray, interval, rec) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
    }
}

/// Find the closest hit along `ray`, ignoring hits nearer than
/// [`EPS_INTERSECTION`].
pub fn hit_scene(scene: &Scene, ray: &Ray) -> Option<HitRecord> {
    let mut rec = HitRecord::default();
    if scene.hit(ray, Interval::new(EPS_INTERSECTION, f64::INFINITY), &mut rec) {
        Some(rec)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{Color, Cylinder, Material, Sphere};

    fn two_sphere_scene() -> Scene {
        let mut scene = Scene::new();
        let near = scene.add_material(Material::matte("near", Color::splat(0.5))).unwrap();
        let far = scene.add_material(Material::matte("far", Color::splat(0.2))).unwrap();
        // Added far first so order can't decide the result
        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, 10.0), 1.0, far)).unwrap();
        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0, near)).unwrap();
        scene
    }

    #[test]
    fn test_default_record_is_empty() {
        let rec = HitRecord::default();
        assert!(!rec.hit);
        assert_eq!(rec.t, f64::INFINITY);
    }

    #[test]
    fn test_set_face_normal_opposes_ray() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let mut rec = HitRecord::default();

        rec.set_face_normal(&ray, Vec3::Z);
        assert_eq!(rec.normal, -Vec3::Z);

        rec.set_face_normal(&ray, -Vec3::Z);
        assert_eq!(rec.normal, -Vec3::Z);
    }

    #[test]
    fn test_closest_hit_wins() {
        let scene = two_sphere_scene();
        let rec = hit_scene(&scene, &Ray::new(Vec3::ZERO, Vec3::Z)).unwrap();

        assert!(rec.hit);
        assert!((rec.t - 4.0).abs() < 1e-9);
        assert_eq!(rec.material, scene.material_index("near").unwrap());
    }

    #[test]
    fn test_miss_and_empty_scene() {
        let scene = two_sphere_scene();
        assert!(hit_scene(&scene, &Ray::new(Vec3::ZERO, -Vec3::Z)).is_none());
        assert!(hit_scene(&Scene::new(), &Ray::new(Vec3::ZERO, Vec3::Z)).is_none());
    }

    #[test]
    fn test_spheres_and_cylinders_compete() {
        let mut scene = two_sphere_scene();
        let m = scene.add_material(Material::metal("rod", Color::ONE, 0.0)).unwrap();
        // Slab across the z axis at z in [2, 3]
        scene
            .add_cylinder(Cylinder::new(Vec3::new(0.0, 0.0, 2.0), 1.0, Vec3::Z, m))
            .unwrap();

        let rec = hit_scene(&scene, &Ray::new(Vec3::ZERO, Vec3::Z)).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-9);
        assert_eq!(rec.material, m);
        assert_eq!(rec.normal, -Vec3::Z);
    }
}
