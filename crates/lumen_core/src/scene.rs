//! Scene model: materials, spheres and capped cylinders.
//!
//! Primitives reference materials by index into [`Scene::materials`].
//! Material names only matter while a scene is being built; the
//! `add_*` methods validate every entity so a `Scene` that exists is always
//! safe to trace.

use lumen_math::{Interval, Vec3};

use crate::parser::SceneError;

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// Surface response of a material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialKind {
    /// Diffuse surface tinted by `albedo`.
    Matte { albedo: Color },
    /// Mirror reflection perturbed by up to `diffusion` per component.
    Metal { albedo: Color, diffusion: f64 },
    /// Clear dielectric with refraction index `index`.
    Refractive { index: f64 },
}

impl MaterialKind {
    /// Lowercase tag used in scene files.
    pub fn tag(&self) -> &'static str {
        match self {
            MaterialKind::Matte { .. } => "matte",
            MaterialKind::Metal { .. } => "metal",
            MaterialKind::Refractive { .. } => "refractive",
        }
    }

    fn is_valid(&self) -> bool {
        let rgb_ok = |c: &Color| c.to_array().iter().all(|x| Interval::UNIT.contains(*x));
        match self {
            MaterialKind::Matte { albedo } => rgb_ok(albedo),
            MaterialKind::Metal { albedo, diffusion } => {
                rgb_ok(albedo) && diffusion.is_finite() && *diffusion >= 0.0
            }
            MaterialKind::Refractive { index } => index.is_finite() && *index > 0.0,
        }
    }
}

/// A named material.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Unique name within the scene
    pub name: String,
    pub kind: MaterialKind,
}

impl Material {
    pub fn new(name: impl Into<String>, kind: MaterialKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Create a diffuse material.
    pub fn matte(name: impl Into<String>, albedo: Color) -> Self {
        Self::new(name, MaterialKind::Matte { albedo })
    }

    /// Create a metal material.
    pub fn metal(name: impl Into<String>, albedo: Color, diffusion: f64) -> Self {
        Self::new(name, MaterialKind::Metal { albedo, diffusion })
    }

    /// Create a refractive material.
    pub fn refractive(name: impl Into<String>, index: f64) -> Self {
        Self::new(name, MaterialKind::Refractive { index })
    }
}

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f64,
    /// Index into the scene's materials
    pub material: usize,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f64, material: usize) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }
}

/// A capped cylinder spanning `base_center` to `base_center + axis`.
///
/// The axis length is the cylinder's height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    pub base_center: Vec3,
    pub radius: f64,
    pub axis: Vec3,
    /// Index into the scene's materials
    pub material: usize,
}

impl Cylinder {
    pub fn new(base_center: Vec3, radius: f64, axis: Vec3, material: usize) -> Self {
        Self {
            base_center,
            radius,
            axis,
            material,
        }
    }

    /// Point halfway along the axis.
    pub fn midpoint(&self) -> Vec3 {
        self.base_center + self.axis * 0.5
    }

    pub fn height(&self) -> f64 {
        self.axis.length()
    }
}

/// Complete scene description.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub materials: Vec<Material>,
    pub spheres: Vec<Sphere>,
    pub cylinders: Vec<Cylinder>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a material's index by name.
    pub fn material_index(&self, name: &str) -> Option<usize> {
        self.materials.iter().position(|m| m.name == name)
    }

    /// Add a material, returning its index.
    ///
    /// Fails on a duplicate name or out-of-range parameters.
    pub fn add_material(&mut self, material: Material) -> Result<usize, SceneError> {
        if self.material_index(&material.name).is_some() {
            return Err(SceneError::DuplicateMaterial(material.name));
        }
        if !material.kind.is_valid() {
            return Err(SceneError::InvalidMaterialParams(material.kind.tag().to_string()));
        }
        self.materials.push(material);
        Ok(self.materials.len() - 1)
    }

    /// Add a sphere. The radius must be positive and the material must exist.
    pub fn add_sphere(&mut self, sphere: Sphere) -> Result<(), SceneError> {
        if !(sphere.radius > 0.0) || !sphere.radius.is_finite() || !sphere.center.is_finite() {
            return Err(SceneError::InvalidObjectParams("sphere".to_string()));
        }
        self.check_material(sphere.material)?;
        self.spheres.push(sphere);
        Ok(())
    }

    /// Add a cylinder. Needs a positive radius, a non-zero axis and an
    /// existing material. All values must be finite.
    pub fn add_cylinder(&mut self, cylinder: Cylinder) -> Result<(), SceneError> {
        let finite = cylinder.radius.is_finite()
            && cylinder.base_center.is_finite()
            && cylinder.axis.is_finite();
        if !finite || !(cylinder.radius > 0.0) || cylinder.axis.length() == 0.0 {
            return Err(SceneError::InvalidObjectParams("cylinder".to_string()));
        }
        self.check_material(cylinder.material)?;
        self.cylinders.push(cylinder);
        Ok(())
    }

    fn check_material(&self, index: usize) -> Result<(), SceneError> {
        if index < self.materials.len() {
            Ok(())
        } else {
            Err(SceneError::MaterialIndexOutOfRange(index))
        }
    }

    /// Total number of primitives.
    pub fn primitive_count(&self) -> usize {
        self.spheres.len() + self.cylinders.len()
    }

    /// True if the scene has no primitives.
    pub fn is_empty(&self) -> bool {
        self.primitive_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_material_returns_index() {
        let mut scene = Scene::new();
        let red = scene.add_material(Material::matte("red", Color::new(1.0, 0.0, 0.0))).unwrap();
        let glass = scene.add_material(Material::refractive("glass", 1.5)).unwrap();

        assert_eq!(red, 0);
        assert_eq!(glass, 1);
        assert_eq!(scene.material_index("glass"), Some(1));
        assert_eq!(scene.material_index("missing"), None);
    }

    #[test]
    fn test_duplicate_material() {
        let mut scene = Scene::new();
        scene.add_material(Material::matte("red", Color::ONE)).unwrap();
        let err = scene.add_material(Material::metal("red", Color::ONE, 0.1)).unwrap_err();
        assert!(matches!(err, SceneError::DuplicateMaterial(ref n) if n == "red"));
    }

    #[test]
    fn test_invalid_material_params() {
        let mut scene = Scene::new();
        assert!(scene.add_material(Material::matte("a", Color::new(1.5, 0.0, 0.0))).is_err());
        assert!(scene.add_material(Material::metal("b", Color::ONE, -0.1)).is_err());
        assert!(scene.add_material(Material::refractive("c", 0.0)).is_err());
        assert!(scene.add_material(Material::metal("d", Color::ONE, f64::INFINITY)).is_err());
        assert!(scene.add_material(Material::refractive("e", f64::NAN)).is_err());
        assert!(scene.materials.is_empty());
    }

    #[test]
    fn test_add_primitives() {
        let mut scene = Scene::new();
        let m = scene.add_material(Material::matte("grey", Color::splat(0.5))).unwrap();

        scene.add_sphere(Sphere::new(Vec3::ZERO, 1.0, m)).unwrap();
        scene.add_cylinder(Cylinder::new(Vec3::ZERO, 0.5, Vec3::Y * 2.0, m)).unwrap();

        assert_eq!(scene.primitive_count(), 2);
        assert!(!scene.is_empty());
    }

    #[test]
    fn test_invalid_primitives() {
        let mut scene = Scene::new();
        let m = scene.add_material(Material::matte("grey", Color::splat(0.5))).unwrap();

        assert!(scene.add_sphere(Sphere::new(Vec3::ZERO, 0.0, m)).is_err());
        assert!(scene.add_sphere(Sphere::new(Vec3::ZERO, -5.0, m)).is_err());
        assert!(scene.add_cylinder(Cylinder::new(Vec3::ZERO, 1.0, Vec3::ZERO, m)).is_err());
        assert!(scene.add_sphere(Sphere::new(Vec3::ZERO, f64::INFINITY, m)).is_err());
        assert!(scene.add_cylinder(Cylinder::new(Vec3::splat(f64::NAN), 1.0, Vec3::Y, m)).is_err());
        assert!(scene.add_cylinder(Cylinder::new(Vec3::ZERO, f64::INFINITY, Vec3::Y, m)).is_err());
        assert!(scene.add_cylinder(Cylinder::new(Vec3::ZERO, 1.0, Vec3::new(0.0, f64::INFINITY, 0.0), m)).is_err());
        assert!(matches!(
            scene.add_sphere(Sphere::new(Vec3::ZERO, 1.0, 3)),
            Err(SceneError::MaterialIndexOutOfRange(3))
        ));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_cylinder_geometry() {
        let c = Cylinder::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Vec3::new(0.0, 4.0, 0.0), 0);
        assert_eq!(c.midpoint(), Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(c.height(), 4.0);
    }
}
