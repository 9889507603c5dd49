//! Scene file parser.
//!
//! One entity per line, `tag: params` or `tag params`:
//!
//! - `matte: name r g b`
//! - `metal: name r g b diffusion`
//! - `refractive: name index`
//! - `sphere: cx cy cz radius material`
//! - `cylinder: cx cy cz radius ax ay az material`
//!
//! Materials must be declared before the primitives that use them.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::scene::{Cylinder, Material, MaterialKind, Scene, Sphere};
use crate::text::{content_lines, split_key, Tokens};

/// Errors that can occur while building or parsing a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scene file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unknown scene entity: {0}")]
    UnknownEntity(String),

    #[error("Material with name [{0}] already exists")]
    DuplicateMaterial(String),

    #[error("Invalid material parameters for: [{0}]")]
    InvalidMaterialParams(String),

    #[error("Invalid object parameters for: [{0}]")]
    InvalidObjectParams(String),

    #[error("Extra data after parameters for: [{tag}] (Extra: {extra})")]
    ExtraData { tag: String, extra: String },

    #[error("Material not found: [{0}]")]
    UnknownMaterial(String),

    #[error("Material index {0} is out of range")]
    MaterialIndexOutOfRange(usize),

    #[error("line {line}: {error}")]
    Line { line: usize, error: Box<SceneError> },
}

impl SceneError {
    /// The underlying error, without the line number wrapper.
    pub fn kind(&self) -> &SceneError {
        match self {
            SceneError::Line { error, .. } => error.kind(),
            other => other,
        }
    }
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

fn ensure_no_tail(tokens: &mut Tokens<'_>, tag: &str) -> SceneResult<()> {
    let extra = tokens.rest();
    if extra.is_empty() {
        Ok(())
    } else {
        Err(SceneError::ExtraData {
            tag: tag.to_string(),
            extra,
        })
    }
}

fn parse_material(tokens: &mut Tokens<'_>, scene: &mut Scene, tag: &str) -> SceneResult<()> {
    let invalid = || SceneError::InvalidMaterialParams(tag.to_string());

    let name = tokens.word().ok_or_else(invalid)?;
    if scene.material_index(name).is_some() {
        return Err(SceneError::DuplicateMaterial(name.to_string()));
    }

    let kind = match tag {
        "matte" => MaterialKind::Matte {
            albedo: tokens.vec3().ok_or_else(invalid)?,
        },
        "metal" => MaterialKind::Metal {
            albedo: tokens.vec3().ok_or_else(invalid)?,
            diffusion: tokens.f64().ok_or_else(invalid)?,
        },
        _ => MaterialKind::Refractive {
            index: tokens.f64().ok_or_else(invalid)?,
        },
    };
    ensure_no_tail(tokens, tag)?;

    let index = scene.add_material(Material::new(name, kind))?;
    log::trace!("Material {} '{}' -> index {}", tag, name, index);
    Ok(())
}

fn resolve_material(tokens: &mut Tokens<'_>, scene: &Scene, tag: &str) -> SceneResult<usize> {
    let name = tokens
        .word()
        .ok_or_else(|| SceneError::InvalidObjectParams(tag.to_string()))?;
    ensure_no_tail(tokens, tag)?;
    scene
        .material_index(name)
        .ok_or_else(|| SceneError::UnknownMaterial(name.to_string()))
}

fn parse_sphere(tokens: &mut Tokens<'_>, scene: &mut Scene, tag: &str) -> SceneResult<()> {
    let invalid = || SceneError::InvalidObjectParams(tag.to_string());

    let center = tokens.vec3().ok_or_else(invalid)?;
    let radius = tokens.f64().filter(|r| *r > 0.0).ok_or_else(invalid)?;
    let material = resolve_material(tokens, scene, tag)?;

    scene.add_sphere(Sphere::new(center, radius, material))
}

fn parse_cylinder(tokens: &mut Tokens<'_>, scene: &mut Scene, tag: &str) -> SceneResult<()> {
    let invalid = || SceneError::InvalidObjectParams(tag.to_string());

    let base_center = tokens.vec3().ok_or_else(invalid)?;
    let radius = tokens.f64().filter(|r| *r > 0.0).ok_or_else(invalid)?;
    let axis = tokens.vec3().filter(|a| a.length() != 0.0).ok_or_else(invalid)?;
    let material = resolve_material(tokens, scene, tag)?;

    scene.add_cylinder(Cylinder::new(base_center, radius, axis, material))
}

fn process_line(line: &str, scene: &mut Scene) -> SceneResult<()> {
    let (tag, params) = split_key(line, false);
    let mut tokens = Tokens::new(params);

    match tag.as_str() {
        "matte" | "metal" | "refractive" => parse_material(&mut tokens, scene, &tag),
        "sphere" => parse_sphere(&mut tokens, scene, &tag),
        "cylinder" => parse_cylinder(&mut tokens, scene, &tag),
        _ => Err(SceneError::UnknownEntity(tag)),
    }
}

/// Parse scene text.
pub fn parse_scene(content: &str) -> SceneResult<Scene> {
    let mut scene = Scene::new();
    for (line_no, line) in content_lines(content) {
        process_line(line, &mut scene).map_err(|error| SceneError::Line {
            line: line_no,
            error: Box::new(error),
        })?;
    }
    Ok(scene)
}

/// Read and parse a scene file.
pub fn load_scene<P: AsRef<Path>>(path: P) -> SceneResult<Scene> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SceneError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let scene = parse_scene(&content)?;
    log::debug!(
        "Loaded scene from {}: {} materials, {} spheres, {} cylinders",
        path.display(),
        scene.materials.len(),
        scene.spheres.len(),
        scene.cylinders.len()
    );
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Color;
    use lumen_math::Vec3;

    #[test]
    fn test_parse_matte_material() {
        let scene = parse_scene("\n    matte: red 0.5 0.5 0.5\n  ").unwrap();

        assert_eq!(scene.materials.len(), 1);
        assert_eq!(scene.materials[0].name, "red");
        assert_eq!(
            scene.materials[0].kind,
            MaterialKind::Matte {
                albedo: Color::splat(0.5)
            }
        );
    }

    #[test]
    fn test_parse_full_scene() {
        let scene = parse_scene(
            r"
            # materials
            matte: ground 0.8 0.8 0.0
            metal: mirror 0.7 0.6 0.5 0.1
            Refractive glass 1.5

            sphere: 0 -100.5 -1 100 ground
            sphere 1 0 -1 0.5 mirror
            cylinder: -1 0 -1 0.3 0 1 0 glass
            ",
        )
        .unwrap();

        assert_eq!(scene.materials.len(), 3);
        assert_eq!(scene.spheres.len(), 2);
        assert_eq!(scene.cylinders.len(), 1);

        assert_eq!(scene.spheres[1].center, Vec3::new(1.0, 0.0, -1.0));
        assert_eq!(scene.spheres[1].material, 1);
        assert_eq!(scene.cylinders[0].axis, Vec3::Y);
        assert_eq!(scene.cylinders[0].material, 2);
        assert_eq!(scene.materials[2].kind, MaterialKind::Refractive { index: 1.5 });
    }

    #[test]
    fn test_duplicate_material() {
        let err = parse_scene("matte: red 0.1 0.1 0.1\nmatte: red 0.2 0.2 0.2").unwrap_err();
        assert!(matches!(err.kind(), SceneError::DuplicateMaterial(n) if n == "red"));
        assert!(err.to_string().contains("already exists"));
        assert!(err.to_string().starts_with("line 2"));
    }

    #[test]
    fn test_non_positive_sphere_radius() {
        for text in ["sphere: 0 0 0 -5 red", "sphere: 0 0 0 0 red"] {
            let err = parse_scene(&format!("matte: red 0.1 0.1 0.1\n{text}")).unwrap_err();
            assert!(matches!(err.kind(), SceneError::InvalidObjectParams(t) if t == "sphere"));
            assert!(err.to_string().contains("Invalid object"));
        }
    }

    #[test]
    fn test_unknown_material_reference() {
        let err = parse_scene("matte: red 0.1 0.1 0.1\nsphere: 0 0 0 1 blue").unwrap_err();
        assert!(matches!(err.kind(), SceneError::UnknownMaterial(n) if n == "blue"));
    }

    #[test]
    fn test_material_must_be_declared_first() {
        let err = parse_scene("sphere: 0 0 0 1 red\nmatte: red 0.1 0.1 0.1").unwrap_err();
        assert!(matches!(err.kind(), SceneError::UnknownMaterial(_)));
    }

    #[test]
    fn test_invalid_cylinder() {
        let base = "matte: red 0.1 0.1 0.1\n";
        for text in ["cylinder: 0 0 0 1 0 0 0 red", "cylinder: 0 0 0 -1 0 1 0 red", "cylinder: 0 0 0 1 0 1 red"] {
            let err = parse_scene(&format!("{base}{text}")).unwrap_err();
            assert!(
                matches!(err.kind(), SceneError::InvalidObjectParams(_) | SceneError::UnknownMaterial(_)),
                "unexpected error for {text:?}: {err}"
            );
        }
    }

    #[test]
    fn test_invalid_material_params() {
        for text in [
            "matte: red 1.5 0 0",
            "matte: red 0.5 0.5",
            "metal: m 0.5 0.5 0.5 -1",
            "refractive: glass 0",
            "refractive: glass",
            "matte:",
        ] {
            let err = parse_scene(text).unwrap_err();
            assert!(
                matches!(err.kind(), SceneError::InvalidMaterialParams(_)),
                "expected InvalidMaterialParams for {text:?}, got {err}"
            );
        }
    }

    #[test]
    fn test_non_finite_numbers() {
        let base = "matte: red 0.1 0.1 0.1\n";
        for text in [
            "sphere: 0 0 0 inf red",
            "sphere: 0 0 0 nan red",
            "sphere: nan 0 0 1 red",
            "cylinder: nan 0 0 1 0 1 0 red",
            "cylinder: 0 0 0 inf 0 1 0 red",
            "cylinder: 0 0 0 1 0 inf 0 red",
        ] {
            let err = parse_scene(&format!("{base}{text}")).unwrap_err();
            assert!(
                matches!(err.kind(), SceneError::InvalidObjectParams(_)),
                "expected InvalidObjectParams for {text:?}, got {err}"
            );
        }

        for text in ["metal: m 0.5 0.5 0.5 inf", "metal: m nan 0.5 0.5 0.1", "refractive: glass infinity"] {
            let err = parse_scene(text).unwrap_err();
            assert!(
                matches!(err.kind(), SceneError::InvalidMaterialParams(_)),
                "expected InvalidMaterialParams for {text:?}, got {err}"
            );
        }
    }

    #[test]
    fn test_extra_data() {
        let err = parse_scene("refractive: glass 1.5 2.0").unwrap_err();
        assert!(matches!(err.kind(), SceneError::ExtraData { extra, .. } if extra == "2.0"));

        let err = parse_scene("matte: red 0.1 0.1 0.1\nsphere: 0 0 0 1 red extra").unwrap_err();
        assert!(matches!(err.kind(), SceneError::ExtraData { tag, .. } if tag == "sphere"));
    }

    #[test]
    fn test_unknown_entity() {
        let err = parse_scene("cube: 0 0 0 1").unwrap_err();
        assert!(matches!(err.kind(), SceneError::UnknownEntity(t) if t == "cube"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_scene("definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, SceneError::NotFound(_)));
    }

    #[test]
    fn test_load_scene_file() {
        let _ = env_logger::builder().is_test(true).try_init();

        let path = std::env::temp_dir().join(format!("lumen_scene_{}.txt", std::process::id()));
        std::fs::write(&path, "matte: red 0.9 0.1 0.1\nsphere: 0 0 0 1 red\n").unwrap();
        let result = load_scene(&path);
        std::fs::remove_file(&path).unwrap();

        let scene = result.unwrap();
        assert_eq!(scene.primitive_count(), 1);
        assert_eq!(scene.materials[0].name, "red");
    }
}
