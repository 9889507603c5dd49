//! Render configuration and its text file reader.
//!
//! The file is a list of `key: values` lines (`key = values` and
//! `key values` are accepted too). Keys not present in the file keep their
//! defaults. Each key is dispatched through a static handler table.

use std::path::{Path, PathBuf};

use lumen_math::{Interval, Vec3};
use thiserror::Error;

use crate::text::{content_lines, split_key, Tokens};

/// Errors that can occur while reading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unknown configuration key: [{0}]")]
    UnknownKey(String),

    #[error("Invalid value for key: [{key}]")]
    InvalidValue { key: String },

    #[error("Extra data after configuration value for key: [{key}] (Extra: {extra})")]
    ExtraData { key: String, extra: String },

    #[error("line {line}: {error}")]
    Line { line: usize, error: Box<ConfigError> },
}

impl ConfigError {
    /// The underlying error, without the line number wrapper.
    pub fn kind(&self) -> &ConfigError {
        match self {
            ConfigError::Line { error, .. } => error.kind(),
            other => other,
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Validated render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Aspect ratio width component
    pub aspect_w: i32,
    /// Aspect ratio height component
    pub aspect_h: i32,
    /// Image width in pixels (height is derived from the aspect ratio)
    pub image_width: i32,
    /// Display gamma; values <= 0 disable the correction
    pub gamma: f64,

    pub camera_position: Vec3,
    pub camera_target: Vec3,
    /// World "north" used to orient the camera's right vector
    pub camera_north: Vec3,
    /// Field of view in degrees, in (0, 180)
    pub field_of_view: f64,

    pub samples_per_pixel: i32,
    pub max_depth: i32,

    /// Seed for the scattering stream
    pub material_rng_seed: i32,
    /// Seed for the sub-pixel jitter stream
    pub ray_rng_seed: i32,

    /// Sky color looking straight up
    pub background_dark: Vec3,
    /// Sky color looking straight down
    pub background_light: Vec3,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            aspect_w: 16,
            aspect_h: 9,
            image_width: 1920,
            gamma: 2.2,
            camera_position: Vec3::new(0.0, 0.0, -10.0),
            camera_target: Vec3::ZERO,
            camera_north: Vec3::Y,
            field_of_view: 90.0,
            samples_per_pixel: 20,
            max_depth: 5,
            material_rng_seed: 13,
            ray_rng_seed: 19,
            background_dark: Vec3::new(0.25, 0.5, 1.0),
            background_light: Vec3::ONE,
        }
    }
}

/// Open interval accepted for the field of view, in degrees.
pub const FIELD_OF_VIEW_RANGE: Interval = Interval::new(0.0, 180.0);

type Handler = fn(&mut Tokens<'_>, &mut Config, &str) -> ConfigResult<()>;

/// Key to handler table. Immutable; lookups are a linear scan.
const HANDLERS: &[(&str, Handler)] = &[
    ("aspect_ratio", handle_aspect_ratio),
    ("image_width", handle_image_width),
    ("gamma", handle_gamma),
    ("camera_position", handle_camera_position),
    ("camera_target", handle_camera_target),
    ("camera_north", handle_camera_north),
    ("field_of_view", handle_field_of_view),
    ("samples_per_pixel", handle_samples_per_pixel),
    ("max_depth", handle_max_depth),
    ("material_rng_seed", handle_material_seed),
    ("ray_rng_seed", handle_ray_seed),
    ("background_dark_color", handle_background_dark),
    ("background_light_color", handle_background_light),
];

fn invalid(key: &str) -> ConfigError {
    ConfigError::InvalidValue { key: key.to_string() }
}

fn ensure_no_tail(tokens: &mut Tokens<'_>, key: &str) -> ConfigResult<()> {
    let extra = tokens.rest();
    if extra.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ExtraData {
            key: key.to_string(),
            extra,
        })
    }
}

fn handle_aspect_ratio(tokens: &mut Tokens<'_>, cfg: &mut Config, key: &str) -> ConfigResult<()> {
    let (w, h) = match (tokens.i32(), tokens.i32()) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(invalid(key)),
    };
    ensure_no_tail(tokens, key)?;
    cfg.aspect_w = w;
    cfg.aspect_h = h;
    Ok(())
}

fn handle_image_width(tokens: &mut Tokens<'_>, cfg: &mut Config, key: &str) -> ConfigResult<()> {
    cfg.image_width = read_positive_int(tokens, key)?;
    Ok(())
}

fn handle_gamma(tokens: &mut Tokens<'_>, cfg: &mut Config, key: &str) -> ConfigResult<()> {
    let gamma = tokens.f64().filter(|g| *g > 0.0).ok_or_else(|| invalid(key))?;
    ensure_no_tail(tokens, key)?;
    cfg.gamma = gamma;
    Ok(())
}

fn handle_field_of_view(tokens: &mut Tokens<'_>, cfg: &mut Config, key: &str) -> ConfigResult<()> {
    let fov = tokens
        .f64()
        .filter(|f| FIELD_OF_VIEW_RANGE.surrounds(*f))
        .ok_or_else(|| invalid(key))?;
    ensure_no_tail(tokens, key)?;
    cfg.field_of_view = fov;
    Ok(())
}

fn handle_camera_position(tokens: &mut Tokens<'_>, cfg: &mut Config, key: &str) -> ConfigResult<()> {
    cfg.camera_position = read_vec3(tokens, key)?;
    Ok(())
}

fn handle_camera_target(tokens: &mut Tokens<'_>, cfg: &mut Config, key: &str) -> ConfigResult<()> {
    cfg.camera_target = read_vec3(tokens, key)?;
    Ok(())
}

fn handle_camera_north(tokens: &mut Tokens<'_>, cfg: &mut Config, key: &str) -> ConfigResult<()> {
    cfg.camera_north = read_vec3(tokens, key)?;
    Ok(())
}

fn handle_samples_per_pixel(tokens: &mut Tokens<'_>, cfg: &mut Config, key: &str) -> ConfigResult<()> {
    cfg.samples_per_pixel = read_positive_int(tokens, key)?;
    Ok(())
}

fn handle_max_depth(tokens: &mut Tokens<'_>, cfg: &mut Config, key: &str) -> ConfigResult<()> {
    cfg.max_depth = read_positive_int(tokens, key)?;
    Ok(())
}

fn handle_material_seed(tokens: &mut Tokens<'_>, cfg: &mut Config, key: &str) -> ConfigResult<()> {
    cfg.material_rng_seed = read_seed(tokens, key)?;
    Ok(())
}

fn handle_ray_seed(tokens: &mut Tokens<'_>, cfg: &mut Config, key: &str) -> ConfigResult<()> {
    cfg.ray_rng_seed = read_seed(tokens, key)?;
    Ok(())
}

fn handle_background_dark(tokens: &mut Tokens<'_>, cfg: &mut Config, key: &str) -> ConfigResult<()> {
    cfg.background_dark = read_color(tokens, key)?;
    Ok(())
}

fn handle_background_light(tokens: &mut Tokens<'_>, cfg: &mut Config, key: &str) -> ConfigResult<()> {
    cfg.background_light = read_color(tokens, key)?;
    Ok(())
}

fn read_positive_int(tokens: &mut Tokens<'_>, key: &str) -> ConfigResult<i32> {
    let n = tokens.i32().filter(|n| *n > 0).ok_or_else(|| invalid(key))?;
    ensure_no_tail(tokens, key)?;
    Ok(n)
}

fn read_seed(tokens: &mut Tokens<'_>, key: &str) -> ConfigResult<i32> {
    let n = tokens.i32().ok_or_else(|| invalid(key))?;
    ensure_no_tail(tokens, key)?;
    Ok(n)
}

fn read_vec3(tokens: &mut Tokens<'_>, key: &str) -> ConfigResult<Vec3> {
    let v = tokens.vec3().ok_or_else(|| invalid(key))?;
    ensure_no_tail(tokens, key)?;
    Ok(v)
}

fn read_color(tokens: &mut Tokens<'_>, key: &str) -> ConfigResult<Vec3> {
    let c = tokens
        .vec3()
        .filter(|c| c.to_array().iter().all(|x| Interval::UNIT.contains(*x)))
        .ok_or_else(|| invalid(key))?;
    ensure_no_tail(tokens, key)?;
    Ok(c)
}

fn process_line(line: &str, cfg: &mut Config) -> ConfigResult<()> {
    let (key, values) = split_key(line, true);
    let handler = HANDLERS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, handler)| *handler)
        .ok_or_else(|| ConfigError::UnknownKey(key.clone()))?;

    let mut tokens = Tokens::new(values);
    handler(&mut tokens, cfg, &key)
}

/// Parse configuration text, starting from [`Config::default`].
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    let mut cfg = Config::default();
    for (line_no, line) in content_lines(content) {
        process_line(line, &mut cfg).map_err(|error| ConfigError::Line {
            line: line_no,
            error: Box::new(error),
        })?;
    }
    Ok(cfg)
}

/// Read and parse a configuration file.
pub fn load_config<P: AsRef<Path>>(path: P) -> ConfigResult<Config> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let cfg = parse_config(&content)?;
    log::debug!("Loaded configuration from {}: {:?}", path.display(), cfg);
    Ok(cfg)
}
