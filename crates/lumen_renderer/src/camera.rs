//! Camera for ray generation.
//!
//! Built once from a validated [`Config`] and shared read-only by every
//! render thread.

use lumen_core::config::FIELD_OF_VIEW_RANGE;
use lumen_core::{Color, Config};
use lumen_math::{normalize, Ray, Vec3, NORMALIZE_EPSILON};
use rand::RngCore;
use thiserror::Error;

use crate::random::{sample_square, seed_from_i32};

/// Errors that can occur while building a camera.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("Invalid field of view: {0} (must be in (0, 180) degrees)")]
    InvalidFieldOfView(f64),

    #[error("Invalid aspect ratio: {0}:{1}")]
    InvalidAspectRatio(i32, i32),

    #[error("Invalid image width: {0}")]
    InvalidImageWidth(i32),

    #[error("Computed image height is not positive: {0}")]
    NonPositiveHeight(i64),

    #[error("Camera position, target and north produce a degenerate basis")]
    DegenerateBasis,

    #[error("samples_per_pixel and max_depth must be positive (got {0} and {1})")]
    InvalidSampling(i32, i32),
}

/// Camera for generating rays into the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    /// Display gamma; values <= 0 only clamp
    pub gamma: f64,

    // Random stream seeds
    pub material_seed: u64,
    pub ray_seed: u64,

    // Sky
    pub background_dark: Color,
    pub background_light: Color,

    // Derived geometry
    position: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
}

impl Camera {
    /// Derive the camera from a configuration.
    pub fn from_config(config: &Config) -> Result<Self, CameraError> {
        let fov = config.field_of_view;
        if !FIELD_OF_VIEW_RANGE.surrounds(fov) {
            return Err(CameraError::InvalidFieldOfView(fov));
        }
        if config.aspect_w <= 0 || config.aspect_h <= 0 {
            return Err(CameraError::InvalidAspectRatio(config.aspect_w, config.aspect_h));
        }
        if config.image_width <= 0 {
            return Err(CameraError::InvalidImageWidth(config.image_width));
        }
        if config.samples_per_pixel <= 0 || config.max_depth <= 0 {
            return Err(CameraError::InvalidSampling(config.samples_per_pixel, config.max_depth));
        }

        let image_width = config.image_width as u32;
        let height = (f64::from(config.image_width) * f64::from(config.aspect_h)
            / f64::from(config.aspect_w))
        .round() as i64;
        if height <= 0 {
            return Err(CameraError::NonPositiveHeight(height));
        }
        let image_height = u32::try_from(height).map_err(|_| CameraError::NonPositiveHeight(height))?;

        // Camera basis
        let position = config.camera_position;
        let view = position - config.camera_target;
        let focal_distance = view.length();
        if focal_distance <= NORMALIZE_EPSILON {
            return Err(CameraError::DegenerateBasis);
        }
        let forward = view / focal_distance;
        let right = normalize(config.camera_north.cross(forward));
        if right == Vec3::ZERO {
            return Err(CameraError::DegenerateBasis);
        }
        let up = forward.cross(right);

        // Viewport
        let viewport_height = 2.0 * (fov.to_radians() / 2.0).tan() * focal_distance;
        let viewport_width = viewport_height * f64::from(image_width) / f64::from(image_height);
        let viewport_u = right * viewport_width;
        let viewport_v = up * -viewport_height;

        let pixel_delta_u = viewport_u / f64::from(image_width);
        let pixel_delta_v = viewport_v / f64::from(image_height);

        let viewport_upper_left = position - view - viewport_u / 2.0 - viewport_v / 2.0;
        let pixel00_loc = viewport_upper_left + 0.5 * (pixel_delta_u + pixel_delta_v);

        log::debug!(
            "Camera: {}x{}, fov {}, focal distance {:.3}",
            image_width,
            image_height,
            fov,
            focal_distance
        );

        Ok(Self {
            image_width,
            image_height,
            samples_per_pixel: config.samples_per_pixel as u32,
            max_depth: config.max_depth as u32,
            gamma: config.gamma,
            material_seed: seed_from_i32(config.material_rng_seed),
            ray_seed: seed_from_i32(config.ray_rng_seed),
            background_dark: config.background_dark,
            background_light: config.background_light,
            position,
            forward,
            right,
            up,
            pixel00_loc,
            pixel_delta_u,
            pixel_delta_v,
        })
    }

    /// Generate a jittered ray through pixel (row, col).
    ///
    /// Consumes two values from `rng`: the x offset, then the y offset.
    pub fn get_ray(&self, row: u32, col: u32, rng: &mut dyn RngCore) -> Ray {
        let (jx, jy) = sample_square(rng);
        self.ray_through(f64::from(row) + jy, f64::from(col) + jx)
    }

    /// Ray through a fractional pixel position (pixel centers at integers).
    pub fn ray_through(&self, row: f64, col: f64) -> Ray {
        let pixel_sample = self.pixel00_loc + col * self.pixel_delta_u + row * self.pixel_delta_v;
        Ray::new(self.position, normalize(pixel_sample - self.position))
    }

    /// Total number of pixels in the image.
    pub fn pixel_count(&self) -> usize {
        self.image_width as usize * self.image_height as usize
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit vector from the target back to the camera.
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// Unit vector pointing to the image's right.
    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// Unit vector pointing to the image's top.
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Center of the top-left pixel.
    pub fn pixel00_loc(&self) -> Vec3 {
        self.pixel00_loc
    }

    /// Step between horizontally adjacent pixel centers.
    pub fn pixel_delta_u(&self) -> Vec3 {
        self.pixel_delta_u
    }

    /// Step between vertically adjacent pixel centers.
    pub fn pixel_delta_v(&self) -> Vec3 {
        self.pixel_delta_v
    }
}
