//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with a fixed bounce budget
//! - Sky gradient background
//! - Anti-aliasing via jittered multi-sampling
//! - Gamma correction and 8-bit quantization
//!
//! Rendering is split into buckets (see [`crate::bucket`]). Each bucket draws
//! from its own seeded streams, so parallel and sequential renders produce
//! identical bytes.

use std::time::Instant;

use lumen_core::{Color, Scene};
use lumen_math::{normalize, Interval, Ray};
use rand::RngCore;
use rayon::prelude::*;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::camera::Camera;
use crate::framebuffer::{FramebufferAos, FramebufferSoa, Pixel, PixelSink};
use crate::hittable::{HitRecord, Hittable, EPS_INTERSECTION};
use crate::material::{Scatter, ScatterResult};
use crate::random::SampleStreams;

/// Render options that don't change the image.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Bucket edge length in pixels
    pub bucket_size: u32,
    /// Render buckets on the rayon pool instead of the calling thread
    pub parallel: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            bucket_size: DEFAULT_BUCKET_SIZE,
            parallel: true,
        }
    }
}

/// Compute the color seen by a ray.
///
/// Traces the ray through the scene, bouncing off surfaces until it escapes
/// to the sky or `depth` runs out. Scattering draws from `rng`.
pub fn ray_color(
    ray: &Ray,
    scene: &Scene,
    camera: &Camera,
    depth: u32,
    rng: &mut dyn RngCore,
) -> Color {
    // Out of bounces: no light
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();
    if !scene.hit(ray, Interval::new(EPS_INTERSECTION, f64::INFINITY), &mut rec) {
        return sky_gradient(ray, camera);
    }

    let result = match scene.materials.get(rec.material) {
        Some(material) => material.kind.scatter(ray, &rec, rng),
        None => {
            log::trace!("Hit with unknown material index {}", rec.material);
            ScatterResult::UNRESOLVED
        }
    };

    let scattered = Ray::new(rec.p, result.direction);
    result.attenuation * ray_color(&scattered, scene, camera, depth - 1, rng)
}

/// Sky color for a ray that hit nothing.
///
/// Blends from `background_light` looking straight down to
/// `background_dark` looking straight up.
pub fn sky_gradient(ray: &Ray, camera: &Camera) -> Color {
    let unit_direction = normalize(ray.direction());
    let m = (unit_direction.y + 1.0) / 2.0;
    camera.background_light * (1.0 - m) + camera.background_dark * m
}

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f64) -> f64 {
    Interval::UNIT.clamp(x)
}

/// Clamp each channel to [0, 1], then raise it to `1 / gamma`.
///
/// A gamma <= 0 only clamps.
pub fn apply_gamma(color: Color, gamma: f64) -> Color {
    let clamped = Color::new(clamp_01(color.x), clamp_01(color.y), clamp_01(color.z));
    if gamma > 0.0 {
        clamped.powf(1.0 / gamma)
    } else {
        clamped
    }
}

/// Quantize a channel to a byte: clamp to [0, 0.999], scale by 256, truncate.
#[inline]
pub fn float_to_byte(value: f64) -> u8 {
    (value.clamp(0.0, 0.999) * 256.0) as u8
}

/// Gamma-correct and quantize a linear color.
pub fn color_to_pixel(color: Color, gamma: f64) -> Pixel {
    let c = apply_gamma(color, gamma);
    Pixel::new(float_to_byte(c.x), float_to_byte(c.y), float_to_byte(c.z))
}

/// Mean of `count` accumulated samples. Zero samples give black.
pub fn average_from_sum(sum: Color, count: u32) -> Color {
    if count == 0 {
        Color::ZERO
    } else {
        sum / f64::from(count)
    }
}

/// Render a single pixel with multi-sampling.
///
/// Jitter comes from `streams.ray`, scattering from `streams.material`.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    row: u32,
    col: u32,
    streams: &mut SampleStreams,
) -> Pixel {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel {
        let ray = camera.get_ray(row, col, &mut streams.ray);
        pixel_color += ray_color(&ray, scene, camera, camera.max_depth, &mut streams.material);
    }

    color_to_pixel(average_from_sum(pixel_color, camera.samples_per_pixel), camera.gamma)
}

/// Render the whole image into `target`.
///
/// `target` must hold exactly `camera.pixel_count()` pixels. The result does
/// not depend on `options.parallel` or on the size of the rayon pool.
///
/// # Panics
///
/// Panics if `target` does not hold exactly `camera.pixel_count()` pixels.
pub fn render<S: PixelSink + ?Sized>(
    camera: &Camera,
    scene: &Scene,
    options: &RenderOptions,
    target: &mut S,
) {
    assert_eq!(
        target.pixel_count(),
        camera.pixel_count(),
        "framebuffer size does not match the camera image"
    );

    let buckets = generate_buckets(camera.image_width, camera.image_height, options.bucket_size);
    log::info!(
        "Rendering {}x{} @ {} spp, {} buckets{}",
        camera.image_width,
        camera.image_height,
        camera.samples_per_pixel,
        buckets.len(),
        if options.parallel { "" } else { " (sequential)" }
    );
    let start = Instant::now();

    let results: Vec<BucketResult> = if options.parallel {
        buckets
            .par_iter()
            .map(|bucket| render_bucket(bucket, camera, scene))
            .collect()
    } else {
        buckets
            .iter()
            .map(|bucket| render_bucket(bucket, camera, scene))
            .collect()
    };

    for result in &results {
        result.store(camera.image_width, target);
    }

    log::info!("Render completed in {:.2}s", start.elapsed().as_secs_f64());
}

/// Render into a new interleaved framebuffer.
pub fn render_aos(camera: &Camera, scene: &Scene, options: &RenderOptions) -> FramebufferAos {
    let mut framebuffer = FramebufferAos::new(camera.image_width, camera.image_height);
    render(camera, scene, options, &mut framebuffer);
    framebuffer
}

/// Render into a new planar framebuffer.
pub fn render_soa(camera: &Camera, scene: &Scene, options: &RenderOptions) -> FramebufferSoa {
    let mut framebuffer = FramebufferSoa::new(camera.image_width, camera.image_height);
    render(camera, scene, options, &mut framebuffer);
    framebuffer
}
