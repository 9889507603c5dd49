//! Lumen Renderer - CPU path tracing.
//!
//! A Monte Carlo path tracer over spheres and capped cylinders with matte,
//! metal and refractive surfaces. Images render bucket by bucket on rayon
//! into either framebuffer layout and are written as PPM or PNG.
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{load_config, load_scene};
//! use lumen_renderer::{render_aos, save_image, Camera, RenderOptions};
//!
//! let camera = Camera::from_config(&load_config("config.txt")?)?;
//! let scene = load_scene("scene.txt")?;
//! let image = render_aos(&camera, &scene, &RenderOptions::default());
//! save_image("out.ppm", &image)?;
//! ```

mod bucket;
mod camera;
mod cylinder;
mod framebuffer;
mod hittable;
mod material;
mod output;
pub mod random;
mod renderer;
mod sphere;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::{Camera, CameraError};
pub use framebuffer::{same_pixels, FramebufferAos, FramebufferSoa, Pixel, PixelSink, PixelSource};
pub use hittable::{hit_scene, HitRecord, Hittable, EPS_DENOMINATOR, EPS_INTERSECTION};
pub use material::{Scatter, ScatterResult, NEAR_ZERO};
pub use output::{save_image, save_png, save_ppm, write_ppm, OutputError};
pub use random::SampleStreams;
pub use renderer::{
    apply_gamma, average_from_sum, clamp_01, color_to_pixel, float_to_byte, ray_color, render,
    render_aos, render_pixel, render_soa, sky_gradient, RenderOptions,
};

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Interval, Ray, Vec3};
