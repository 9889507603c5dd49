//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon. Buckets are numbered in
//! row-major order and each one seeds its own random streams from that
//! number, which keeps the image independent of scheduling.

use lumen_core::Scene;

use crate::camera::Camera;
use crate::framebuffer::{Pixel, PixelSink};
use crate::random::SampleStreams;
use crate::renderer::render_pixel;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Row-major position of this bucket in the grid
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets covering a `width` x `height` image, row by row.
///
/// Edge buckets are clipped to the image. A `bucket_size` of 0 is treated
/// as 1.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
            x += bucket_size;
        }
        y += bucket_size;
    }

    buckets
}

/// Render a single bucket.
///
/// Pixels are traced in row-major order within the bucket, all drawing from
/// the bucket's own streams.
pub fn render_bucket(bucket: &Bucket, camera: &Camera, scene: &Scene) -> BucketResult {
    let mut streams = SampleStreams::for_bucket(camera.material_seed, camera.ray_seed, bucket.index);
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let row = bucket.y + local_y;
            let col = bucket.x + local_x;
            pixels.push(render_pixel(camera, scene, row, col, &mut streams));
        }
    }

    BucketResult::new(*bucket, pixels)
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixels in row-major order within the bucket
    pub pixels: Vec<Pixel>,
}

impl BucketResult {
    /// Create a new bucket result.
    pub fn new(bucket: Bucket, pixels: Vec<Pixel>) -> Self {
        Self { bucket, pixels }
    }

    /// Copy the bucket's pixels into an image `image_width` pixels wide.
    pub fn store<S: PixelSink + ?Sized>(&self, image_width: u32, target: &mut S) {
        let b = &self.bucket;
        for (i, pixel) in self.pixels.iter().enumerate() {
            let local_y = i as u32 / b.width;
            let local_x = i as u32 % b.width;
            let index = (b.y + local_y) as usize * image_width as usize + (b.x + local_x) as usize;
            target.set_pixel(index, *pixel);
        }
    }
}
