//! Seeded random streams and sampling helpers.
//!
//! Rendering draws from two independent streams: the ray stream for
//! sub-pixel jitter and the material stream for scattering. Each bucket owns
//! its own pair, seeded from the configured seeds and the bucket index, so
//! the image does not depend on how buckets are spread over threads.

use lumen_math::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Generate a random f64 in [0.0, 1.0)
pub fn random_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen()
}

/// Generate a random f64 in [min, max)
pub fn random_f64_range(rng: &mut dyn RngCore, min: f64, max: f64) -> f64 {
    min + (max - min) * random_f64(rng)
}

/// Random vector with components drawn in x, y, z order from [min, max).
pub fn random_vec3_range(rng: &mut dyn RngCore, min: f64, max: f64) -> Vec3 {
    let x = random_f64_range(rng, min, max);
    let y = random_f64_range(rng, min, max);
    let z = random_f64_range(rng, min, max);
    Vec3::new(x, y, z)
}

/// Sub-pixel offset in [-0.5, 0.5)^2, x drawn before y.
pub fn sample_square(rng: &mut dyn RngCore) -> (f64, f64) {
    let x = random_f64_range(rng, -0.5, 0.5);
    let y = random_f64_range(rng, -0.5, 0.5);
    (x, y)
}

/// Widen a configured 32-bit seed without sign extension.
pub fn seed_from_i32(seed: i32) -> u64 {
    seed as u32 as u64
}

/// Mix a base seed with a stream index.
fn derive_seed(base: u64, stream: usize) -> u64 {
    // SplitMix64 finalizer over base + golden-ratio stride
    let mut z = base.wrapping_add((stream as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// The pair of generators used while rendering a run of pixels.
#[derive(Debug, Clone)]
pub struct SampleStreams {
    /// Scattering decisions
    pub material: StdRng,
    /// Sub-pixel jitter
    pub ray: StdRng,
}

impl SampleStreams {
    pub fn new(material_seed: u64, ray_seed: u64) -> Self {
        Self {
            material: StdRng::seed_from_u64(material_seed),
            ray: StdRng::seed_from_u64(ray_seed),
        }
    }

    /// Streams for the bucket with the given index.
    pub fn for_bucket(material_seed: u64, ray_seed: u64, bucket_index: usize) -> Self {
        Self::new(
            derive_seed(material_seed, bucket_index),
            derive_seed(ray_seed, bucket_index),
        )
    }
}
