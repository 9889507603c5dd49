//! 8-bit RGB framebuffers.
//!
//! Two layouts with the same pixel contents: [`FramebufferAos`] stores
//! interleaved `r g b` triples, [`FramebufferSoa`] stores one plane per
//! channel. The renderer writes through [`PixelSink`] and image writers read
//! through [`PixelSource`], so neither cares which layout it gets.
//!
//! Pixels are addressed by a linear row-major index: `row * width + col`.

use bytemuck::{Pod, Zeroable};

/// A single 8-bit RGB pixel.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    pub const BLACK: Pixel = Pixel { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Row-major index of (row, col), computed in `usize`.
fn linear_index(width: u32, row: u32, col: u32) -> usize {
    row as usize * width as usize + col as usize
}

/// Write side of a framebuffer.
pub trait PixelSink {
    /// Number of pixels the sink can hold.
    fn pixel_count(&self) -> usize;

    /// Store a pixel at linear row-major `index`.
    fn set_pixel(&mut self, index: usize, pixel: Pixel);
}

/// Read side of a framebuffer.
pub trait PixelSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Pixel at linear row-major `index`.
    fn pixel(&self, index: usize) -> Pixel;

    fn len(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Interleaved RGB bytes in row-major order.
    fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.len() * 3);
        for i in 0..self.len() {
            let p = self.pixel(i);
            bytes.extend_from_slice(&[p.r, p.g, p.b]);
        }
        bytes
    }
}

/// Array-of-structures framebuffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramebufferAos {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl FramebufferAos {
    /// Create a black framebuffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Pixel::BLACK; width as usize * height as usize],
        }
    }

    /// Pixel at (row, col).
    pub fn get(&self, row: u32, col: u32) -> Pixel {
        self.pixels[linear_index(self.width, row, col)]
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Raw interleaved RGB bytes, without copying.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

impl PixelSink for FramebufferAos {
    fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    fn set_pixel(&mut self, index: usize, pixel: Pixel) {
        self.pixels[index] = pixel;
    }
}

impl PixelSource for FramebufferAos {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, index: usize) -> Pixel {
        self.pixels[index]
    }

    fn to_rgb_bytes(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

/// Structure-of-arrays framebuffer: separate red, green and blue planes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramebufferSoa {
    width: u32,
    height: u32,
    r: Vec<u8>,
    g: Vec<u8>,
    b: Vec<u8>,
}

impl FramebufferSoa {
    /// Create a black framebuffer.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            r: vec![0; len],
            g: vec![0; len],
            b: vec![0; len],
        }
    }

    /// Pixel at (row, col).
    pub fn get(&self, row: u32, col: u32) -> Pixel {
        self.pixel(linear_index(self.width, row, col))
    }

    pub fn red(&self) -> &[u8] {
        &self.r
    }

    pub fn green(&self) -> &[u8] {
        &self.g
    }

    pub fn blue(&self) -> &[u8] {
        &self.b
    }
}

impl PixelSink for FramebufferSoa {
    fn pixel_count(&self) -> usize {
        self.r.len()
    }

    fn set_pixel(&mut self, index: usize, pixel: Pixel) {
        self.r[index] = pixel.r;
        self.g[index] = pixel.g;
        self.b[index] = pixel.b;
    }
}

impl PixelSource for FramebufferSoa {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, index: usize) -> Pixel {
        Pixel::new(self.r[index], self.g[index], self.b[index])
    }
}

/// True if both framebuffers have the same size and the same pixels.
pub fn same_pixels<A: PixelSource + ?Sized, B: PixelSource + ?Sized>(a: &A, b: &B) -> bool {
    a.width() == b.width()
        && a.height() == b.height()
        && (0..a.len()).all(|i| a.pixel(i) == b.pixel(i))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_is_three_bytes() {
        assert_eq!(std::mem::size_of::<Pixel>(), 3);
        let pixels = [Pixel::new(1, 2, 3), Pixel::new(4, 5, 6)];
        let bytes: &[u8] = bytemuck::cast_slice(&pixels);
        assert_eq!(bytes, &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_new_framebuffers_are_black() {
        let aos = FramebufferAos::new(4, 3);
        let soa = FramebufferSoa::new(4, 3);

        assert_eq!(aos.len(), 12);
        assert_eq!(soa.len(), 12);
        assert!(aos.pixels().iter().all(|p| *p == Pixel::BLACK));
        assert!(soa.red().iter().chain(soa.green()).chain(soa.blue()).all(|c| *c == 0));
    }

    #[test]
    fn test_set_and_get_row_major() {
        let mut aos = FramebufferAos::new(4, 3);
        let mut soa = FramebufferSoa::new(4, 3);
        let p = Pixel::new(10, 20, 30);

        // row 2, col 1
        aos.set_pixel(2 * 4 + 1, p);
        soa.set_pixel(2 * 4 + 1, p);

        assert_eq!(aos.get(2, 1), p);
        assert_eq!(soa.get(2, 1), p);
        assert_eq!(soa.red()[9], 10);
        assert_eq!(soa.green()[9], 20);
        assert_eq!(soa.blue()[9], 30);
        assert_eq!(&aos.as_bytes()[27..30], &[10, 20, 30]);
    }

    #[test]
    fn test_linear_index_past_u32() {
        assert_eq!(linear_index(4, 2, 1), 9);
        assert_eq!(linear_index(100_000, 50_000, 7), 5_000_000_007);
    }

    #[test]
    fn test_same_pixels_across_layouts() {
        let mut aos = FramebufferAos::new(2, 2);
        let mut soa = FramebufferSoa::new(2, 2);
        for i in 0..4 {
            let p = Pixel::new(i as u8, 2 * i as u8, 3 * i as u8);
            aos.set_pixel(i, p);
            soa.set_pixel(i, p);
        }
        assert!(same_pixels(&aos, &soa));
        assert_eq!(aos.to_rgb_bytes(), soa.to_rgb_bytes());

        soa.set_pixel(3, Pixel::BLACK);
        assert!(!same_pixels(&aos, &soa));
        assert!(!same_pixels(&aos, &FramebufferSoa::new(4, 1)));
    }
}
