//! Image file output.
//!
//! - Plain-text PPM (`P3`): header, then one `r g b` line per pixel
//! - PNG through the `image` crate
//!
//! Both read the framebuffer through [`PixelSource`], so either layout can
//! be written.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::RgbImage;
use rayon::prelude::*;
use thiserror::Error;

use crate::framebuffer::PixelSource;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Framebuffer holds {actual} pixels, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Write `image` as a P3 PPM.
///
/// Rows are formatted in parallel and written in order.
pub fn write_ppm<W, S>(mut writer: W, image: &S) -> Result<(), OutputError>
where
    W: Write,
    S: PixelSource + Sync + ?Sized,
{
    let width = image.width() as usize;

    write!(writer, "P3\n{} {}\n255\n", image.width(), image.height())?;

    let rows: Vec<String> = (0..image.height() as usize)
        .into_par_iter()
        .map(|row| {
            let mut line = String::with_capacity(width * 12);
            for col in 0..width {
                let p = image.pixel(row * width + col);
                line.push_str(&format!("{} {} {}\n", p.r, p.g, p.b));
            }
            line
        })
        .collect();

    for row in &rows {
        writer.write_all(row.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Save `image` as a P3 PPM file.
pub fn save_ppm<P, S>(path: P, image: &S) -> Result<(), OutputError>
where
    P: AsRef<Path>,
    S: PixelSource + Sync + ?Sized,
{
    let file = File::create(path.as_ref())?;
    write_ppm(BufWriter::new(file), image)?;
    log::info!("Saved {}", path.as_ref().display());
    Ok(())
}

/// Save `image` as a PNG file.
pub fn save_png<P, S>(path: P, image: &S) -> Result<(), OutputError>
where
    P: AsRef<Path>,
    S: PixelSource + ?Sized,
{
    let bytes = image.to_rgb_bytes();
    let actual = bytes.len() / 3;
    let rgb = RgbImage::from_raw(image.width(), image.height(), bytes).ok_or(
        OutputError::SizeMismatch {
            expected: image.len(),
            actual,
        },
    )?;
    rgb.save(path.as_ref())?;
    log::info!("Saved {}", path.as_ref().display());
    Ok(())
}

/// Save `image`, choosing PNG for a `.png` extension and PPM otherwise.
pub fn save_image<P, S>(path: P, image: &S) -> Result<(), OutputError>
where
    P: AsRef<Path>,
    S: PixelSource + Sync + ?Sized,
{
    let is_png = path
        .as_ref()
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));

    if is_png {
        save_png(path, image)
    } else {
        save_ppm(path, image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::{FramebufferAos, FramebufferSoa, Pixel, PixelSink};

    fn sample_image<S: PixelSink>(mut image: S) -> S {
        image.set_pixel(0, Pixel::new(255, 0, 0));
        image.set_pixel(1, Pixel::new(0, 128, 7));
        image.set_pixel(2, Pixel::new(1, 2, 3));
        image
    }

    #[test]
    fn test_ppm_format() {
        let image = sample_image(FramebufferAos::new(2, 2));
        let mut out = Vec::new();
        write_ppm(&mut out, &image).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "P3\n2 2\n255\n255 0 0\n0 128 7\n1 2 3\n0 0 0\n");
    }

    #[test]
    fn test_ppm_same_for_both_layouts() {
        let aos = sample_image(FramebufferAos::new(3, 2));
        let soa = sample_image(FramebufferSoa::new(3, 2));

        let (mut a, mut b) = (Vec::new(), Vec::new());
        write_ppm(&mut a, &aos).unwrap();
        write_ppm(&mut b, &soa).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_ppm_line_count() {
        let image = FramebufferSoa::new(5, 4);
        let mut out = Vec::new();
        write_ppm(&mut out, &image).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3 + 20);
        assert!(text.ends_with("0 0 0\n"));
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let image = FramebufferAos::new(1, 1);
        let err = save_ppm("definitely/not/here/out.ppm", &image).unwrap_err();
        assert!(matches!(err, OutputError::Io(_)));
    }
}
