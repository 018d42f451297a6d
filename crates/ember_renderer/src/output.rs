//! Image buffer and 8-bit encoding of linear render output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::{Color, RenderResult};
use ember_math::Interval;

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to gamma-corrected 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    const INTENSITY: Interval = Interval::new(0.0, 0.999);
    let encode = |c: f64| (256.0 * INTENSITY.clamp(linear_to_gamma(c))) as u8;
    [encode(color.x), encode(color.y), encode(color.z)]
}

/// Row-major buffer of linear pixel colors, top scanline first.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// Encode every pixel to 8-bit RGB.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|&c| color_to_rgb8(c)).collect()
    }

    /// Write the image as plain-text PPM (P3).
    pub fn write_ppm<W: Write>(&self, mut writer: W) -> RenderResult<()> {
        writeln!(writer, "P3")?;
        writeln!(writer, "{} {}", self.width, self.height)?;
        writeln!(writer, "255")?;

        for color in &self.pixels {
            let [r, g, b] = color_to_rgb8(*color);
            writeln!(writer, "{} {} {}", r, g, b)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Save to disk. `.ppm` is written as plain-text PPM; any other
    /// extension goes through the `image` crate.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> RenderResult<()> {
        let path = path.as_ref();
        let is_ppm = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("ppm"));

        if is_ppm {
            self.write_ppm(BufWriter::new(File::create(path)?))?;
        } else {
            image::save_buffer(path, &self.to_rgb8(), self.width, self.height, image::ColorType::Rgb8)?;
        }

        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 1e-12);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_color_to_rgb8() {
        assert_eq!(color_to_rgb8(Color::ZERO), [0, 0, 0]);
        assert_eq!(color_to_rgb8(Color::ONE), [255, 255, 255]);
        // Out-of-range values clamp instead of wrapping
        assert_eq!(color_to_rgb8(Color::new(4.0, -3.0, 0.25)), [255, 0, 128]);
    }

    #[test]
    fn test_write_ppm() {
        let mut image = ImageBuffer::new(2, 1);
        image.set(0, 0, Color::ONE);
        image.set(1, 0, Color::new(0.25, 0.0, 1.0));

        let mut out = Vec::new();
        image.write_ppm(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "P3\n2 1\n255\n255 255 255\n128 0 255\n");
    }

    #[test]
    fn test_buffer_row_major() {
        let mut image = ImageBuffer::new(3, 2);
        image.set(2, 1, Color::ONE);
        assert_eq!(image.pixels[5], Color::ONE);
        assert_eq!(image.get(2, 1), Color::ONE);
        assert_eq!(image.to_rgb8().len(), 3 * 2 * 3);
    }

    #[test]
    fn test_buffer_extreme_aspect() {
        let mut tall = ImageBuffer::new(1, 70_000);
        tall.set(0, 69_999, Color::ONE);
        assert_eq!(tall.pixels.len(), 70_000);
        assert_eq!(tall.pixels[69_999], Color::ONE);

        let mut wide = ImageBuffer::new(70_000, 2);
        wide.set(69_999, 1, Color::X);
        assert_eq!(wide.get(69_999, 1), Color::X);
        assert_eq!(wide.pixels.last(), Some(&Color::X));
    }
}
