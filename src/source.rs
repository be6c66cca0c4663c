//! The image seen through the globe.
//!
//! [`SourceImage`] holds tightly packed RGBA8 pixels. It can be loaded from a
//! PNG or JPEG file, wrapped around an existing buffer, or generated
//! procedurally when no file is given.
//!
//! # Example
//!
//! ```ignore
//! let image = match path {
//!     Some(p) => SourceImage::from_file(p)?,
//!     None => SourceImage::checkerboard(512, 64, [235, 235, 240, 255], [40, 60, 110, 255]),
//! };
//! ```

use glam::Vec2;
use std::path::Path;

use crate::error::SourceImageError;

/// RGBA8 pixels of the source image.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Raw RGBA pixel data (width * height * 4 bytes).
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl SourceImage {
    /// Wrap raw RGBA data.
    ///
    /// # Errors
    ///
    /// Fails if either dimension is zero or the buffer length is not
    /// `width * height * 4`.
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Result<Self, SourceImageError> {
        if width == 0 || height == 0 {
            return Err(SourceImageError::Empty);
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(SourceImageError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Load and decode an image file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SourceImageError> {
        let img = image::open(path.as_ref())?.into_rgba8();
        let (width, height) = img.dimensions();
        Self::from_rgba(img.into_raw(), width, height)
    }

    /// Checkerboard pattern, `size` x `size` pixels.
    pub fn checkerboard(size: u32, cell_size: u32, color1: [u8; 4], color2: [u8; 4]) -> Self {
        let size = size.max(1);
        let cell_size = cell_size.max(1);
        let mut data = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let cx = x / cell_size;
                let cy = y / cell_size;
                let color = if (cx + cy) % 2 == 0 { color1 } else { color2 };
                data.extend_from_slice(&color);
            }
        }
        Self {
            data,
            width: size,
            height: size,
        }
    }

    /// Diagonal two-colour gradient with soft stripes, `size` x `size` pixels.
    ///
    /// Gives the refraction and glow something colourful to pick up.
    pub fn stripes(size: u32, start: [u8; 4], end: [u8; 4]) -> Self {
        let size = size.max(1);
        let mut data = Vec::with_capacity((size * size * 4) as usize);
        let span = (2 * (size - 1)).max(1) as f32;
        for y in 0..size {
            for x in 0..size {
                let t = (x + y) as f32 / span;
                let stripe = 0.85 + 0.15 * (t * 40.0).sin();
                for c in 0..4 {
                    let v = start[c] as f32 + (end[c] as f32 - start[c] as f32) * t;
                    let v = if c == 3 { v } else { v * stripe };
                    data.push(v.round().clamp(0.0, 255.0) as u8);
                }
            }
        }
        Self {
            data,
            width: size,
            height: size,
        }
    }

    /// Downscale so neither side exceeds `max_dim`, keeping the aspect ratio.
    pub fn fit_within(self, max_dim: u32) -> Self {
        let max_dim = max_dim.max(1);
        if self.width <= max_dim && self.height <= max_dim {
            return self;
        }
        let scale = max_dim as f32 / self.width.max(self.height) as f32;
        let width = ((self.width as f32 * scale).round() as u32).clamp(1, max_dim);
        let height = ((self.height as f32 * scale).round() as u32).clamp(1, max_dim);

        let Some(buffer) = image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
        else {
            return self;
        };
        let resized =
            image::imageops::resize(&buffer, width, height, image::imageops::FilterType::Triangle);
        log::info!(
            "source image downscaled from {}x{} to {}x{}",
            self.width,
            self.height,
            width,
            height
        );
        Self {
            data: resized.into_raw(),
            width,
            height,
        }
    }

    /// Image size in pixels.
    #[inline]
    pub fn resolution(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// RGBA at a pixel, `None` out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }
}

impl Default for SourceImage {
    fn default() -> Self {
        Self::checkerboard(512, 64, [235, 235, 240, 255], [40, 60, 110, 255])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba_checks_size() {
        assert!(SourceImage::from_rgba(vec![0; 16], 2, 2).is_ok());
        assert!(matches!(
            SourceImage::from_rgba(vec![0; 15], 2, 2),
            Err(SourceImageError::SizeMismatch { expected: 16, actual: 15 })
        ));
        assert!(matches!(
            SourceImage::from_rgba(Vec::new(), 0, 4),
            Err(SourceImageError::Empty)
        ));
    }

    #[test]
    fn test_checkerboard_cells() {
        let img = SourceImage::checkerboard(4, 2, [255; 4], [0, 0, 0, 255]);
        assert_eq!(img.pixel(0, 0), Some([255; 4]));
        assert_eq!(img.pixel(2, 0), Some([0, 0, 0, 255]));
        assert_eq!(img.pixel(2, 2), Some([255; 4]));
        assert_eq!(img.pixel(4, 0), None);
    }

    #[test]
    fn test_stripes_size_and_alpha() {
        let img = SourceImage::stripes(8, [255, 0, 0, 255], [0, 0, 255, 255]);
        assert_eq!(img.data.len(), 8 * 8 * 4);
        assert!(img.data.chunks(4).all(|p| p[3] == 255));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = SourceImage::from_file("/definitely/not/here.png");
        assert!(matches!(result, Err(SourceImageError::Decode(_))));
    }

    #[test]
    fn test_fit_within() {
        let img = SourceImage::checkerboard(64, 8, [255; 4], [0, 0, 0, 255]);
        let small = img.clone().fit_within(16);
        assert_eq!((small.width, small.height), (16, 16));
        assert_eq!(small.data.len(), 16 * 16 * 4);

        let same = img.fit_within(128);
        assert_eq!((same.width, same.height), (64, 64));
    }

    #[test]
    fn test_resolution() {
        let img = SourceImage::default();
        assert_eq!(img.resolution(), Vec2::new(512.0, 512.0));
    }
}
