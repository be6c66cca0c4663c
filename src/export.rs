//! Headless export of the displacement field.
//!
//! The map is written as an 8-bit RGB PNG: red and green carry the x and y
//! displacement, mid-grey (128) means no displacement, and blue carries the
//! magnitude. Values are scaled by the map's own maximum so even the faint
//! ambient flow is visible.

use image::{ImageBuffer, Rgb, RgbImage};
use std::path::Path;

use crate::error::ExportError;
use crate::field::DisplacementMap;

/// Encode `map` as an image.
pub fn displacement_image(map: &DisplacementMap) -> Result<RgbImage, ExportError> {
    if map.is_empty() || map.width == 0 || map.height == 0 {
        return Err(ExportError::EmptyMap);
    }

    let max = map.max_magnitude();
    let scale = if max > 0.0 { 1.0 / max } else { 0.0 };

    let img = ImageBuffer::from_fn(map.width, map.height, |x, y| {
        let d = map.get(x, y).unwrap_or_default() * scale;
        let to_byte = |v: f32| ((v * 0.5 + 0.5).clamp(0.0, 1.0) * 255.0).round() as u8;
        let magnitude = (d.length().clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgb([to_byte(d.x), to_byte(d.y), magnitude])
    });

    Ok(img)
}

/// Write `map` to `path` as a PNG.
pub fn export_displacement_png(map: &DisplacementMap, path: &Path) -> Result<(), ExportError> {
    let img = displacement_image(map)?;
    img.save(path)?;
    log::info!(
        "exported {}x{} displacement map to {}",
        map.width,
        map.height,
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uniforms::FrameParameters;
    use glam::Vec2;

    #[test]
    fn test_still_frame_is_mid_grey() {
        let map = DisplacementMap::compute(&FrameParameters::default(), 8, 8);
        let img = displacement_image(&map).expect("encode");
        assert!(img.pixels().all(|p| p.0 == [128, 128, 0]));
    }

    #[test]
    fn test_empty_map_is_rejected() {
        let map = DisplacementMap {
            width: 0,
            height: 0,
            data: Vec::new(),
        };
        assert!(matches!(displacement_image(&map), Err(ExportError::EmptyMap)));
    }

    #[test]
    fn test_drag_shows_up() {
        let params = FrameParameters {
            drag_active: true,
            drag_offset: Vec2::new(0.1, 0.0),
            ..Default::default()
        };
        let map = DisplacementMap::compute(&params, 32, 32);
        let img = displacement_image(&map).expect("encode");
        assert!(img.pixels().any(|p| p.0[2] > 200));
    }

    #[test]
    fn test_export_writes_png() {
        let params = FrameParameters {
            time: 1.0,
            ..Default::default()
        };
        let map = DisplacementMap::compute(&params, 16, 16);
        let path = std::env::temp_dir().join("liquid_globe_export_test.png");
        export_displacement_png(&map, &path).expect("export");
        let decoded = image::open(&path).expect("decode").into_rgb8();
        let _ = std::fs::remove_file(&path);
        assert_eq!(decoded.dimensions(), (16, 16));
    }
}
