//! CPU evaluation of the aggregate displacement field.
//!
//! [`displacement_at`] sums exactly what the fragment shader sums: the
//! ambient flow (while the animation time is non-zero), the live ripple and
//! the drag field. It is used for tests, the headless map export and any host
//! that wants to distort coordinates without a GPU.
//!
//! [`DisplacementMap`] evaluates the field over a pixel grid in parallel.

use glam::Vec2;
use rayon::prelude::*;

use crate::ambient::ambient_flow;
use crate::drag::{drag_displacement, FIELD_EPSILON};
use crate::ripple::ripple_displacement;
use crate::uniforms::FrameParameters;

/// Total displacement at `position` (offset from the globe centre).
pub fn displacement_at(params: &FrameParameters, position: Vec2) -> Vec2 {
    let mut deformation = Vec2::ZERO;

    if params.time > 0.0 {
        deformation += ambient_flow(
            position,
            params.time,
            params.field_speed(),
            params.visual.strength,
        );
    }

    if params.ripple_active {
        deformation += ripple_displacement(
            position,
            params.ripple_origin,
            params.ripple_age,
            params.ripple_intensity,
        );
    }

    if params.drag_offset.length() > FIELD_EPSILON {
        deformation += drag_displacement(
            position,
            params.drag_offset,
            params.drag_active,
            params.drag_origin,
        );
    }

    deformation
}

/// Map a pixel centre to a position relative to the globe centre.
#[inline]
pub fn pixel_to_position(x: u32, y: u32, width: u32, height: u32) -> Vec2 {
    Vec2::new(
        (x as f32 + 0.5) / width.max(1) as f32 - 0.5,
        (y as f32 + 0.5) / height.max(1) as f32 - 0.5,
    )
}

/// Displacement sampled on a `width` x `height` grid, row-major.
#[derive(Debug, Clone)]
pub struct DisplacementMap {
    pub width: u32,
    pub height: u32,
    pub data: Vec<Vec2>,
}

impl DisplacementMap {
    /// Evaluate `params` at every pixel centre.
    pub fn compute(params: &FrameParameters, width: u32, height: u32) -> Self {
        let data = (0..width as usize * height as usize)
            .into_par_iter()
            .map(|i| {
                let x = (i % width as usize) as u32;
                let y = (i / width as usize) as u32;
                displacement_at(params, pixel_to_position(x, y, width, height))
            })
            .collect();

        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<Vec2> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Largest displacement magnitude in the map.
    pub fn max_magnitude(&self) -> f32 {
        self.data
            .par_iter()
            .map(|d| d.length())
            .reduce(|| 0.0, f32::max)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::DragEpisode;
    use crate::ripple::RippleEpisode;

    #[test]
    fn test_still_frame_has_no_displacement() {
        let params = FrameParameters::default();
        assert_eq!(displacement_at(&params, Vec2::new(0.1, 0.2)), Vec2::ZERO);
    }

    #[test]
    fn test_ambient_only_when_time_positive() {
        let mut params = FrameParameters::default();
        let p = Vec2::new(0.2, -0.1);
        assert_eq!(displacement_at(&params, p), Vec2::ZERO);
        params.time = 1.3;
        assert_ne!(displacement_at(&params, p), Vec2::ZERO);
    }

    #[test]
    fn test_sums_components() {
        let ripple = RippleEpisode {
            active: true,
            origin: Vec2::new(0.05, 0.0),
            age: 0.4,
            intensity: 1.0,
        };
        let mut drag = DragEpisode::start(Vec2::new(-0.1, 0.0));
        drag.drag_by(Vec2::new(0.05, 0.02));

        let params = FrameParameters {
            ripple_active: true,
            ripple_origin: ripple.origin,
            ripple_age: ripple.age,
            ripple_intensity: ripple.intensity,
            drag_active: true,
            drag_offset: drag.offset,
            drag_origin: drag.origin,
            ..Default::default()
        };

        let p = Vec2::new(-0.06, 0.02);
        let expected = ripple.displacement_at(p) + drag.displacement_at(p);
        assert!((displacement_at(&params, p) - expected).length() < 1e-6);
    }

    #[test]
    fn test_map_dimensions_and_lookup() {
        let params = FrameParameters {
            time: 2.0,
            ..Default::default()
        };
        let map = DisplacementMap::compute(&params, 16, 8);
        assert_eq!(map.data.len(), 128);
        assert!(map.get(15, 7).is_some());
        assert!(map.get(16, 0).is_none());
        assert!(map.max_magnitude() > 0.0);
    }

    #[test]
    fn test_pixel_to_position_centre() {
        let p = pixel_to_position(50, 50, 101, 101);
        assert!(p.length() < 1e-6);
        // Zero-size grid does not divide by zero
        assert!(pixel_to_position(0, 0, 0, 0).is_finite());
    }
}
