//! Frame parameter bridge.
//!
//! Once per frame, [`compute_frame_parameters`] turns the visual knobs, the
//! ambient clock and an [`InteractionSnapshot`] into a [`FrameParameters`]
//! record. That record is the whole contract with the rendering stage. It
//! can be packed into the GPU layout with [`FrameParameters::to_uniforms`] or
//! listed by name with [`FrameParameters::named_values`] for hosts that bind
//! uniforms one at a time.
//!
//! # Example
//!
//! ```ignore
//! let params = compute_frame_parameters(
//!     &visual,
//!     &clock,
//!     &interaction.snapshot(),
//!     Vec2::new(1280.0, 720.0),
//!     Vec2::new(1024.0, 1024.0),
//! );
//! queue.write_buffer(&buffer, 0, bytemuck::bytes_of(&params.to_uniforms()));
//! ```

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::ambient::AmbientClock;
use crate::interaction::InteractionSnapshot;
use crate::params::VisualParameters;

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParameters {
    /// Canvas size in pixels.
    pub resolution: Vec2,
    /// Source image size in pixels.
    pub image_resolution: Vec2,
    /// Ambient animation time. Zero switches the ambient field off.
    pub time: f32,
    pub visual: VisualParameters,

    pub ripple_active: bool,
    pub ripple_origin: Vec2,
    pub ripple_age: f32,
    pub ripple_intensity: f32,

    /// Pointer is down. The offset stays meaningful after release.
    pub drag_active: bool,
    pub drag_offset: Vec2,
    pub drag_origin: Vec2,
}

impl Default for FrameParameters {
    fn default() -> Self {
        Self {
            resolution: Vec2::ONE,
            image_resolution: Vec2::ONE,
            time: 0.0,
            visual: VisualParameters::DEFAULT,
            ripple_active: false,
            ripple_origin: Vec2::ZERO,
            ripple_age: 0.0,
            ripple_intensity: 0.0,
            drag_active: false,
            drag_offset: Vec2::ZERO,
            drag_origin: Vec2::ZERO,
        }
    }
}

/// Assemble the parameters for one frame.
///
/// Pure: reads its inputs and touches nothing else. Ripple values are zeroed
/// when no ripple is live.
pub fn compute_frame_parameters(
    visual: &VisualParameters,
    clock: &AmbientClock,
    snapshot: &InteractionSnapshot,
    canvas: Vec2,
    image: Vec2,
) -> FrameParameters {
    let ripple = &snapshot.ripple;
    let drag = &snapshot.drag;

    let (ripple_origin, ripple_age, ripple_intensity) = if ripple.active {
        (ripple.origin, ripple.age, ripple.intensity)
    } else {
        (Vec2::ZERO, 0.0, 0.0)
    };

    FrameParameters {
        resolution: canvas,
        image_resolution: image,
        time: clock.frame_time(),
        visual: *visual,
        ripple_active: ripple.active,
        ripple_origin,
        ripple_age,
        ripple_intensity,
        drag_active: drag.active,
        drag_offset: drag.offset,
        drag_origin: drag.origin,
    }
}

#[inline]
fn flag(b: bool) -> f32 {
    if b {
        1.0
    } else {
        0.0
    }
}

impl FrameParameters {
    /// Pack into the uniform buffer layout.
    pub fn to_uniforms(&self) -> GlobeUniforms {
        let v = &self.visual;
        GlobeUniforms {
            resolution: self.resolution.to_array(),
            image_resolution: self.image_resolution.to_array(),
            time: self.time,
            strength: v.strength,
            frequency: v.frequency,
            noise: v.noise,
            edge: v.edge,
            glow: v.glow,
            light: v.light,
            lens: v.lens,
            refraction: flag(v.refraction),
            tap_active: flag(self.ripple_active),
            tap_origin: self.ripple_origin.to_array(),
            tap_time: self.ripple_age,
            tap_intensity: self.ripple_intensity,
            drag_active: flag(self.drag_active),
            _pad0: 0.0,
            drag_offset: self.drag_offset.to_array(),
            drag_origin: self.drag_origin.to_array(),
        }
    }

    /// The parameter set as an ordered list of named scalars and vectors.
    pub fn named_values(&self) -> Vec<(&'static str, UniformValue)> {
        let v = &self.visual;
        vec![
            ("iResolution", UniformValue::Vec2(self.resolution)),
            ("iImageResolution", UniformValue::Vec2(self.image_resolution)),
            ("iTime", UniformValue::F32(self.time)),
            ("strength", UniformValue::F32(v.strength)),
            ("frequency", UniformValue::F32(v.frequency)),
            ("noiseAmount", UniformValue::F32(v.noise)),
            ("edgeStrength", UniformValue::F32(v.edge)),
            ("glowStrength", UniformValue::F32(v.glow)),
            ("lightStrength", UniformValue::F32(v.light)),
            ("lensStrength", UniformValue::F32(v.lens)),
            ("refractionEnabled", UniformValue::F32(flag(v.refraction))),
            ("tapActive", UniformValue::F32(flag(self.ripple_active))),
            ("tapX", UniformValue::F32(self.ripple_origin.x)),
            ("tapY", UniformValue::F32(self.ripple_origin.y)),
            ("tapTime", UniformValue::F32(self.ripple_age)),
            ("tapIntensity", UniformValue::F32(self.ripple_intensity)),
            ("dragActive", UniformValue::F32(flag(self.drag_active))),
            ("dragX", UniformValue::F32(self.drag_offset.x)),
            ("dragY", UniformValue::F32(self.drag_offset.y)),
            ("dragStartX", UniformValue::F32(self.drag_origin.x)),
            ("dragStartY", UniformValue::F32(self.drag_origin.y)),
        ]
    }

    /// Field speed derived from the frequency knob.
    #[inline]
    pub fn field_speed(&self) -> f32 {
        self.visual.frequency * crate::ambient::FREQUENCY_TO_SPEED
    }
}

/// Supported uniform value types.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    F32(f32),
    Vec2(Vec2),
}

impl UniformValue {
    /// Flatten to components.
    pub fn components(&self) -> Vec<f32> {
        match self {
            UniformValue::F32(v) => vec![*v],
            UniformValue::Vec2(v) => vec![v.x, v.y],
        }
    }
}

/// GPU layout of [`FrameParameters`]. Matches `struct Globe` in the shader.
///
/// Booleans are passed as `0.0` / `1.0`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GlobeUniforms {
    pub resolution: [f32; 2],       // offset 0
    pub image_resolution: [f32; 2], // offset 8
    pub time: f32,                  // offset 16
    pub strength: f32,              // offset 20
    pub frequency: f32,             // offset 24
    pub noise: f32,                 // offset 28
    pub edge: f32,                  // offset 32
    pub glow: f32,                  // offset 36
    pub light: f32,                 // offset 40
    pub lens: f32,                  // offset 44
    pub refraction: f32,            // offset 48
    pub tap_active: f32,            // offset 52
    pub tap_origin: [f32; 2],       // offset 56
    pub tap_time: f32,              // offset 64
    pub tap_intensity: f32,         // offset 68
    pub drag_active: f32,           // offset 72
    pub _pad0: f32,                 // offset 76
    pub drag_offset: [f32; 2],      // offset 80
    pub drag_origin: [f32; 2],      // offset 88
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::Interaction;

    #[test]
    fn test_uniform_size_and_offsets() {
        assert_eq!(std::mem::size_of::<GlobeUniforms>(), 96);
        assert_eq!(std::mem::offset_of!(GlobeUniforms, tap_origin), 56);
        assert_eq!(std::mem::offset_of!(GlobeUniforms, drag_offset), 80);
        assert_eq!(std::mem::offset_of!(GlobeUniforms, drag_origin), 88);
    }

    #[test]
    fn test_named_values_cover_uniform_layout() {
        let params = FrameParameters {
            resolution: Vec2::new(640.0, 480.0),
            ripple_active: true,
            ripple_origin: Vec2::new(0.1, -0.2),
            drag_offset: Vec2::new(0.05, 0.0),
            ..Default::default()
        };
        let flat: Vec<f32> = params
            .named_values()
            .iter()
            .flat_map(|(_, value)| value.components())
            .collect();

        // Every uniform float except the single padding slot
        let uniform_floats = std::mem::size_of::<GlobeUniforms>() / 4;
        assert_eq!(flat.len(), uniform_floats - 1);

        let uniforms = params.to_uniforms();
        let packed: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&uniforms));
        let without_pad: Vec<f32> = packed
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != std::mem::offset_of!(GlobeUniforms, _pad0) / 4)
            .map(|(_, v)| *v)
            .collect();
        assert_eq!(flat, without_pad);
    }

    #[test]
    fn test_inactive_ripple_is_zeroed() {
        let mut interaction = Interaction::new();
        interaction.on_tap(Vec2::new(0.2, 0.1));
        for _ in 0..200 {
            interaction.tick(0.016);
        }
        let params = compute_frame_parameters(
            &VisualParameters::DEFAULT,
            &AmbientClock::default(),
            &interaction.snapshot(),
            Vec2::new(800.0, 600.0),
            Vec2::new(512.0, 512.0),
        );
        assert!(!params.ripple_active);
        assert_eq!(params.ripple_origin, Vec2::ZERO);
        assert_eq!(params.ripple_intensity, 0.0);
    }

    #[test]
    fn test_paused_clock_sends_zero_time() {
        let mut clock = AmbientClock::new(1.0, true);
        clock.advance(3.0);
        clock.set_animate(false);
        let params = compute_frame_parameters(
            &VisualParameters::DEFAULT,
            &clock,
            &InteractionSnapshot::default(),
            Vec2::ONE,
            Vec2::ONE,
        );
        assert_eq!(params.time, 0.0);
    }

    #[test]
    fn test_named_values_cover_the_set() {
        let params = FrameParameters::default();
        let names: Vec<_> = params.named_values().iter().map(|(n, _)| *n).collect();
        assert_eq!(names.len(), 21);
        assert!(names.contains(&"iTime"));
        assert!(names.contains(&"dragStartY"));
        assert!(names.contains(&"refractionEnabled"));
    }

    #[test]
    fn test_to_uniforms_flags() {
        let params = FrameParameters {
            drag_active: true,
            drag_offset: Vec2::new(0.1, -0.2),
            ..Default::default()
        };
        let u = params.to_uniforms();
        assert_eq!(u.drag_active, 1.0);
        assert_eq!(u.tap_active, 0.0);
        assert_eq!(u.refraction, 1.0);
        assert_eq!(u.drag_offset, [0.1, -0.2]);
        assert_eq!(bytemuck::bytes_of(&u).len(), 96);
    }
}
