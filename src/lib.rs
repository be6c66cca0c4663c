//! # Liquid Globe
//!
//! A circular "liquid glass" lens over an image. The globe flows gently on
//! its own, ripples when tapped and stretches like a droplet when dragged,
//! then springs back with a wobble.
//!
//! The displacement physics runs on the CPU and is fully deterministic. Each
//! frame it is reduced to a small set of [`FrameParameters`] that a fragment
//! shader turns into pixels.
//!
//! ## Quick Start
//!
//! ```ignore
//! use liquid_globe::prelude::*;
//!
//! fn main() -> Result<(), ViewerError> {
//!     Viewer::new()
//!         .with_image(SourceImage::from_file("photo.jpg")?)
//!         .with_config(GlobeConfig::default().with_speed(0.4))
//!         .run()
//! }
//! ```
//!
//! ## Headless Use
//!
//! [`GlobeEffect`] does not need a window. Feed it [`PointerEvent`]s, tick
//! it, and read back either the frame parameters or the displacement at any
//! point:
//!
//! ```ignore
//! let mut globe = GlobeEffect::new();
//! globe.handle(PointerEvent::DragStart(Vec2::ZERO));
//! globe.handle(PointerEvent::DragMove(Vec2::new(0.05, 0.0)));
//! globe.tick(PHYSICS_TICK);
//!
//! let d = globe.displacement_at(Vec2::new(0.02, 0.0));
//! let map = DisplacementMap::compute(&globe.frame_parameters(size, size), 256, 256);
//! ```
//!
//! ## Coordinates
//!
//! Positions are normalized with the origin at the centre of the canvas and
//! a range of roughly `[-0.5, 0.5]` on each axis. The globe's rim sits at a
//! radius of about 0.45.
//!
//! ## Layers
//!
//! | Layer | Module |
//! |-------|--------|
//! | Noise primitives | [`noise`] |
//! | Ambient flow and clock | [`ambient`] |
//! | Tap ripples | [`ripple`] |
//! | Drag droplet and integrator | [`drag`] |
//! | Episode state machine | [`interaction`] |
//! | Knobs and config | [`params`] |
//! | Per-frame parameters | [`uniforms`] |
//! | CPU field evaluation | [`field`] |
//! | Shader source | [`shader`], [`shader_utils`] |
//! | Window and GPU | [`viewer`], [`gpu`] |

pub mod ambient;
pub mod drag;
pub mod error;
pub mod export;
pub mod field;
pub mod globe;
pub mod gpu;
pub mod input;
pub mod interaction;
pub mod noise;
pub mod params;
pub mod ripple;
pub mod shader;
pub mod shader_utils;
pub mod source;
pub mod time;
pub mod uniforms;
pub mod viewer;

pub use bytemuck;
pub use glam::Vec2;

pub use ambient::AmbientClock;
pub use drag::{DragEpisode, PHYSICS_TICK};
pub use error::{ConfigError, ExportError, GpuError, SourceImageError, ViewerError};
pub use export::export_displacement_png;
pub use field::DisplacementMap;
pub use globe::GlobeEffect;
pub use gpu::GlobeRenderer;
pub use input::PointerTracker;
pub use interaction::{DragPhase, Interaction, InteractionSnapshot, PointerEvent, RipplePhase};
pub use params::{GlobeConfig, Knob, VisualParameters};
pub use ripple::RippleEpisode;
pub use source::SourceImage;
pub use time::{FixedStep, FrameTimer};
pub use uniforms::{FrameParameters, GlobeUniforms, UniformValue};
pub use viewer::Viewer;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use liquid_globe::prelude::*;
/// ```
pub mod prelude {
    pub use crate::drag::PHYSICS_TICK;
    pub use crate::error::ViewerError;
    pub use crate::field::DisplacementMap;
    pub use crate::globe::GlobeEffect;
    pub use crate::interaction::{DragPhase, PointerEvent, RipplePhase};
    pub use crate::params::{GlobeConfig, Knob, VisualParameters};
    pub use crate::source::SourceImage;
    pub use crate::uniforms::FrameParameters;
    pub use crate::viewer::Viewer;
    pub use glam::Vec2;
}
