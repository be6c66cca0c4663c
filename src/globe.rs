//! The effect instance.
//!
//! [`GlobeEffect`] bundles everything one globe needs: visual knobs, the
//! ambient clock, the interaction state machine and the touch gate. Instances
//! are independent, so several globes can run side by side.
//!
//! # Example
//!
//! ```ignore
//! use liquid_globe::prelude::*;
//!
//! let mut globe = GlobeEffect::new()
//!     .with_speed(0.5)
//!     .with_visual(VisualParameters { glow: 0.8, ..Default::default() });
//!
//! globe.handle(PointerEvent::Tap(Vec2::new(0.1, -0.05)));
//!
//! // Physics at a fixed 16 ms, clock at the display rate
//! globe.tick(0.016);
//! globe.advance_clock(frame_delta);
//! let params = globe.frame_parameters(canvas_size, image_size);
//! ```

use glam::Vec2;

use crate::ambient::AmbientClock;
use crate::field;
use crate::interaction::{DragPhase, Interaction, PointerEvent, RipplePhase};
use crate::params::{GlobeConfig, Knob, VisualParameters};
use crate::uniforms::{compute_frame_parameters, FrameParameters};

/// One liquid glass globe.
#[derive(Debug, Clone)]
pub struct GlobeEffect {
    visual: VisualParameters,
    clock: AmbientClock,
    interaction: Interaction,
    touch_enabled: bool,
}

impl Default for GlobeEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobeEffect {
    /// A globe with the default configuration.
    pub fn new() -> Self {
        Self::from_config(&GlobeConfig::default())
    }

    /// A globe configured from `config`. Values are clamped to their ranges.
    pub fn from_config(config: &GlobeConfig) -> Self {
        let config = config.validated();
        Self {
            visual: config.visual,
            clock: AmbientClock::new(config.speed, config.animate),
            interaction: Interaction::new(),
            touch_enabled: config.touch_enabled,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.set_knob(Knob::Speed, speed);
        self
    }

    pub fn with_animate(mut self, animate: bool) -> Self {
        self.clock.set_animate(animate);
        self
    }

    pub fn with_touch(mut self, enabled: bool) -> Self {
        self.touch_enabled = enabled;
        self
    }

    pub fn with_visual(mut self, visual: VisualParameters) -> Self {
        self.visual = visual.validated();
        self
    }

    /// Current settings as a storable configuration.
    pub fn config(&self) -> GlobeConfig {
        GlobeConfig {
            speed: self.clock.speed(),
            animate: self.clock.is_animating(),
            touch_enabled: self.touch_enabled,
            visual: self.visual,
        }
    }

    #[inline]
    pub fn visual(&self) -> &VisualParameters {
        &self.visual
    }

    pub fn visual_mut(&mut self) -> &mut VisualParameters {
        &mut self.visual
    }

    #[inline]
    pub fn clock(&self) -> &AmbientClock {
        &self.clock
    }

    #[inline]
    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Set any numeric knob, clamped to its range.
    pub fn set_knob(&mut self, knob: Knob, value: f32) {
        match knob {
            Knob::Speed if value.is_finite() => self.clock.set_speed(knob.clamp(value)),
            Knob::Speed => {}
            _ => self.visual.set(knob, value),
        }
    }

    pub fn knob(&self, knob: Knob) -> f32 {
        match knob {
            Knob::Speed => self.clock.speed(),
            _ => self.visual.get(knob).unwrap_or_default(),
        }
    }

    pub fn set_animate(&mut self, animate: bool) {
        self.clock.set_animate(animate);
    }

    pub fn is_animating(&self) -> bool {
        self.clock.is_animating()
    }

    pub fn set_refraction(&mut self, enabled: bool) {
        self.visual.refraction = enabled;
    }

    /// Enable or disable pointer input. Disabling does not cut short an
    /// episode already in progress, except that a held drag is released.
    pub fn set_touch_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.interaction.on_drag_cancel();
        }
        self.touch_enabled = enabled;
    }

    pub fn touch_enabled(&self) -> bool {
        self.touch_enabled
    }

    /// Forward a pointer event unless touch is disabled.
    pub fn handle(&mut self, event: PointerEvent) {
        if !self.touch_enabled {
            log::trace!("touch disabled, ignoring {:?}", event);
            return;
        }
        self.interaction.handle(event);
    }

    pub fn on_tap(&mut self, point: Vec2) {
        self.handle(PointerEvent::Tap(point));
    }

    pub fn on_drag_start(&mut self, point: Vec2) {
        self.handle(PointerEvent::DragStart(point));
    }

    pub fn on_drag_move(&mut self, delta: Vec2) {
        self.handle(PointerEvent::DragMove(delta));
    }

    pub fn on_drag_end(&mut self) {
        self.handle(PointerEvent::DragEnd);
    }

    pub fn on_drag_cancel(&mut self) {
        self.handle(PointerEvent::DragCancel);
    }

    /// Advance the physics by one step of `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.interaction.tick(dt);
    }

    /// Advance the ambient clock by `dt` seconds of wall time.
    pub fn advance_clock(&mut self, dt: f32) {
        self.clock.advance(dt);
    }

    pub fn ripple_phase(&self) -> RipplePhase {
        self.interaction.ripple_phase()
    }

    pub fn drag_phase(&self) -> DragPhase {
        self.interaction.drag_phase()
    }

    /// Parameters for the frame about to be drawn.
    pub fn frame_parameters(&self, canvas: Vec2, image: Vec2) -> FrameParameters {
        compute_frame_parameters(
            &self.visual,
            &self.clock,
            &self.interaction.snapshot(),
            canvas,
            image,
        )
    }

    /// Total displacement at `position` for the current state.
    pub fn displacement_at(&self, position: Vec2) -> Vec2 {
        field::displacement_at(&self.frame_parameters(Vec2::ONE, Vec2::ONE), position)
    }

    /// Restore the default knobs, re-enable animation and touch, clear both
    /// episodes and rewind the clock.
    pub fn reset(&mut self) {
        log::debug!("globe reset");
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_gate() {
        let mut globe = GlobeEffect::new().with_touch(false);
        globe.on_tap(Vec2::ZERO);
        assert_eq!(globe.ripple_phase(), RipplePhase::Idle);

        globe.set_touch_enabled(true);
        globe.on_tap(Vec2::ZERO);
        assert_eq!(globe.ripple_phase(), RipplePhase::Impact);
    }

    #[test]
    fn test_disabling_touch_releases_drag() {
        let mut globe = GlobeEffect::new();
        globe.on_drag_start(Vec2::ZERO);
        globe.on_drag_move(Vec2::new(0.1, 0.0));
        globe.set_touch_enabled(false);
        assert_eq!(globe.drag_phase(), DragPhase::Returning);
    }

    #[test]
    fn test_knobs_clamp() {
        let mut globe = GlobeEffect::new();
        globe.set_knob(Knob::Speed, 10.0);
        assert_eq!(globe.knob(Knob::Speed), 2.0);
        globe.set_knob(Knob::Lens, -1.0);
        assert_eq!(globe.knob(Knob::Lens), 0.0);
    }

    #[test]
    fn test_config_round_trip() {
        let globe = GlobeEffect::new().with_speed(1.0).with_animate(false);
        let config = globe.config();
        let rebuilt = GlobeEffect::from_config(&config);
        assert_eq!(rebuilt.config(), config);
    }

    #[test]
    fn test_reset() {
        let mut globe = GlobeEffect::new().with_touch(false).with_speed(1.5);
        globe.set_animate(false);
        globe.advance_clock(3.0);
        globe.reset();
        assert_eq!(globe.config(), GlobeConfig::default());
        assert_eq!(globe.clock().time(), 0.0);
    }
}
