//! Ambient flow: the idle "liquid" motion of the globe surface.
//!
//! The field is a sum of four terms, all scaled by the `strength` knob:
//!
//! 1. a rotational swirl around the centre whose magnitude breathes slowly,
//! 2. three wave sources orbiting on a ring of radius 0.35, each emitting an
//!    outward-decaying sinusoid,
//! 3. a restoring term pulling the surface toward a radius-0.5 rest shape,
//! 4. a low-amplitude oscillation modulated by position.
//!
//! The clock driving it lives here too. [`AmbientClock`] is advanced by the
//! render loop, not the physics tick.

use glam::Vec2;

use crate::noise::{perp, safe_normalize};

/// Lowest effective clock speed. Keeps the period `2 / speed` finite.
pub const MIN_CLOCK_SPEED: f32 = 0.1;

/// Multiplier turning the `frequency` knob into the field's angular speed.
pub const FREQUENCY_TO_SPEED: f32 = 5.0;

const SOURCE_COUNT: usize = 3;
const SOURCE_RING_RADIUS: f32 = 0.35;
const SOURCE_SPACING: f32 = 2.09;
const WAVE_AMPLITUDE: f32 = 0.03;
const REST_RADIUS: f32 = 0.5;

/// The animation clock feeding the ambient field.
///
/// Time only moves forward. With `animate` off the clock holds its value and
/// [`frame_time`](Self::frame_time) reports zero, which switches the ambient
/// field off entirely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientClock {
    time: f32,
    speed: f32,
    animate: bool,
}

impl Default for AmbientClock {
    fn default() -> Self {
        Self::new(0.26, true)
    }
}

impl AmbientClock {
    pub fn new(speed: f32, animate: bool) -> Self {
        Self {
            time: 0.0,
            speed,
            animate,
        }
    }

    /// Raw accumulated time.
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Configured speed, before flooring.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Speed actually used to advance the clock.
    #[inline]
    pub fn effective_speed(&self) -> f32 {
        if self.speed.is_finite() {
            self.speed.max(MIN_CLOCK_SPEED)
        } else {
            MIN_CLOCK_SPEED
        }
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animate
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn set_animate(&mut self, animate: bool) {
        self.animate = animate;
    }

    /// Advance by `dt` seconds of wall time.
    ///
    /// One unit of clock time passes every `2 / speed` seconds.
    pub fn advance(&mut self, dt: f32) {
        if !self.animate || dt.is_nan() || dt <= 0.0 {
            return;
        }
        self.time += dt * self.effective_speed() / 2.0;
    }

    /// Time to hand to the renderer for this frame.
    #[inline]
    pub fn frame_time(&self) -> f32 {
        if self.animate {
            self.time
        } else {
            0.0
        }
    }

    /// Back to zero. Speed and the animate flag are kept.
    pub fn reset(&mut self) {
        self.time = 0.0;
    }
}

/// Evaluate the ambient flow at `position` (offset from the globe centre).
///
/// `speed` is the field's angular speed, normally `frequency * 5`.
pub fn ambient_flow(position: Vec2, time: f32, speed: f32, strength: f32) -> Vec2 {
    let flow = time * speed;

    let rotational = perp(position) * 0.02 * (0.7 + 0.3 * (flow * 0.5).sin());

    let mut waves = Vec2::ZERO;
    for i in 0..SOURCE_COUNT {
        let angle = flow * 0.2 + i as f32 * SOURCE_SPACING;
        let source = Vec2::new(angle.cos(), angle.sin()) * SOURCE_RING_RADIUS;
        let delta = position - source;
        let dist = delta.length();
        let wave = (dist * 15.0 - flow * 1.5).sin() * (-dist * 5.0).exp();
        waves += safe_normalize(delta) * wave * WAVE_AMPLITUDE;
    }

    let restoring = position * (REST_RADIUS - position.length()) * 0.05;

    let oscillation = Vec2::new(
        (flow * 1.2 + position.y * 3.0).sin(),
        (flow * 1.5 + position.x * 2.0).cos(),
    ) * 0.01;

    (rotational + waves + restoring + oscillation) * strength
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_advances_at_half_speed() {
        let mut clock = AmbientClock::new(1.0, true);
        clock.advance(2.0);
        assert!((clock.time() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_clock_speed_is_floored() {
        let mut clock = AmbientClock::new(0.0, true);
        clock.advance(1.0);
        assert!((clock.time() - MIN_CLOCK_SPEED / 2.0).abs() < 1e-6);

        let mut nan = AmbientClock::new(f32::NAN, true);
        nan.advance(1.0);
        assert!(nan.time().is_finite());
    }

    #[test]
    fn test_clock_paused() {
        let mut clock = AmbientClock::new(1.0, true);
        clock.advance(1.0);
        clock.set_animate(false);
        clock.advance(1.0);
        assert!((clock.time() - 0.5).abs() < 1e-6);
        assert_eq!(clock.frame_time(), 0.0);

        clock.set_animate(true);
        assert!((clock.frame_time() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_clock_ignores_negative_dt() {
        let mut clock = AmbientClock::default();
        clock.advance(-1.0);
        clock.advance(f32::NAN);
        assert_eq!(clock.time(), 0.0);
    }

    #[test]
    fn test_zero_strength_is_zero() {
        let d = ambient_flow(Vec2::new(0.1, -0.2), 3.0, 1.2, 0.0);
        assert_eq!(d, Vec2::ZERO);
    }

    #[test]
    fn test_scales_linearly_with_strength() {
        let p = Vec2::new(0.2, 0.1);
        let a = ambient_flow(p, 1.7, 1.2, 0.05);
        let b = ambient_flow(p, 1.7, 1.2, 0.10);
        assert!((b - a * 2.0).length() < 1e-6);
    }

    #[test]
    fn test_finite_at_wave_source() {
        // Sits exactly on the first wave source at t = 0
        let d = ambient_flow(Vec2::new(SOURCE_RING_RADIUS, 0.0), 0.0, 1.0, 1.0);
        assert!(d.is_finite());
    }

    #[test]
    fn test_stays_small() {
        for i in 0..50 {
            let a = i as f32 * 0.4;
            let p = Vec2::new(a.cos(), a.sin()) * 0.45;
            let d = ambient_flow(p, i as f32 * 0.3, 1.2, 1.0);
            assert!(d.length() < 0.2, "ambient flow too large: {}", d);
        }
    }
}
