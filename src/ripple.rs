//! Tap ripples ("water drop").
//!
//! A [`RippleEpisode`] is created by a tap and lives for
//! [`RIPPLE_LIFETIME`] seconds. Its intensity follows [`ripple_envelope`]:
//!
//! ```text
//!  1.0 ┤   ╭╮╭──~~──~~──╮
//!      │  ╱  ╰           ╲
//!      │ ╱                ╲
//!  0.0 ┼╯                  ╰──
//!      0  0.3           1.2  2.0  age (s)
//!     impact   rippling   decay
//! ```
//!
//! The displacement it produces is computed by [`ripple_displacement`], a sum
//! of a crown splash, five propagating wave fronts and a small inward pull at
//! the impact point.

use glam::Vec2;
use std::f32::consts::PI;

use crate::noise::{gaussian, rotate, safe_normalize, smoothstep, value_noise};

/// Seconds a ripple stays alive.
pub const RIPPLE_LIFETIME: f32 = 2.0;

/// End of the impact phase.
pub const IMPACT_END: f32 = 0.3;

/// End of the rippling phase, start of the quadratic decay.
pub const DECAY_START: f32 = 1.2;

const RAMP_DURATION: f32 = 0.2;
const OVERSHOOT_START: f32 = 0.15;
const OVERSHOOT_AMPLITUDE: f32 = 0.1;
const FLUTTER_AMPLITUDE: f32 = 0.05;
const WAVE_FRONTS: usize = 5;
const WAVE_SPEED: f32 = 1.5;

/// Intensity of a ripple at `age` seconds.
///
/// Continuous everywhere on `[0, RIPPLE_LIFETIME]`: the overshoot and the
/// flutter are half-sine lobes that vanish at their phase boundaries.
pub fn ripple_envelope(age: f32) -> f32 {
    if !(0.0..=RIPPLE_LIFETIME).contains(&age) {
        return 0.0;
    }

    if age < IMPACT_END {
        let mut intensity = (age / RAMP_DURATION).min(1.0);
        if age > OVERSHOOT_START {
            let t = (age - OVERSHOOT_START) / (IMPACT_END - OVERSHOOT_START);
            intensity += OVERSHOOT_AMPLITUDE * (PI * t).sin();
        }
        intensity
    } else if age < DECAY_START {
        let t = (age - IMPACT_END) / (DECAY_START - IMPACT_END);
        1.0 + FLUTTER_AMPLITUDE * (3.0 * PI * t).sin()
    } else {
        let progress = (age - DECAY_START) / (RIPPLE_LIFETIME - DECAY_START);
        (1.0 - progress * progress).max(0.0)
    }
}

/// A single live tap ripple.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RippleEpisode {
    pub active: bool,
    /// Impact point in normalized coordinates.
    pub origin: Vec2,
    /// Seconds since the tap.
    pub age: f32,
    pub intensity: f32,
}

impl RippleEpisode {
    /// A fresh episode at `origin`, replacing whatever was there.
    pub fn start(origin: Vec2) -> Self {
        Self {
            active: true,
            origin,
            age: 0.0,
            intensity: ripple_envelope(0.0),
        }
    }

    /// Advance by `dt` seconds. Returns `true` on the tick the episode ends.
    pub fn advance(&mut self, dt: f32) -> bool {
        if !self.active {
            return false;
        }
        self.age += dt;
        if self.age > RIPPLE_LIFETIME {
            self.active = false;
            self.intensity = 0.0;
            return true;
        }
        self.intensity = ripple_envelope(self.age);
        false
    }

    /// Displacement this episode contributes at `position`.
    pub fn displacement_at(&self, position: Vec2) -> Vec2 {
        if !self.active {
            return Vec2::ZERO;
        }
        ripple_displacement(position, self.origin, self.age, self.intensity)
    }
}

/// Ripple displacement field.
///
/// Returns zero once `intensity <= 0`. The splash and ripple weights are
/// themselves scaled by `intensity`, and the summed result is scaled again.
pub fn ripple_displacement(position: Vec2, origin: Vec2, age: f32, intensity: f32) -> Vec2 {
    if intensity <= 0.0 {
        return Vec2::ZERO;
    }

    let delta = position - origin;
    let dist = delta.length();
    let dir = safe_normalize(delta);

    let splash = (1.0 - smoothstep(0.0, IMPACT_END, age)) * intensity;
    let rippling = smoothstep(0.1, 0.2, age) * intensity;

    let mut displacement = Vec2::ZERO;

    // Crown splash
    if splash > 0.01 {
        let crown_radius = 0.05 + age * 0.2;
        let crown_width = 0.02 + age * 0.05;
        let crown = gaussian(dist - crown_radius, crown_width) / crown_width * splash;
        displacement += dir * crown * 0.08 * (-age * 5.0).exp();

        let column = (-dist * 30.0).exp() * (age * 20.0).sin() * (-age * 3.0).exp() * 0.1;
        displacement += Vec2::new(0.0, -1.0) * column * splash;
    }

    // Propagating wave fronts
    if rippling > 0.01 {
        let mut ripple = 0.0;
        for i in 0..WAVE_FRONTS {
            let fi = i as f32;
            let speed = WAVE_SPEED * (1.0 - fi * 0.05);
            let radius = (age - 0.1) * speed - fi * 0.2;
            if radius > 0.0 {
                let width = 0.01 + radius * 0.07;
                let shape = gaussian(dist - radius, width);
                let amplitude = (-radius * 1.5).exp() * (1.0 - fi * 0.15);
                let oscillation = (dist * 50.0 - age * 15.0).sin() * 0.1;
                ripple += shape * amplitude * (1.0 + oscillation);
            }
        }

        let perturbation = value_noise(position * 60.0 + Vec2::splat(age * 0.5)) * 0.4;
        let direction = rotate(dir, perturbation);
        displacement += direction * ripple * 0.05 * rippling;
    }

    // Centre restoration
    let restoration = (-dist * 15.0).exp() * (-age * 2.0).exp() * 0.02;
    displacement -= dir * restoration;

    displacement * intensity
}
