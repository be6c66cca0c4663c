//! Elastic drag ("surface-tension drag").
//!
//! A [`DragEpisode`] has two regimes:
//!
//! - **Active**: the pointer is down and drives `offset` directly. The field
//!   models a droplet of radius [`DROPLET_RADIUS`] at `origin + offset`, with
//!   an extended influence ring, side bulges, leading-edge compression and a
//!   thin trail back to the origin.
//! - **Returning**: the pointer is up. `offset` is pulled back to zero by a
//!   progressive spring with speed-dependent damping, plus two small wobble
//!   harmonics. Once both `offset` and `velocity` fall under the settle
//!   thresholds they snap to exactly zero and the episode is over.
//!
//! The integrator ([`DragEpisode::integrate`]) and the field
//! ([`drag_displacement`]) are independent: the first runs on the physics
//! tick, the second per pixel.

use glam::Vec2;
use std::f32::consts::TAU;

use crate::noise::{fract, gaussian, perp, safe_normalize, smoothstep, value_noise};

/// Radius of the droplet core that follows the pointer.
pub const DROPLET_RADIUS: f32 = 0.06;
/// Outer radius of the extended influence ring.
pub const INFLUENCE_RADIUS: f32 = 0.12;
/// How stretchy the surface appears.
pub const TENSION_FACTOR: f32 = 0.8;
/// Offsets shorter than this produce no field at all.
pub const FIELD_EPSILON: f32 = 0.001;

/// Fraction of a pointer move applied to the offset.
pub const FOLLOW_COEFFICIENT: f32 = 0.9;
/// Offset length beyond which resistance kicks in.
pub const TENSION_THRESHOLD: f32 = 0.4;
const TENSION_RESISTANCE: f32 = 2.0;

/// Settle thresholds: below both, offset and velocity snap to zero.
pub const SETTLE_OFFSET: f32 = 0.003;
pub const SETTLE_VELOCITY: f32 = 0.03;

/// Duration of one physics tick, used to turn a move delta into a velocity.
pub const PHYSICS_TICK: f32 = 0.016;

const SPRING_BASE: f32 = 9.0;
const SPRING_PROGRESSIVE: f32 = 8.0;
const DAMPING_BASE: f32 = 2.0;
const DAMPING_SLOW: f32 = 6.0;
const MASS: f32 = 1.2;
const VISCOSITY_BASE: f32 = 6.0;
const VISCOSITY_SPEED: f32 = 12.0;
const WOBBLE_MIN_OFFSET: f32 = 0.01;
/// Largest velocity carried over from the pointer into the return.
pub const MAX_RELEASE_SPEED: f32 = 1.5;

/// One of the two micro-perturbations applied during the return.
#[derive(Debug, Clone, Copy)]
struct Wobble {
    frequency: f32,
    amplitude: f32,
    period: f32,
}

const PRIMARY_WOBBLE: Wobble = Wobble {
    frequency: 12.0,
    amplitude: 0.0025,
    period: 1.0,
};

const SECONDARY_WOBBLE: Wobble = Wobble {
    frequency: 28.0,
    amplitude: 0.001,
    period: 0.5,
};

impl Wobble {
    #[inline]
    fn phase(&self, clock: f32) -> f32 {
        fract(clock / self.period) * TAU
    }
}

/// Apply the non-linear tension clamp to a candidate offset.
///
/// Below [`TENSION_THRESHOLD`] the offset is unchanged. Above it the offset is
/// divided by `1 + 2 * (len - threshold)`, which shrinks it and bounds the
/// result below [`MAX_STRETCH`].
pub fn apply_tension(offset: Vec2) -> Vec2 {
    let len = offset.length();
    if len > TENSION_THRESHOLD {
        offset / (1.0 + TENSION_RESISTANCE * (len - TENSION_THRESHOLD))
    } else {
        offset
    }
}

/// Supremum of `|apply_tension(o)|` as `|o|` grows without bound.
pub const MAX_STRETCH: f32 = 1.0 / TENSION_RESISTANCE;

/// A drag interaction, from pointer-down until the surface has settled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragEpisode {
    /// True only while the pointer is down.
    pub active: bool,
    /// Where the drag started.
    pub origin: Vec2,
    /// Current displacement from `origin`.
    pub offset: Vec2,
    /// Rate of change of `offset`, per second.
    pub velocity: Vec2,
}

impl DragEpisode {
    /// A fresh episode anchored at `origin`.
    pub fn start(origin: Vec2) -> Self {
        Self {
            active: true,
            origin,
            offset: Vec2::ZERO,
            velocity: Vec2::ZERO,
        }
    }

    /// Apply a pointer move. Ignored unless the pointer is down.
    pub fn drag_by(&mut self, delta: Vec2) {
        if !self.active || !delta.is_finite() {
            return;
        }
        let previous = self.offset;
        self.offset = apply_tension(self.offset + delta * FOLLOW_COEFFICIENT);
        self.velocity = (self.offset - previous) / PHYSICS_TICK;
    }

    /// Pointer released or cancelled.
    ///
    /// The outward radial part of the velocity is dropped: the pointer was
    /// holding the stretch, so the return starts from rest along that axis.
    /// What remains is capped at [`MAX_RELEASE_SPEED`].
    pub fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        drop_outward(&mut self.velocity, self.offset);
        self.velocity = self.velocity.clamp_length_max(MAX_RELEASE_SPEED);
    }

    /// Pointer up with some offset or velocity still to settle.
    #[inline]
    pub fn is_returning(&self) -> bool {
        !self.active && (self.offset != Vec2::ZERO || self.velocity != Vec2::ZERO)
    }

    /// Nothing left to simulate or draw.
    #[inline]
    pub fn is_settled(&self) -> bool {
        !self.active && self.offset == Vec2::ZERO && self.velocity == Vec2::ZERO
    }

    /// Point under the droplet centre.
    #[inline]
    pub fn current_point(&self) -> Vec2 {
        self.origin + self.offset
    }

    /// Advance the physics by `dt` seconds.
    ///
    /// `clock` is the simulation time used for the wobble phases. Returns
    /// `true` on the tick the episode settles. While returning, `|offset|`
    /// never exceeds [`MAX_STRETCH`].
    pub fn integrate(&mut self, dt: f32, clock: f32) -> bool {
        if self.active {
            let speed = self.velocity.length();
            self.velocity *= (-dt * (VISCOSITY_BASE + VISCOSITY_SPEED * speed)).exp();
            return false;
        }

        if self.offset == Vec2::ZERO && self.velocity == Vec2::ZERO {
            return false;
        }

        let stretch = self.offset.length();
        let speed = self.velocity.length();
        let spring = -self.offset * (SPRING_BASE + SPRING_PROGRESSIVE * stretch);
        let damping = -self.velocity * (DAMPING_BASE + DAMPING_SLOW * (1.0 - speed.min(1.0)));
        let acceleration = (spring + damping) / MASS;

        // Semi-implicit Euler
        self.velocity += acceleration * dt;
        self.offset += self.velocity * dt;

        let stretch = self.offset.length();
        if stretch > WOBBLE_MIN_OFFSET {
            self.offset += wobble(stretch, clock);
            if self.offset.length() > MAX_STRETCH {
                self.offset = self.offset.clamp_length_max(MAX_STRETCH);
                drop_outward(&mut self.velocity, self.offset);
            }
        } else if stretch < SETTLE_OFFSET && self.velocity.length() < SETTLE_VELOCITY {
            self.offset = Vec2::ZERO;
            self.velocity = Vec2::ZERO;
            return true;
        }
        false
    }

    /// Displacement this episode contributes at `position`.
    pub fn displacement_at(&self, position: Vec2) -> Vec2 {
        drag_displacement(position, self.offset, self.active, self.origin)
    }
}

/// Remove the part of `velocity` pointing away from rest along `offset`.
fn drop_outward(velocity: &mut Vec2, offset: Vec2) {
    let dir = safe_normalize(offset);
    let outward = velocity.dot(dir);
    if outward > 0.0 {
        *velocity -= dir * outward;
    }
}

/// Jitter added to the offset while returning.
fn wobble(stretch: f32, clock: f32) -> Vec2 {
    let p1 = PRIMARY_WOBBLE.phase(clock);
    let p2 = SECONDARY_WOBBLE.phase(clock);
    let a1 = PRIMARY_WOBBLE.amplitude * stretch;
    let a2 = SECONDARY_WOBBLE.amplitude * stretch;

    let x = a1 * (p1 + PRIMARY_WOBBLE.frequency).cos()
        + a2 * (p2 + SECONDARY_WOBBLE.frequency).cos();
    let y = a1 * p1.sin() + a2 * (p2 + SECONDARY_WOBBLE.frequency).sin();

    let decay = 1.0 - (stretch * 5.0).min(1.0);
    Vec2::new(x, y) * decay
}

/// Drag displacement field.
///
/// Returns zero when `|offset| < FIELD_EPSILON`. Both regimes fade out with
/// distance from the current point over `1.5 * INFLUENCE_RADIUS`.
pub fn drag_displacement(position: Vec2, offset: Vec2, active: bool, origin: Vec2) -> Vec2 {
    let drag_len = offset.length();
    if drag_len < FIELD_EPSILON {
        return Vec2::ZERO;
    }

    let current = origin + offset;
    let to_current = position - current;
    let dist_current = to_current.length();
    let to_origin = position - origin;
    let dist_origin = to_origin.length();

    let falloff = 1.0 - smoothstep(0.0, INFLUENCE_RADIUS * 1.5, dist_current);

    let displacement = if active {
        active_field(position, offset, current, to_current, dist_current, to_origin)
    } else {
        return_field(offset, to_current, dist_current, dist_origin, falloff)
    };

    displacement * falloff
}

fn active_field(
    position: Vec2,
    offset: Vec2,
    current: Vec2,
    to_current: Vec2,
    dist_current: f32,
    to_origin: Vec2,
) -> Vec2 {
    let origin = current - offset;

    // Droplet core
    let core = (1.0 - smoothstep(0.0, DROPLET_RADIUS, dist_current)).powf(1.3);
    let surface_tension = 0.8 + 0.2 * core;
    let mut displacement = offset * core * surface_tension;

    // Extended influence ring
    let extended =
        (1.0 - smoothstep(DROPLET_RADIUS * 0.9, INFLUENCE_RADIUS, dist_current)) * (1.0 - core);
    displacement += offset * extended * 0.6 * TENSION_FACTOR;

    let drag_len = offset.length();
    let drag_speed = (drag_len * 10.0).min(2.0);
    let drag_dir = safe_normalize(offset);

    // Side bulge
    let bulge_width = 0.06 + 0.04 * drag_speed;
    let bulge_distance = DROPLET_RADIUS * (1.0 + 0.5 * drag_speed);
    let bulge = gaussian(dist_current - bulge_distance, bulge_width) * extended * drag_speed * 0.15;
    let variation = value_noise(position * 30.0 + current * 8.0) * 0.5 + 0.5;
    displacement += perp(drag_dir) * bulge * variation * TENSION_FACTOR;

    // Leading-edge compression
    let front = smoothstep(-0.2, 0.7, safe_normalize(to_current).dot(drag_dir));
    let compress = gaussian(dist_current, DROPLET_RADIUS * 0.7) * front * drag_speed * 0.03;
    displacement += drag_dir * compress;

    // Trail back to the origin
    if drag_len > DROPLET_RADIUS * 2.0 {
        let projected = to_origin.dot(drag_dir);
        let closest = origin + drag_dir * projected;
        let dist_line = (position - closest).length();

        let trail_width = 0.03 * (1.0 + 0.5 * drag_speed);
        let across = gaussian(dist_line, trail_width);
        let along = smoothstep(-0.01, 0.0, projected)
            * (1.0 - smoothstep(drag_len, drag_len + 0.01, projected));

        let mut trail = across * along * 0.5 * TENSION_FACTOR;
        trail *= 0.7 + 0.3 * value_noise(position * 25.0 + Vec2::splat(projected));

        displacement += drag_dir * trail * drag_len * 0.3;
        displacement += safe_normalize(closest - position) * trail * dist_line * 2.0;
    }

    displacement
}

fn return_field(
    offset: Vec2,
    to_current: Vec2,
    dist_current: f32,
    dist_origin: f32,
    falloff: f32,
) -> Vec2 {
    let return_speed = offset.length() * 0.8;

    let near_current = gaussian(dist_current, DROPLET_RADIUS * 1.5);
    let near_origin = gaussian(dist_origin, DROPLET_RADIUS * 1.2);
    let return_factor = (near_current * 0.7 + near_origin * 0.3) * falloff;

    let mut displacement = safe_normalize(-offset) * return_speed * return_factor * TENSION_FACTOR;

    // Spatial jiggle, fading as the offset shrinks
    let wobble_freq = 20.0 + return_speed * 10.0;
    let phase = (dist_current + dist_origin) * wobble_freq - return_speed * 5.0;
    let jiggle = phase.sin() * (-return_speed).exp() * 0.2 * return_factor * return_speed;

    displacement += safe_normalize(to_current) * jiggle;
    displacement += perp(to_current) * jiggle * 0.7;

    displacement
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tension_below_threshold_is_identity() {
        let o = Vec2::new(0.3, 0.1);
        assert_eq!(apply_tension(o), o);
    }

    #[test]
    fn test_tension_shrinks_and_bounds() {
        for i in 1..200 {
            let len = TENSION_THRESHOLD + i as f32 * 0.05;
            let o = Vec2::new(len, 0.0);
            let clamped = apply_tension(o).length();
            assert!(clamped < len);
            assert!(clamped < MAX_STRETCH);
        }
    }

    #[test]
    fn test_drag_move_follows_pointer() {
        let mut drag = DragEpisode::start(Vec2::ZERO);
        drag.drag_by(Vec2::new(0.1, 0.0));
        assert!((drag.offset - Vec2::new(0.09, 0.0)).length() < 1e-6);
        assert!((drag.velocity.x - 0.09 / PHYSICS_TICK).abs() < 1e-3);
    }

    #[test]
    fn test_move_ignored_when_released() {
        let mut drag = DragEpisode::default();
        drag.drag_by(Vec2::new(0.1, 0.0));
        assert_eq!(drag.offset, Vec2::ZERO);
    }

    #[test]
    fn test_release_drops_outward_velocity() {
        let mut drag = DragEpisode::start(Vec2::ZERO);
        drag.drag_by(Vec2::new(0.1, 0.05));
        drag.release();
        assert!(!drag.active);
        assert!(drag.velocity.dot(drag.offset) <= 1e-6);
        assert!(drag.is_returning());
    }

    #[test]
    fn test_release_caps_sideways_velocity() {
        let mut drag = DragEpisode::start(Vec2::ZERO);
        for _ in 0..5 {
            drag.drag_by(Vec2::new(0.06, 0.0));
            drag.integrate(PHYSICS_TICK, 0.0);
        }
        drag.drag_by(Vec2::new(0.0, 0.15));
        drag.release();
        assert!(drag.velocity.length() <= MAX_RELEASE_SPEED + 1e-5);

        let mut clock = 0.0;
        for _ in 0..1000 {
            clock += PHYSICS_TICK;
            drag.integrate(PHYSICS_TICK, clock);
            assert!(drag.offset.length() <= MAX_STRETCH + 1e-5);
        }
        assert!(drag.is_settled());
    }

    #[test]
    fn test_return_clamps_overstretched_offset() {
        let mut drag = DragEpisode {
            offset: Vec2::new(0.6, 0.0),
            velocity: Vec2::new(0.5, 1.5),
            ..Default::default()
        };
        drag.integrate(PHYSICS_TICK, 0.0);
        assert!(drag.offset.length() <= MAX_STRETCH + 1e-5);
        assert!(drag.velocity.dot(drag.offset) <= 1e-5);
    }

    #[test]
    fn test_viscosity_damps_while_active() {
        let mut drag = DragEpisode::start(Vec2::ZERO);
        drag.drag_by(Vec2::new(0.05, 0.0));
        let before = drag.velocity.length();
        let offset = drag.offset;
        drag.integrate(PHYSICS_TICK, 0.0);
        assert!(drag.velocity.length() < before);
        assert_eq!(drag.offset, offset);
    }

    #[test]
    fn test_settles_to_exact_zero() {
        let mut drag = DragEpisode {
            offset: Vec2::new(0.2, -0.1),
            ..Default::default()
        };
        let mut clock = 0.0;
        for _ in 0..1000 {
            clock += PHYSICS_TICK;
            drag.integrate(PHYSICS_TICK, clock);
        }
        assert!(drag.is_settled());
        assert_eq!(drag.offset, Vec2::ZERO);
        assert_eq!(drag.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_no_field_below_epsilon() {
        let d = drag_displacement(Vec2::ZERO, Vec2::new(0.0005, 0.0), true, Vec2::ZERO);
        assert_eq!(d, Vec2::ZERO);
    }

    #[test]
    fn test_active_field_follows_offset_at_core() {
        let origin = Vec2::new(-0.1, 0.0);
        let offset = Vec2::new(0.05, 0.0);
        let d = drag_displacement(origin + offset, offset, true, origin);
        assert!(d.x > 0.0);
        assert!(d.is_finite());
    }

    #[test]
    fn test_field_is_local() {
        let offset = Vec2::new(0.1, 0.0);
        let far = Vec2::new(-0.4, 0.4);
        assert_eq!(drag_displacement(far, offset, true, Vec2::ZERO), Vec2::ZERO);
        assert_eq!(drag_displacement(far, offset, false, Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_return_field_points_home() {
        let offset = Vec2::new(0.1, 0.0);
        let origin = Vec2::ZERO;
        let d = drag_displacement(origin + offset, offset, false, origin);
        assert!(d.x < 0.0);
    }
}
