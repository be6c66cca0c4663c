//! Deterministic noise and small vector helpers shared by every field.
//!
//! All functions are pure and allocation-free so they can be evaluated per
//! pixel. The WGSL counterparts in [`crate::shader_utils::NOISE_WGSL`] use the
//! same constants, so CPU and GPU evaluation agree up to float precision.
//!
//! ## Available Functions
//!
//! - `hash(p) -> f32` - pseudo-random value in `[0, 1]` for a 2D point
//! - `value_noise(p) -> f32` - smoothly interpolated lattice noise in `[0, 1)`
//! - `rotate(v, angle) -> Vec2` - counter-clockwise rotation
//! - `safe_normalize(v) -> Vec2` - unit vector, or zero for degenerate input
//! - `smoothstep(e0, e1, x) -> f32` - Hermite step
//! - `gaussian(x, width) -> f32` - `exp(-(x/width)^2)`

use glam::Vec2;

/// Vectors shorter than this are treated as having no direction.
pub const DIRECTION_EPSILON: f32 = 1e-6;

/// Fractional part, matching the shading-language `fract`.
#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Hash a 2D point to a pseudo-random value in `[0, 1)`.
#[inline]
pub fn hash(p: Vec2) -> f32 {
    let h = p.dot(Vec2::new(127.1, 311.7));
    fract(h.sin() * 43_758.547)
}

/// Value noise: hashes the four surrounding lattice corners and blends them
/// with a cubic fade.
pub fn value_noise(p: Vec2) -> f32 {
    let i = p.floor();
    let f = p - i;
    let u = f * f * (Vec2::splat(3.0) - 2.0 * f);

    let a = hash(i);
    let b = hash(i + Vec2::new(1.0, 0.0));
    let c = hash(i + Vec2::new(0.0, 1.0));
    let d = hash(i + Vec2::new(1.0, 1.0));

    lerp(lerp(a, b, u.x), lerp(c, d, u.x), u.y)
}

/// Rotate `v` counter-clockwise by `angle` radians.
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

/// Normalize `v`, returning zero instead of NaN for (near) zero-length input.
#[inline]
pub fn safe_normalize(v: Vec2) -> Vec2 {
    let len = v.length();
    if len > DIRECTION_EPSILON {
        v / len
    } else {
        Vec2::ZERO
    }
}

/// Hermite smoothstep. Reversed edges (`e0 > e1`) give a falling step.
#[inline]
pub fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Gaussian bump `exp(-(x / width)^2)`.
#[inline]
pub fn gaussian(x: f32, width: f32) -> f32 {
    let r = x / width;
    (-r * r).exp()
}

#[inline]
pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Perpendicular vector (rotated +90 degrees).
#[inline]
pub fn perp(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}
