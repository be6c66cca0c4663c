//! WGSL versions of the noise helpers and the three displacement fields.
//!
//! Each block mirrors a Rust module constant for constant:
//!
//! | WGSL block       | Rust counterpart |
//! |------------------|------------------|
//! | [`NOISE_WGSL`]   | [`crate::noise`] |
//! | [`AMBIENT_WGSL`] | [`crate::ambient::ambient_flow`] |
//! | [`RIPPLE_WGSL`]  | [`crate::ripple::ripple_displacement`] |
//! | [`DRAG_WGSL`]    | [`crate::drag::drag_displacement`] |
//!
//! # Available Functions
//!
//! ## Noise
//! - `hash21(p: vec2<f32>) -> f32` - pseudo-random value in `[0, 1]`
//! - `value_noise(p: vec2<f32>) -> f32` - smooth lattice noise
//! - `rotate2(v: vec2<f32>, angle: f32) -> vec2<f32>`
//! - `safe_normalize(v: vec2<f32>) -> vec2<f32>` - zero for degenerate input
//! - `gaussian(x: f32, width: f32) -> f32`
//! - `perp(v: vec2<f32>) -> vec2<f32>`
//!
//! ## Fields
//! - `ambient_flow(pos, time, speed, strength) -> vec2<f32>`
//! - `ripple_displacement(pos, origin, age, intensity) -> vec2<f32>`
//! - `drag_displacement(pos, offset, is_dragging, origin) -> vec2<f32>`

/// WGSL code for noise and vector helpers.
pub const NOISE_WGSL: &str = r#"
fn hash21(p: vec2<f32>) -> f32 {
    let h = dot(p, vec2<f32>(127.1, 311.7));
    return fract(sin(h) * 43758.547);
}

fn value_noise(p: vec2<f32>) -> f32 {
    let i = floor(p);
    let f = p - i;
    let u = f * f * (3.0 - 2.0 * f);

    let a = hash21(i);
    let b = hash21(i + vec2<f32>(1.0, 0.0));
    let c = hash21(i + vec2<f32>(0.0, 1.0));
    let d = hash21(i + vec2<f32>(1.0, 1.0));

    return mix(mix(a, b, u.x), mix(c, d, u.x), u.y);
}

fn rotate2(v: vec2<f32>, angle: f32) -> vec2<f32> {
    let s = sin(angle);
    let c = cos(angle);
    return vec2<f32>(v.x * c - v.y * s, v.x * s + v.y * c);
}

fn safe_normalize(v: vec2<f32>) -> vec2<f32> {
    let len = length(v);
    if (len > 0.000001) {
        return v / len;
    }
    return vec2<f32>(0.0, 0.0);
}

fn gaussian(x: f32, width: f32) -> f32 {
    let r = x / width;
    return exp(-r * r);
}

fn perp(v: vec2<f32>) -> vec2<f32> {
    return vec2<f32>(-v.y, v.x);
}
"#;

/// WGSL code for the ambient flow field.
pub const AMBIENT_WGSL: &str = r#"
fn ambient_flow(pos: vec2<f32>, time: f32, speed: f32, strength: f32) -> vec2<f32> {
    let flow = time * speed;

    let rotational = perp(pos) * 0.02 * (0.7 + 0.3 * sin(flow * 0.5));

    var waves = vec2<f32>(0.0, 0.0);
    for (var i = 0; i < 3; i++) {
        let angle = flow * 0.2 + f32(i) * 2.09;
        let source_point = vec2<f32>(cos(angle), sin(angle)) * 0.35;
        let delta = pos - source_point;
        let dist = length(delta);
        let wave = sin(dist * 15.0 - flow * 1.5) * exp(-dist * 5.0);
        waves = waves + safe_normalize(delta) * wave * 0.03;
    }

    let restoring = pos * (0.5 - length(pos)) * 0.05;

    let oscillation = vec2<f32>(
        sin(flow * 1.2 + pos.y * 3.0),
        cos(flow * 1.5 + pos.x * 2.0)
    ) * 0.01;

    return (rotational + waves + restoring + oscillation) * strength;
}
"#;

/// WGSL code for the tap ripple field.
pub const RIPPLE_WGSL: &str = r#"
fn ripple_displacement(pos: vec2<f32>, origin: vec2<f32>, age: f32, intensity: f32) -> vec2<f32> {
    if (intensity <= 0.0) {
        return vec2<f32>(0.0, 0.0);
    }

    let delta = pos - origin;
    let dist = length(delta);
    let dir = safe_normalize(delta);

    let splash = (1.0 - smoothstep(0.0, 0.3, age)) * intensity;
    let rippling = smoothstep(0.1, 0.2, age) * intensity;

    var d = vec2<f32>(0.0, 0.0);

    // Crown splash
    if (splash > 0.01) {
        let crown_radius = 0.05 + age * 0.2;
        let crown_width = 0.02 + age * 0.05;
        let crown = gaussian(dist - crown_radius, crown_width) / crown_width * splash;
        d = d + dir * crown * 0.08 * exp(-age * 5.0);

        let column = exp(-dist * 30.0) * sin(age * 20.0) * exp(-age * 3.0) * 0.1;
        d = d + vec2<f32>(0.0, -1.0) * column * splash;
    }

    // Propagating wave fronts
    if (rippling > 0.01) {
        var ripple = 0.0;
        for (var i = 0; i < 5; i++) {
            let fi = f32(i);
            let wave_speed = 1.5 * (1.0 - fi * 0.05);
            let radius = (age - 0.1) * wave_speed - fi * 0.2;
            if (radius > 0.0) {
                let width = 0.01 + radius * 0.07;
                let shape = gaussian(dist - radius, width);
                let amplitude = exp(-radius * 1.5) * (1.0 - fi * 0.15);
                let oscillation = sin(dist * 50.0 - age * 15.0) * 0.1;
                ripple = ripple + shape * amplitude * (1.0 + oscillation);
            }
        }

        let perturbation = value_noise(pos * 60.0 + vec2<f32>(age * 0.5)) * 0.4;
        d = d + rotate2(dir, perturbation) * ripple * 0.05 * rippling;
    }

    // Centre restoration
    let restoration = exp(-dist * 15.0) * exp(-age * 2.0) * 0.02;
    d = d - dir * restoration;

    return d * intensity;
}
"#;

/// WGSL code for the drag field, both regimes.
pub const DRAG_WGSL: &str = r#"
const DROPLET_RADIUS: f32 = 0.06;
const INFLUENCE_RADIUS: f32 = 0.12;
const TENSION_FACTOR: f32 = 0.8;

fn drag_active_field(
    pos: vec2<f32>,
    offset: vec2<f32>,
    current: vec2<f32>,
    to_current: vec2<f32>,
    dist_current: f32,
    to_origin: vec2<f32>,
) -> vec2<f32> {
    let origin = current - offset;

    // Droplet core
    let core_weight = pow(1.0 - smoothstep(0.0, DROPLET_RADIUS, dist_current), 1.3);
    let tension = 0.8 + 0.2 * core_weight;
    var d = offset * core_weight * tension;

    // Extended influence ring
    let extended = (1.0 - smoothstep(DROPLET_RADIUS * 0.9, INFLUENCE_RADIUS, dist_current))
        * (1.0 - core_weight);
    d = d + offset * extended * 0.6 * TENSION_FACTOR;

    let drag_len = length(offset);
    let drag_speed = min(drag_len * 10.0, 2.0);
    let drag_dir = safe_normalize(offset);

    // Side bulge
    let bulge_width = 0.06 + 0.04 * drag_speed;
    let bulge_distance = DROPLET_RADIUS * (1.0 + 0.5 * drag_speed);
    let bulge = gaussian(dist_current - bulge_distance, bulge_width) * extended * drag_speed * 0.15;
    let variation = value_noise(pos * 30.0 + current * 8.0) * 0.5 + 0.5;
    d = d + perp(drag_dir) * bulge * variation * TENSION_FACTOR;

    // Leading-edge compression
    let leading = smoothstep(-0.2, 0.7, dot(safe_normalize(to_current), drag_dir));
    let compress = gaussian(dist_current, DROPLET_RADIUS * 0.7) * leading * drag_speed * 0.03;
    d = d + drag_dir * compress;

    // Trail back to the origin
    if (drag_len > DROPLET_RADIUS * 2.0) {
        let projected = dot(to_origin, drag_dir);
        let closest = origin + drag_dir * projected;
        let dist_line = length(pos - closest);

        let trail_width = 0.03 * (1.0 + 0.5 * drag_speed);
        let across = gaussian(dist_line, trail_width);
        let along = smoothstep(-0.01, 0.0, projected)
            * (1.0 - smoothstep(drag_len, drag_len + 0.01, projected));

        var trail = across * along * 0.5 * TENSION_FACTOR;
        trail = trail * (0.7 + 0.3 * value_noise(pos * 25.0 + vec2<f32>(projected)));

        d = d + drag_dir * trail * drag_len * 0.3;
        d = d + safe_normalize(closest - pos) * trail * dist_line * 2.0;
    }

    return d;
}

fn drag_return_field(
    offset: vec2<f32>,
    to_current: vec2<f32>,
    dist_current: f32,
    dist_origin: f32,
    falloff: f32,
) -> vec2<f32> {
    let return_speed = length(offset) * 0.8;

    let near_current = gaussian(dist_current, DROPLET_RADIUS * 1.5);
    let near_origin = gaussian(dist_origin, DROPLET_RADIUS * 1.2);
    let return_factor = (near_current * 0.7 + near_origin * 0.3) * falloff;

    var d = safe_normalize(-offset) * return_speed * return_factor * TENSION_FACTOR;

    let wobble_freq = 20.0 + return_speed * 10.0;
    let phase = (dist_current + dist_origin) * wobble_freq - return_speed * 5.0;
    let jiggle = sin(phase) * exp(-return_speed) * 0.2 * return_factor * return_speed;

    d = d + safe_normalize(to_current) * jiggle;
    d = d + perp(to_current) * jiggle * 0.7;

    return d;
}

fn drag_displacement(pos: vec2<f32>, offset: vec2<f32>, is_dragging: bool, origin: vec2<f32>) -> vec2<f32> {
    let drag_len = length(offset);
    if (drag_len < 0.001) {
        return vec2<f32>(0.0, 0.0);
    }

    let current = origin + offset;
    let to_current = pos - current;
    let dist_current = length(to_current);
    let to_origin = pos - origin;
    let dist_origin = length(to_origin);

    let falloff = 1.0 - smoothstep(0.0, INFLUENCE_RADIUS * 1.5, dist_current);

    var d = vec2<f32>(0.0, 0.0);
    if (is_dragging) {
        d = drag_active_field(pos, offset, current, to_current, dist_current, to_origin);
    } else {
        d = drag_return_field(offset, to_current, dist_current, dist_origin, falloff);
    }

    return d * falloff;
}
"#;

/// Get all field helpers combined.
pub fn all_fields_wgsl() -> String {
    format!(
        "// Displacement fields\n{}\n{}\n{}\n{}\n",
        NOISE_WGSL, AMBIENT_WGSL, RIPPLE_WGSL, DRAG_WGSL
    )
}
