//! Render shader for the globe.
//!
//! The module is assembled from three parts:
//!
//! - the `Globe` uniform struct and resource bindings ([`BINDINGS_WGSL`]),
//! - the field helpers from [`crate::shader_utils`],
//! - a fullscreen-triangle vertex stage and the compositing fragment stage
//!   ([`COMPOSITE_WGSL`]).
//!
//! The fragment stage evaluates the aggregate displacement, distorts the
//! sampling coordinates through a lens term, blends in a mirrored and heavily
//! blurred copy of the image near the rim, adds content-coloured glow, rim
//! light and two specular highlights, and clips everything to a smooth
//! circular mask. Output colour is premultiplied by the mask.

use crate::shader_utils::all_fields_wgsl;

/// Uniform struct and bindings. Layout matches [`crate::uniforms::GlobeUniforms`].
pub const BINDINGS_WGSL: &str = r#"
struct Globe {
    resolution: vec2<f32>,
    image_resolution: vec2<f32>,
    time: f32,
    strength: f32,
    frequency: f32,
    noise_amount: f32,
    edge: f32,
    glow: f32,
    light: f32,
    lens: f32,
    refraction: f32,
    tap_active: f32,
    tap_origin: vec2<f32>,
    tap_time: f32,
    tap_intensity: f32,
    drag_active: f32,
    _pad0: f32,
    drag_offset: vec2<f32>,
    drag_origin: vec2<f32>,
};

@group(0) @binding(0) var<uniform> globe: Globe;
@group(0) @binding(1) var source_texture: texture_2d<f32>;
@group(0) @binding(2) var source_sampler: sampler;
"#;

/// Vertex and fragment stages.
pub const COMPOSITE_WGSL: &str = r#"
const BASE_RADIUS: f32 = 0.45;
const LIGHT_ANGLE: f32 = 0.7;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> VertexOutput {
    // Fullscreen triangle, uv (0,0) at the top-left
    let x = f32((vertex_index << 1u) & 2u);
    let y = f32(vertex_index & 2u);
    var out: VertexOutput;
    out.clip_position = vec4<f32>(x * 2.0 - 1.0, 1.0 - y * 2.0, 0.0, 1.0);
    out.uv = vec2<f32>(x, y);
    return out;
}

fn sample_source(uv: vec2<f32>) -> vec4<f32> {
    return textureSampleLevel(source_texture, source_sampler, uv, 0.0);
}

fn total_displacement(pos: vec2<f32>) -> vec2<f32> {
    var deformation = vec2<f32>(0.0, 0.0);

    if (globe.time > 0.0) {
        deformation = deformation + ambient_flow(pos, globe.time, globe.frequency * 5.0, globe.strength);
    }

    if (globe.tap_active > 0.5) {
        deformation = deformation + ripple_displacement(pos, globe.tap_origin, globe.tap_time, globe.tap_intensity);
    }

    if (length(globe.drag_offset) > 0.001) {
        deformation = deformation + drag_displacement(pos, globe.drag_offset, globe.drag_active > 0.5, globe.drag_origin);
    }

    return deformation;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let uv = in.uv;
    let center = vec2<f32>(0.5, 0.5);
    let pos = uv - center;
    let base_dist = length(pos);
    let angle = atan2(pos.y, pos.x);
    let t = globe.time;
    let speed = globe.frequency * 5.0;

    let deformation = total_displacement(pos);
    let deformed = pos + deformation;
    let deformed_dist = length(deformed);

    var radius = BASE_RADIUS;
    if (t > 0.0) {
        radius = radius + 0.01 * sin(t * speed * 0.7);
    }
    let to_edge = deformed_dist - radius;

    let edge_width = 0.04 * globe.edge;
    let outer_edge = 0.01;
    let mask = 1.0 - smoothstep(-0.01, outer_edge, to_edge);
    let refract_gradient = 1.0 - smoothstep(0.0, edge_width * 2.0, abs(to_edge));

    // Lens distortion of the interior
    var distorted_uv = uv;
    if (deformed_dist < radius + edge_width) {
        let dir = safe_normalize(deformed);
        let dist_factor = smoothstep(0.0, radius, deformed_dist / radius);
        let lens_effect = pow(dist_factor, 1.5) * globe.lens * 0.3;
        distorted_uv = uv - dir * lens_effect;
        distorted_uv = distorted_uv + deformation * (0.5 + globe.lens * 0.3);

        if (t > 0.0) {
            let flow_noise = value_noise(pos * 5.0 + t * speed * vec2<f32>(0.3, 0.4));
            distorted_uv = distorted_uv + dir * flow_noise * globe.noise_amount * 0.02 * dist_factor;
        }
    }

    // Mirrored image for rim refraction
    var flipped_uv = vec2<f32>(1.0 - uv.x, uv.y);
    if (base_dist < radius + edge_width && globe.refraction > 0.5) {
        let dir = safe_normalize(pos);
        let bend = smoothstep(0.0, radius, base_dist / radius);
        flipped_uv = flipped_uv + dir * bend * 0.15;
        flipped_uv = flipped_uv + deformation * 0.3;
    }

    let inner_edge_uv = safe_normalize(pos) * (radius - edge_width * 0.5) + center;
    let texel = 1.0 / max(globe.image_resolution, vec2<f32>(1.0, 1.0));

    var color = sample_source(distorted_uv);

    var flipped = vec4<f32>(0.0, 0.0, 0.0, 0.0);
    for (var i = -3; i <= 3; i++) {
        for (var j = -3; j <= 3; j++) {
            let step_uv = vec2<f32>(f32(i), f32(j)) * 4.0 * texel;
            flipped = flipped + sample_source(flipped_uv + step_uv);
        }
    }
    flipped = flipped / 49.0;

    let refraction_strength = select(0.3, 0.8, globe.refraction > 0.5);
    let edge_refraction = refract_gradient * refraction_strength * globe.edge;
    color = mix(color, flipped, vec4<f32>(edge_refraction));

    // Content-coloured glow
    var edge_content = vec4<f32>(0.0, 0.0, 0.0, 0.0);
    for (var i = -2; i <= 2; i++) {
        for (var j = -2; j <= 2; j++) {
            let step_uv = vec2<f32>(f32(i), f32(j)) * 2.0 * texel;
            edge_content = edge_content + sample_source(inner_edge_uv + step_uv);
        }
    }
    edge_content = edge_content / 25.0;

    var glow_color = mix(edge_content.rgb, flipped.rgb, vec3<f32>(0.5));
    let luminance = (glow_color.r + glow_color.g + glow_color.b) / 3.0;
    glow_color = mix(vec3<f32>(luminance), glow_color, vec3<f32>(1.3));
    glow_color = glow_color * 1.5;

    var rgb = color.rgb;

    if (globe.glow > 0.0) {
        let glow_falloff = 1.0 - smoothstep(0.0, edge_width * 2.5, abs(to_edge));
        rgb = mix(rgb, glow_color, vec3<f32>(glow_falloff * globe.glow * 0.5));

        let angle_factor = 0.5 + 0.5 * cos(angle - LIGHT_ANGLE);
        var outer_glow = (1.0 - smoothstep(0.0, outer_edge * 3.0, max(0.0, to_edge)))
            * smoothstep(-outer_edge, 0.0, to_edge);
        outer_glow = outer_glow * (0.7 + 0.3 * angle_factor);
        rgb = rgb + glow_color * outer_glow * globe.glow * 0.7;
    }

    if (globe.light > 0.0) {
        let rim = 1.0 - smoothstep(0.0, 0.03, abs(to_edge - 0.01));
        let rim_color = mix(vec3<f32>(1.0), glow_color * 0.7 + vec3<f32>(0.3), vec3<f32>(0.3));
        rgb = rgb + rim_color * rim * globe.light * 0.8;

        let light_dir = normalize(vec2<f32>(0.5, -0.7));
        let spec_angle = acos(clamp(dot(safe_normalize(pos), light_dir), -1.0, 1.0));
        let specular = pow(max(0.0, 1.0 - abs(spec_angle - 1.5) / 0.5), 8.0);
        rgb = rgb + vec3<f32>(specular * globe.light * 0.6);

        let highlight = pow(max(0.0, 1.0 - abs(base_dist - 0.3) / 0.05), 6.0);
        rgb = rgb + vec3<f32>(highlight * globe.light * 0.4);
    }

    // Thin dark line at the glass edge
    let darkening = (1.0 - smoothstep(0.0, 0.01, abs(to_edge))) * 0.3;
    rgb = rgb * (1.0 - darkening);

    return vec4<f32>(rgb, color.a) * mask;
}
"#;

/// Assemble the complete render shader.
pub fn globe_shader() -> String {
    format!(
        "{}\n{}\n{}\n",
        BINDINGS_WGSL,
        all_fields_wgsl(),
        COMPOSITE_WGSL
    )
}
