//! End-to-end scenarios through [`GlobeEffect`], from pointer input to the
//! frame parameters handed to the renderer.

use glam::Vec2;
use liquid_globe::prelude::*;
use liquid_globe::ripple::ripple_envelope;
use liquid_globe::time::FixedStep;

const CANVAS: Vec2 = Vec2::new(800.0, 800.0);
const IMAGE: Vec2 = Vec2::new(1024.0, 768.0);

#[test]
fn test_tap_at_centre() {
    let mut globe = GlobeEffect::new();
    globe.handle(PointerEvent::Tap(Vec2::ZERO));

    let params = globe.frame_parameters(CANVAS, IMAGE);
    assert!(params.ripple_active);
    assert_eq!(params.ripple_intensity, 0.0);
    assert_eq!(params.ripple_origin, Vec2::ZERO);

    assert!((ripple_envelope(0.3) - 1.0).abs() <= 0.1);

    // 126 ticks takes the age just past 2.01 s
    for _ in 0..126 {
        globe.tick(PHYSICS_TICK);
    }
    let params = globe.frame_parameters(CANVAS, IMAGE);
    assert!(!params.ripple_active);
    assert_eq!(params.ripple_intensity, 0.0);
    assert_eq!(params.ripple_age, 0.0);
    assert_eq!(globe.ripple_phase(), RipplePhase::Idle);
}

#[test]
fn test_ripple_intensity_near_one_after_impact() {
    let mut globe = GlobeEffect::new();
    globe.on_tap(Vec2::new(0.1, 0.1));
    // 19 ticks is 0.304 s
    for _ in 0..19 {
        globe.tick(PHYSICS_TICK);
    }
    let params = globe.frame_parameters(CANVAS, IMAGE);
    assert!((params.ripple_intensity - 1.0).abs() <= 0.1);
    assert_eq!(globe.ripple_phase(), RipplePhase::Rippling);
}

#[test]
fn test_drag_release_returns_home() {
    let mut globe = GlobeEffect::new();
    globe.handle(PointerEvent::DragStart(Vec2::ZERO));
    globe.handle(PointerEvent::DragMove(Vec2::new(0.1, 0.0)));

    let held = globe.frame_parameters(CANVAS, IMAGE);
    assert!(held.drag_active);
    assert!((held.drag_offset - Vec2::new(0.09, 0.0)).length() < 1e-6);

    globe.handle(PointerEvent::DragEnd);
    assert_eq!(globe.drag_phase(), DragPhase::Returning);

    let start = globe.interaction().drag().offset.length();
    let mut envelope = start;
    let mut samples = Vec::new();
    for tick in 1..=250 {
        globe.tick(PHYSICS_TICK);
        let len = globe.interaction().drag().offset.length();
        assert!(len <= start + 1e-3, "overshoot to {} at tick {}", len, tick);

        // Compare every 16 ticks so the wobble jitter averages out
        if tick % 16 == 0 {
            assert!(len <= envelope + 1e-4, "grew from {} to {}", envelope, len);
            envelope = len;
            samples.push(len);
        }
        if tick == 125 {
            assert!(len < 0.015, "offset still {} after 2 s", len);
        }
    }

    assert!(samples.len() > 10);
    assert_eq!(globe.drag_phase(), DragPhase::Idle);
    let params = globe.frame_parameters(CANVAS, IMAGE);
    assert_eq!(params.drag_offset, Vec2::ZERO);
    assert!(!params.drag_active);
}

#[test]
fn test_displacement_follows_drag() {
    let mut globe = GlobeEffect::new().with_animate(false);
    globe.on_drag_start(Vec2::new(-0.1, 0.0));
    globe.on_drag_move(Vec2::new(0.08, 0.0));

    let at_droplet = globe.displacement_at(globe.interaction().drag().current_point());
    assert!(at_droplet.x > 0.0);

    let far = globe.displacement_at(Vec2::new(0.4, 0.4));
    assert_eq!(far, Vec2::ZERO);
}

#[test]
fn test_paused_globe_keeps_time_zero() {
    let mut globe = GlobeEffect::new().with_animate(false);
    globe.advance_clock(1.0);
    let params = globe.frame_parameters(CANVAS, IMAGE);
    assert_eq!(params.time, 0.0);
    assert_eq!(globe.displacement_at(Vec2::new(0.1, 0.2)), Vec2::ZERO);

    globe.set_animate(true);
    globe.advance_clock(0.5);
    assert!(globe.frame_parameters(CANVAS, IMAGE).time > 0.0);
}

#[test]
fn test_fixed_step_loop_matches_direct_ticks() {
    let mut direct = GlobeEffect::new();
    let mut looped = GlobeEffect::new();
    for globe in [&mut direct, &mut looped] {
        globe.on_drag_start(Vec2::ZERO);
        globe.on_drag_move(Vec2::new(0.05, 0.02));
        globe.on_drag_end();
    }

    for _ in 0..10 {
        direct.tick(PHYSICS_TICK);
    }

    // Uneven frame deltas summing to a little over ten ticks
    let mut physics = FixedStep::new(PHYSICS_TICK);
    let mut steps = 0;
    for dt in [0.007, 0.031, 0.016, 0.050, 0.020, 0.0375] {
        for step in physics.advance(dt) {
            looped.tick(step);
            steps += 1;
        }
    }
    assert_eq!(steps, 10);
    assert_eq!(direct.interaction().snapshot(), looped.interaction().snapshot());
}

#[test]
fn test_uniforms_carry_frame_values() {
    let mut globe = GlobeEffect::new();
    globe.on_tap(Vec2::new(0.2, -0.1));
    globe.tick(PHYSICS_TICK);
    globe.advance_clock(0.1);

    let params = globe.frame_parameters(CANVAS, IMAGE);
    let uniforms = params.to_uniforms();
    assert_eq!(uniforms.resolution, [800.0, 800.0]);
    assert_eq!(uniforms.image_resolution, [1024.0, 768.0]);
    assert_eq!(uniforms.tap_origin, [0.2, -0.1]);
    assert_eq!(uniforms.tap_active, 1.0);
    assert_eq!(uniforms.time, params.time);

    let names: Vec<&str> = params.named_values().iter().map(|(n, _)| *n).collect();
    assert!(names.contains(&"tapActive"));
    assert!(names.contains(&"dragStartY"));
}

#[test]
fn test_config_drives_new_globe() {
    let config = GlobeConfig::default()
        .with_speed(0.8)
        .with_animate(false)
        .with_touch(false);
    let mut globe = GlobeEffect::from_config(&config);
    assert_eq!(globe.knob(Knob::Speed), 0.8);
    assert!(!globe.is_animating());

    globe.handle(PointerEvent::Tap(Vec2::ZERO));
    assert_eq!(globe.ripple_phase(), RipplePhase::Idle);
}
