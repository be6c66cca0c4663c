//! Interaction state machine.
//!
//! [`Interaction`] owns at most one [`RippleEpisode`] and one [`DragEpisode`]
//! and advances both on the physics tick. Pointer input arrives either through
//! the `on_*` methods or as [`PointerEvent`]s via [`Interaction::handle`].
//!
//! # Example
//!
//! ```ignore
//! use liquid_globe::interaction::{Interaction, PointerEvent};
//! use glam::Vec2;
//!
//! let mut interaction = Interaction::new();
//! interaction.handle(PointerEvent::DragStart(Vec2::ZERO));
//! interaction.handle(PointerEvent::DragMove(Vec2::new(0.1, 0.0)));
//! interaction.handle(PointerEvent::DragEnd);
//!
//! // Physics runs at a fixed 16 ms step
//! for _ in 0..60 {
//!     interaction.tick(0.016);
//! }
//! let snapshot = interaction.snapshot();
//! ```

use glam::Vec2;

use crate::drag::DragEpisode;
use crate::ripple::{RippleEpisode, DECAY_START, IMPACT_END};

/// Largest step accepted by [`Interaction::tick`]. Longer stalls are clamped.
pub const MAX_TICK: f32 = 0.05;

/// Normalized pointer input, as produced by the host gesture layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Short press and release at a point.
    Tap(Vec2),
    /// Pointer went down and started moving at a point.
    DragStart(Vec2),
    /// Pointer moved by a delta since the previous event.
    DragMove(Vec2),
    /// Pointer released.
    DragEnd,
    /// Gesture aborted by the host. Behaves like a release.
    DragCancel,
}

/// Lifecycle phase of the ripple, derived from its age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RipplePhase {
    Idle,
    Impact,
    Rippling,
    Decaying,
}

/// Lifecycle phase of the drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging,
    Returning,
}

/// Consistent copy of the interaction state for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InteractionSnapshot {
    pub ripple: RippleEpisode,
    pub drag: DragEpisode,
    /// Simulation time at the moment of the snapshot.
    pub sim_time: f32,
}

/// Owns the live ripple and drag episodes.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    ripple: RippleEpisode,
    drag: DragEpisode,
    sim_time: f32,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh ripple at `point`. Any live ripple is replaced.
    pub fn on_tap(&mut self, point: Vec2) {
        if !point.is_finite() {
            return;
        }
        log::debug!("ripple start at ({:.3}, {:.3})", point.x, point.y);
        self.ripple = RippleEpisode::start(point);
    }

    /// Begin a drag anchored at `point`.
    pub fn on_drag_start(&mut self, point: Vec2) {
        if !point.is_finite() {
            return;
        }
        log::debug!("drag start at ({:.3}, {:.3})", point.x, point.y);
        self.drag = DragEpisode::start(point);
    }

    /// Pointer moved by `delta` while down.
    pub fn on_drag_move(&mut self, delta: Vec2) {
        if !self.drag.active {
            log::trace!("drag move without an active drag ignored");
            return;
        }
        self.drag.drag_by(delta);
    }

    pub fn on_drag_end(&mut self) {
        if self.drag.active {
            log::debug!("drag release, offset {:.4}", self.drag.offset.length());
        }
        self.drag.release();
    }

    pub fn on_drag_cancel(&mut self) {
        self.on_drag_end();
    }

    /// Dispatch a [`PointerEvent`] to the matching handler.
    pub fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Tap(point) => self.on_tap(point),
            PointerEvent::DragStart(point) => self.on_drag_start(point),
            PointerEvent::DragMove(delta) => self.on_drag_move(delta),
            PointerEvent::DragEnd => self.on_drag_end(),
            PointerEvent::DragCancel => self.on_drag_cancel(),
        }
    }

    /// Advance both episodes by `dt` seconds, clamped to `[0, MAX_TICK]`.
    pub fn tick(&mut self, dt: f32) {
        let dt = if dt.is_nan() { 0.0 } else { dt.clamp(0.0, MAX_TICK) };
        if dt == 0.0 {
            return;
        }
        self.sim_time += dt;

        if self.ripple.advance(dt) {
            log::debug!("ripple finished");
        }
        if self.drag.integrate(dt, self.sim_time) {
            log::debug!("drag settled");
        }
    }

    /// Clear both episodes and the simulation clock.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn ripple(&self) -> &RippleEpisode {
        &self.ripple
    }

    #[inline]
    pub fn drag(&self) -> &DragEpisode {
        &self.drag
    }

    #[inline]
    pub fn sim_time(&self) -> f32 {
        self.sim_time
    }

    pub fn ripple_phase(&self) -> RipplePhase {
        if !self.ripple.active {
            RipplePhase::Idle
        } else if self.ripple.age < IMPACT_END {
            RipplePhase::Impact
        } else if self.ripple.age < DECAY_START {
            RipplePhase::Rippling
        } else {
            RipplePhase::Decaying
        }
    }

    pub fn drag_phase(&self) -> DragPhase {
        if self.drag.active {
            DragPhase::Dragging
        } else if self.drag.is_returning() {
            DragPhase::Returning
        } else {
            DragPhase::Idle
        }
    }

    /// Copy out the current state for rendering.
    pub fn snapshot(&self) -> InteractionSnapshot {
        InteractionSnapshot {
            ripple: self.ripple,
            drag: self.drag,
            sim_time: self.sim_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tap_phases() {
        let mut interaction = Interaction::new();
        assert_eq!(interaction.ripple_phase(), RipplePhase::Idle);

        interaction.on_tap(Vec2::ZERO);
        assert_eq!(interaction.ripple_phase(), RipplePhase::Impact);

        for _ in 0..25 {
            interaction.tick(0.016);
        }
        assert_eq!(interaction.ripple_phase(), RipplePhase::Rippling);

        for _ in 0..60 {
            interaction.tick(0.016);
        }
        assert_eq!(interaction.ripple_phase(), RipplePhase::Decaying);

        for _ in 0..60 {
            interaction.tick(0.016);
        }
        assert_eq!(interaction.ripple_phase(), RipplePhase::Idle);
    }

    #[test]
    fn test_drag_phases() {
        let mut interaction = Interaction::new();
        interaction.handle(PointerEvent::DragStart(Vec2::ZERO));
        assert_eq!(interaction.drag_phase(), DragPhase::Dragging);

        interaction.handle(PointerEvent::DragMove(Vec2::new(0.1, 0.0)));
        interaction.handle(PointerEvent::DragCancel);
        assert_eq!(interaction.drag_phase(), DragPhase::Returning);

        for _ in 0..500 {
            interaction.tick(0.016);
        }
        assert_eq!(interaction.drag_phase(), DragPhase::Idle);
    }

    #[test]
    fn test_tick_clamps_dt() {
        let mut interaction = Interaction::new();
        interaction.tick(1.0);
        assert!((interaction.sim_time() - MAX_TICK).abs() < 1e-6);
        interaction.tick(-1.0);
        interaction.tick(f32::NAN);
        assert!((interaction.sim_time() - MAX_TICK).abs() < 1e-6);
    }

    #[test]
    fn test_move_without_start_is_ignored() {
        let mut interaction = Interaction::new();
        interaction.on_drag_move(Vec2::new(0.2, 0.2));
        assert_eq!(interaction.drag().offset, Vec2::ZERO);
        assert_eq!(interaction.drag_phase(), DragPhase::Idle);
    }

    #[test]
    fn test_new_drag_discards_previous_return() {
        let mut interaction = Interaction::new();
        interaction.on_drag_start(Vec2::ZERO);
        interaction.on_drag_move(Vec2::new(0.2, 0.0));
        interaction.on_drag_end();
        interaction.tick(0.016);

        interaction.on_drag_start(Vec2::new(0.1, 0.1));
        let drag = interaction.drag();
        assert!(drag.active);
        assert_eq!(drag.origin, Vec2::new(0.1, 0.1));
        assert_eq!(drag.offset, Vec2::ZERO);
        assert_eq!(drag.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut interaction = Interaction::new();
        interaction.on_tap(Vec2::new(0.1, 0.0));
        let snapshot = interaction.snapshot();
        interaction.tick(0.016);
        assert_eq!(snapshot.ripple.age, 0.0);
        assert!(interaction.ripple().age > 0.0);
    }
}
