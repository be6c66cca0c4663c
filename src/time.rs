//! Frame timing and the fixed physics step.
//!
//! Two clocks drive the globe. The render loop measures variable frame deltas
//! with [`FrameTimer`]; the physics runs at a fixed 16 ms cadence through a
//! [`FixedStep`] accumulator fed with those deltas.
//!
//! # Example
//!
//! ```ignore
//! let mut timer = FrameTimer::new();
//! let mut physics = FixedStep::new(PHYSICS_TICK);
//!
//! // Each redraw:
//! let dt = timer.update();
//! for step in physics.advance(dt) {
//!     globe.tick(step);
//! }
//! globe.advance_clock(dt);
//! ```

use std::time::{Duration, Instant};

/// Default cap on physics steps per frame. Excess time is dropped.
pub const MAX_STEPS_PER_FRAME: u32 = 8;

/// Variable-rate frame timer.
#[derive(Debug)]
pub struct FrameTimer {
    /// When the timer was created.
    start: Instant,
    /// When the last frame occurred.
    last_frame: Instant,
    /// Time since last frame in seconds.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
}

impl FrameTimer {
    /// Create a new timer starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Mark a new frame. Returns the delta since the previous one in seconds.
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        self.delta_secs = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.delta_secs
    }

    /// Time since last frame in seconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Seconds since the timer was created.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.last_frame.duration_since(self.start).as_secs_f32()
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second, averaged over the last half second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Forget the time spent so far. The next delta starts from now.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-step accumulator.
///
/// Feed it variable deltas, get back whole steps of a fixed size. Leftover
/// time carries over to the next frame. At most `max_steps` are produced per
/// call so a long stall does not trigger a burst of catch-up work.
#[derive(Debug, Clone)]
pub struct FixedStep {
    step: f32,
    accumulator: f32,
    max_steps: u32,
}

impl FixedStep {
    pub fn new(step: f32) -> Self {
        Self {
            step: step.max(f32::EPSILON),
            accumulator: 0.0,
            max_steps: MAX_STEPS_PER_FRAME,
        }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Accumulated time not yet consumed.
    #[inline]
    pub fn remainder(&self) -> f32 {
        self.accumulator
    }

    /// Add `dt` and drain as many whole steps as fit.
    pub fn advance(&mut self, dt: f32) -> Steps {
        if dt.is_finite() && dt > 0.0 {
            self.accumulator += dt;
        }

        let available = (self.accumulator / self.step).floor() as u32;
        let count = available.min(self.max_steps);
        if available > count {
            // Drop what cannot be caught up
            self.accumulator = 0.0;
        } else {
            self.accumulator -= count as f32 * self.step;
        }

        Steps {
            step: self.step,
            remaining: count,
        }
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Iterator over the fixed steps produced by [`FixedStep::advance`].
#[derive(Debug)]
pub struct Steps {
    step: f32,
    remaining: u32,
}

impl Iterator for Steps {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

impl ExactSizeIterator for Steps {}
