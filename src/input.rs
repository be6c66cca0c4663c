//! Gesture adapter: raw pointer input to normalized [`PointerEvent`]s.
//!
//! [`PointerTracker`] follows a single pointer (mouse or the first touch) in
//! pixel coordinates and decides whether a press is a tap or a drag. A press
//! that moves further than [`TOUCH_SLOP`] pixels becomes a drag; one that is
//! released before that is a tap.
//!
//! Points are normalized to the viewport with the origin at its centre:
//! `(x / width - 0.5, y / height - 0.5)`. A zero-size viewport produces no
//! events at all.
//!
//! # Usage
//!
//! ```ignore
//! // In the window event handler:
//! for event in tracker.handle_window_event(&event) {
//!     globe.handle(event);
//! }
//! ```

use glam::Vec2;
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};

use crate::interaction::PointerEvent;

/// Movement in pixels before a press turns into a drag.
pub const TOUCH_SLOP: f32 = 8.0;

#[derive(Debug, Clone, Copy)]
struct Press {
    down_at: Vec2,
    last: Vec2,
    dragging: bool,
}

/// Tracks one pointer and turns its motion into gestures.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    viewport: Vec2,
    cursor: Option<Vec2>,
    press: Option<Press>,
    touch_id: Option<u64>,
}

impl PointerTracker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: Vec2::new(width as f32, height as f32),
            ..Default::default()
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Vec2::new(width as f32, height as f32);
    }

    #[inline]
    fn has_area(&self) -> bool {
        self.viewport.x > 0.0 && self.viewport.y > 0.0
    }

    /// Pixel position to normalized coordinates, `None` for a zero-size viewport.
    pub fn normalize(&self, pixel: Vec2) -> Option<Vec2> {
        if !self.has_area() {
            return None;
        }
        Some(pixel / self.viewport - Vec2::splat(0.5))
    }

    /// Pixel delta to a normalized delta.
    pub fn normalize_delta(&self, delta: Vec2) -> Option<Vec2> {
        if !self.has_area() {
            return None;
        }
        Some(delta / self.viewport)
    }

    /// True while a press is in progress.
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// True once the current press has become a drag.
    pub fn is_dragging(&self) -> bool {
        self.press.is_some_and(|p| p.dragging)
    }

    /// Pointer went down at `pixel`.
    pub fn press(&mut self, pixel: Vec2) {
        if !self.has_area() {
            return;
        }
        self.cursor = Some(pixel);
        self.press = Some(Press {
            down_at: pixel,
            last: pixel,
            dragging: false,
        });
    }

    /// Pointer moved to `pixel`.
    pub fn move_to(&mut self, pixel: Vec2) -> Vec<PointerEvent> {
        self.cursor = Some(pixel);
        let mut events = Vec::new();
        let Some(mut press) = self.press else {
            return events;
        };

        if !press.dragging {
            if pixel.distance(press.down_at) <= TOUCH_SLOP {
                return events;
            }
            if let (Some(start), Some(delta)) = (
                self.normalize(press.down_at),
                self.normalize_delta(pixel - press.down_at),
            ) {
                events.push(PointerEvent::DragStart(start));
                events.push(PointerEvent::DragMove(delta));
                press.dragging = true;
            }
        } else if let Some(delta) = self.normalize_delta(pixel - press.last) {
            events.push(PointerEvent::DragMove(delta));
        }

        press.last = pixel;
        self.press = Some(press);
        events
    }

    /// Pointer released.
    pub fn release(&mut self) -> Option<PointerEvent> {
        let press = self.press.take()?;
        if press.dragging {
            Some(PointerEvent::DragEnd)
        } else {
            self.normalize(press.down_at).map(PointerEvent::Tap)
        }
    }

    /// Gesture aborted (focus lost, pointer left, touch cancelled).
    pub fn cancel(&mut self) -> Option<PointerEvent> {
        self.touch_id = None;
        let press = self.press.take()?;
        press.dragging.then_some(PointerEvent::DragCancel)
    }

    /// Feed a winit window event. Returns the gestures it completes.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> Vec<PointerEvent> {
        match event {
            WindowEvent::Resized(size) => {
                self.resize(size.width, size.height);
                Vec::new()
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.touch_id.is_some() {
                    return Vec::new();
                }
                self.move_to(Vec2::new(position.x as f32, position.y as f32))
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => {
                    if let Some(cursor) = self.cursor {
                        self.press(cursor);
                    }
                    Vec::new()
                }
                ElementState::Released => self.release().into_iter().collect(),
            },
            WindowEvent::Touch(touch) => {
                let pixel = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                match touch.phase {
                    TouchPhase::Started if self.touch_id.is_none() => {
                        self.touch_id = Some(touch.id);
                        self.press(pixel);
                        Vec::new()
                    }
                    TouchPhase::Moved if self.touch_id == Some(touch.id) => self.move_to(pixel),
                    TouchPhase::Ended if self.touch_id == Some(touch.id) => {
                        self.touch_id = None;
                        self.release().into_iter().collect()
                    }
                    TouchPhase::Cancelled if self.touch_id == Some(touch.id) => {
                        self.cancel().into_iter().collect()
                    }
                    // Additional fingers are ignored
                    _ => Vec::new(),
                }
            }
            WindowEvent::CursorLeft { .. } | WindowEvent::Focused(false) => {
                self.cursor = None;
                self.cancel().into_iter().collect()
            }
            _ => Vec::new(),
        }
    }
}
