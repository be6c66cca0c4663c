//! Windowed viewer.
//!
//! Opens a window, shows the source image through a [`GlobeEffect`] and
//! forwards mouse and touch input to it.
//!
//! Keys:
//! - `R` resets the globe
//! - `Space` toggles animation
//! - `F` toggles refraction
//! - `T` toggles touch input
//! - `Escape` quits

use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::drag::PHYSICS_TICK;
use crate::error::ViewerError;
use crate::globe::GlobeEffect;
use crate::gpu::GlobeRenderer;
use crate::input::PointerTracker;
use crate::params::GlobeConfig;
use crate::source::SourceImage;
use crate::time::{FixedStep, FrameTimer};

/// What a key press does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Reset,
    ToggleAnimate,
    ToggleRefraction,
    ToggleTouch,
    Quit,
}

impl KeyAction {
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::KeyR => Some(KeyAction::Reset),
            KeyCode::Space => Some(KeyAction::ToggleAnimate),
            KeyCode::KeyF => Some(KeyAction::ToggleRefraction),
            KeyCode::KeyT => Some(KeyAction::ToggleTouch),
            KeyCode::Escape => Some(KeyAction::Quit),
            _ => None,
        }
    }

    /// Apply to `globe`. Returns `false` when the viewer should close.
    pub fn apply(self, globe: &mut GlobeEffect) -> bool {
        match self {
            KeyAction::Reset => globe.reset(),
            KeyAction::ToggleAnimate => {
                let animate = !globe.is_animating();
                globe.set_animate(animate);
                log::info!("animation {}", on_off(animate));
            }
            KeyAction::ToggleRefraction => {
                let refraction = !globe.visual().refraction;
                globe.set_refraction(refraction);
                log::info!("refraction {}", on_off(refraction));
            }
            KeyAction::ToggleTouch => {
                let touch = !globe.touch_enabled();
                globe.set_touch_enabled(touch);
                log::info!("touch {}", on_off(touch));
            }
            KeyAction::Quit => return false,
        }
        true
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

/// Builder for the viewer window.
pub struct Viewer {
    image: SourceImage,
    config: GlobeConfig,
    title: String,
}

impl Viewer {
    pub fn new() -> Self {
        Self {
            image: SourceImage::default(),
            config: GlobeConfig::default(),
            title: "Liquid Globe".to_string(),
        }
    }

    pub fn with_image(mut self, image: SourceImage) -> Self {
        self.image = image;
        self
    }

    pub fn with_config(mut self, config: GlobeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Open the window. Blocks until it is closed.
    pub fn run(self) -> Result<(), ViewerError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    window: Option<Arc<Window>>,
    renderer: Option<GlobeRenderer>,
    image: SourceImage,
    title: String,
    globe: GlobeEffect,
    pointer: PointerTracker,
    timer: FrameTimer,
    physics: FixedStep,
    error: Option<ViewerError>,
}

impl App {
    fn new(viewer: Viewer) -> Self {
        Self {
            window: None,
            renderer: None,
            image: viewer.image,
            title: viewer.title,
            globe: GlobeEffect::from_config(&viewer.config),
            pointer: PointerTracker::default(),
            timer: FrameTimer::new(),
            physics: FixedStep::new(PHYSICS_TICK),
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(900, 900));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let size = window.inner_size();
        self.pointer.resize(size.width, size.height);
        self.window = Some(window.clone());

        let renderer = pollster::block_on(GlobeRenderer::new(window, &self.image))?;
        self.renderer = Some(renderer);
        self.timer.reset();
        Ok(())
    }

    fn on_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        if let Some(action) = KeyAction::from_key(code) {
            log::debug!("key {:?}", action);
            if !action.apply(&mut self.globe) {
                event_loop.exit();
            }
            if action == KeyAction::Reset {
                self.physics.reset();
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let dt = self.timer.update();
        for step in self.physics.advance(dt) {
            self.globe.tick(step);
        }
        self.globe.advance_clock(dt);

        if let Some(renderer) = &mut self.renderer {
            let params = self
                .globe
                .frame_parameters(renderer.canvas_size(), renderer.image_size());
            match renderer.render(&params) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    renderer.reconfigure()
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("out of GPU memory");
                    event_loop.exit();
                }
                Err(e) => log::warn!("render error: {:?}", e),
            }
        }

        if self.timer.frame() % 600 == 0 {
            log::debug!("{:.1} fps", self.timer.fps());
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("{}", e);
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        for gesture in self.pointer.handle_window_event(&event) {
            self.globe.handle(gesture);
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => self.on_key(event_loop, &event),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::RipplePhase;
    use glam::Vec2;

    #[test]
    fn test_key_mapping() {
        assert_eq!(KeyAction::from_key(KeyCode::KeyR), Some(KeyAction::Reset));
        assert_eq!(KeyAction::from_key(KeyCode::Escape), Some(KeyAction::Quit));
        assert_eq!(KeyAction::from_key(KeyCode::KeyQ), None);
    }

    #[test]
    fn test_toggles() {
        let mut globe = GlobeEffect::new();
        assert!(KeyAction::ToggleAnimate.apply(&mut globe));
        assert!(!globe.is_animating());
        assert!(KeyAction::ToggleRefraction.apply(&mut globe));
        assert!(!globe.visual().refraction);
        assert!(KeyAction::ToggleTouch.apply(&mut globe));
        assert!(!globe.touch_enabled());
        assert!(!KeyAction::Quit.apply(&mut globe));
    }

    #[test]
    fn test_reset_key_clears_ripple() {
        let mut globe = GlobeEffect::new();
        globe.on_tap(Vec2::ZERO);
        KeyAction::Reset.apply(&mut globe);
        assert_eq!(globe.ripple_phase(), RipplePhase::Idle);
        assert!(globe.is_animating());
    }
}
