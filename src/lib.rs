pub mod config;
pub mod error;
pub mod galaxy;
pub mod geometry;
pub mod orchestrator;
pub mod renderer;
pub mod state;
pub mod utils;

use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{CursorGrabMode, Window, WindowId},
};
use crate::config::GalaxyConfig;
use crate::state::State;

pub struct App {
    config: GalaxyConfig,
    state: Option<State>,
    startup_error: Option<anyhow::Error>,
}

impl App {
    pub fn new(config: GalaxyConfig) -> Self {
        Self {
            config,
            state: None,
            startup_error: None,
        }
    }

    fn create_state(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<State> {
        let window_attributes = Window::default_attributes()
            .with_title(self.config.window_title.as_str())
            .with_inner_size(PhysicalSize::new(self.config.window_width, self.config.window_height));
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        // Pointer deltas keep arriving while the cursor is held in the window.
        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
        match grabbed {
            Ok(()) => window.set_cursor_visible(false),
            Err(e) => log::warn!("Unable to grab the cursor: {e}"),
        }

        let state = pollster::block_on(State::new(window, &self.config))?;
        state.request_redraw();
        Ok(state)
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.startup_error.is_some() {
            return;
        }
        match self.create_state(event_loop) {
            Ok(state) => self.state = Some(state),
            Err(e) => {
                // Without a first working program there is nothing to draw.
                self.startup_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        state.handle_window_event(&event);
        if !state.is_running() {
            event_loop.exit();
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let (Some(state), DeviceEvent::MouseMotion { delta: (dx, dy) }) = (self.state.as_mut(), event) {
            state.handle_pointer_motion(dx, dy);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if self.state.take().is_some() {
            log::info!("Released GPU resources");
        }
    }
}

/// Opens the window and runs the frame loop until it terminates.
///
/// Returns the startup error when the GPU context or the first build of
/// either program failed; the loop is never entered in that case.
pub fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GalaxyConfig::from_env()?;
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);

    event_loop.run_app(&mut app)?;

    match app.startup_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
