//! Per-frame state machine: input in, camera and frame data out.
//!
//! Nothing here touches the GPU, so the loop logic can be driven by tests
//! with synthetic key presses and time steps.

use glam::{Mat4, Vec3};
use winit::event::{ElementState, MouseScrollDelta};
use winit::keyboard::KeyCode;
use crate::galaxy::particle::FrameUniforms;
use crate::renderer::camera::{Camera, CameraMovement};
use crate::utils::frame_clock::FrameClock;
use crate::utils::input_manager::InputState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Running,
    Terminated,
}

/// Rasterisation mode of the particle draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RenderMode {
    Wireframe,
    Point,
    #[default]
    Filled,
}

impl RenderMode {
    pub fn polygon_mode(self) -> wgpu::PolygonMode {
        match self {
            RenderMode::Wireframe => wgpu::PolygonMode::Line,
            RenderMode::Point => wgpu::PolygonMode::Point,
            RenderMode::Filled => wgpu::PolygonMode::Fill,
        }
    }

    pub fn required_features(self) -> wgpu::Features {
        match self {
            RenderMode::Wireframe => wgpu::Features::POLYGON_MODE_LINE,
            RenderMode::Point => wgpu::Features::POLYGON_MODE_POINT,
            RenderMode::Filled => wgpu::Features::empty(),
        }
    }
}

/// Movement keys held down, checked every frame.
const MOVEMENT_KEYS: [(KeyCode, CameraMovement); 6] = [
    (KeyCode::KeyW, CameraMovement::Forward),
    (KeyCode::KeyS, CameraMovement::Backward),
    (KeyCode::KeyA, CameraMovement::Left),
    (KeyCode::KeyD, CameraMovement::Right),
    (KeyCode::Space, CameraMovement::Up),
    (KeyCode::ShiftLeft, CameraMovement::Down),
];

/// Everything the GPU side needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUpdate {
    pub delta_time: f32,
    pub time: f32,
    pub reload_requested: bool,
    pub render_mode: RenderMode,
    pub view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec3,
}

impl FrameUpdate {
    pub fn uniforms(&self) -> FrameUniforms {
        FrameUniforms::new(self.view, self.projection, self.camera_position, self.time)
    }
}

pub struct FrameOrchestrator {
    phase: LoopPhase,
    render_mode: RenderMode,
    camera: Camera,
    input: InputState,
    clock: FrameClock,
    time: f32,
    reload_pending: bool,
}

impl FrameOrchestrator {
    pub fn new(camera: Camera) -> Self {
        Self {
            phase: LoopPhase::Running,
            render_mode: RenderMode::default(),
            camera,
            input: InputState::new(),
            clock: FrameClock::new(),
            time: 0.0,
            reload_pending: false,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, state: ElementState) {
        self.input.process_key(code, state);
        for pressed in self.input.take_pressed() {
            self.on_key_pressed(pressed);
        }
    }

    fn on_key_pressed(&mut self, code: KeyCode) {
        match code {
            KeyCode::Escape => self.request_exit(),
            KeyCode::Digit1 => self.set_render_mode(RenderMode::Wireframe),
            KeyCode::Digit2 => self.set_render_mode(RenderMode::Point),
            KeyCode::Digit3 => self.set_render_mode(RenderMode::Filled),
            KeyCode::KeyR => self.reload_pending = true,
            KeyCode::KeyN => self.camera.apply_movement(CameraMovement::Focus, 0.0),
            _ => {}
        }
    }

    fn set_render_mode(&mut self, mode: RenderMode) {
        if self.render_mode != mode {
            log::info!("Render mode: {:?}", mode);
            self.render_mode = mode;
        }
    }

    pub fn handle_pointer_motion(&mut self, dx: f64, dy: f64) {
        self.input.process_pointer_motion(dx, dy);
    }

    pub fn handle_scroll(&mut self, delta: MouseScrollDelta) {
        self.input.process_scroll(delta);
    }

    pub fn handle_focus_lost(&mut self) {
        self.input.release_all();
    }

    pub fn request_exit(&mut self) {
        if self.phase == LoopPhase::Running {
            log::info!("Leaving the frame loop");
        }
        self.phase = LoopPhase::Terminated;
    }

    /// Advances one frame using the wall clock.
    pub fn tick(&mut self, aspect_ratio: f32) -> FrameUpdate {
        let (delta, elapsed) = self.clock.tick();
        self.advance(delta.as_secs_f32(), elapsed.as_secs_f32(), aspect_ratio)
    }

    /// Advances one frame: applies the input gathered since the previous
    /// frame to the camera and produces the frame data.
    ///
    /// `time` never runs backwards, whatever the caller passes.
    pub fn advance(&mut self, delta_time: f32, time: f32, aspect_ratio: f32) -> FrameUpdate {
        let delta_time = delta_time.max(0.0);
        self.time = self.time.max(time);

        for (key, movement) in MOVEMENT_KEYS {
            if self.input.is_key_down(key) {
                self.camera.apply_movement(movement, delta_time);
            }
        }

        // Screen y grows downwards, look pitch grows upwards.
        let (dx, dy) = self.input.take_pointer_delta();
        if dx != 0.0 || dy != 0.0 {
            self.camera.apply_look(dx as f32, -dy as f32);
        }

        let scroll = self.input.take_scroll_delta();
        if scroll != 0.0 {
            self.camera.apply_zoom(scroll as f32);
        }

        FrameUpdate {
            delta_time,
            time: self.time,
            reload_requested: std::mem::take(&mut self.reload_pending),
            render_mode: self.render_mode,
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(aspect_ratio),
            camera_position: self.camera.position(),
        }
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == LoopPhase::Running
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }
}
