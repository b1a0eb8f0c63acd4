use std::collections::HashSet;
use winit::event::{ElementState, MouseScrollDelta};
use winit::keyboard::KeyCode;

/// Pixels of a touchpad scroll that count as one wheel line.
const PIXELS_PER_LINE: f64 = 40.0;

/// Keyboard and pointer state accumulated between two frames.
#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<KeyCode>,
    pressed: Vec<KeyCode>,
    pointer_delta: (f64, f64),
    scroll_delta: f64,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_key(&mut self, code: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                // Key repeats arrive as further presses; only the first one is an edge.
                if self.held.insert(code) {
                    self.pressed.push(code);
                }
            }
            ElementState::Released => {
                self.held.remove(&code);
            }
        }
    }

    pub fn process_pointer_motion(&mut self, dx: f64, dy: f64) {
        self.pointer_delta.0 += dx;
        self.pointer_delta.1 += dy;
    }

    pub fn process_scroll(&mut self, delta: MouseScrollDelta) {
        self.scroll_delta += match delta {
            MouseScrollDelta::LineDelta(_, y) => y as f64,
            MouseScrollDelta::PixelDelta(position) => position.y / PIXELS_PER_LINE,
        };
    }

    pub fn is_key_down(&self, code: KeyCode) -> bool {
        self.held.contains(&code)
    }

    /// Keys that went down since the last call, in press order.
    pub fn take_pressed(&mut self) -> Vec<KeyCode> {
        std::mem::take(&mut self.pressed)
    }

    /// Pointer movement since the last call, in device units (y grows downwards).
    pub fn take_pointer_delta(&mut self) -> (f64, f64) {
        std::mem::take(&mut self.pointer_delta)
    }

    /// Scroll since the last call, in wheel lines (positive away from the user).
    pub fn take_scroll_delta(&mut self) -> f64 {
        std::mem::take(&mut self.scroll_delta)
    }

    /// Drops held keys, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
    }
}
