#![warn(missing_docs)]
//! Pointer input tracking for picking and orbit controls.

use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// Pixels per wheel step for touchpads that report pixel deltas.
const PIXELS_PER_LINE: f32 = 100.0;

/// A pointer event for the picking controller, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// The cursor moved to a new position.
    Moved(Vec2),
    /// The primary button was released at a position.
    Clicked(Vec2),
}

/// Pointer state tracking for a single frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Last known cursor position.
    cursor: Option<Vec2>,
    /// Mouse buttons currently pressed.
    mouse_buttons: HashSet<MouseButton>,

    /// Primary-button drag since last frame (orbit rotation).
    pub rotate_delta: Vec2,
    /// Secondary/middle-button drag since last frame (orbit pan).
    pub pan_delta: Vec2,
    /// Mouse wheel steps since last frame, positive away from the user.
    pub wheel_delta: f32,
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a window event. Returns a pointer event for the picking
    /// controller when the event produced one.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                Some(self.cursor_moved(Vec2::new(position.x as f32, position.y as f32)))
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                None
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.button(*button, *state == ElementState::Pressed)
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.wheel(match delta {
                    MouseScrollDelta::LineDelta(_x, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                });
                None
            }
            WindowEvent::Focused(false) => {
                self.mouse_buttons.clear();
                None
            }
            _ => None,
        }
    }

    /// Record a cursor move, accumulating drag deltas for held buttons.
    pub fn cursor_moved(&mut self, position: Vec2) -> PointerEvent {
        if let Some(previous) = self.cursor {
            let delta = position - previous;
            if self.mouse_button_pressed(MouseButton::Left) {
                self.rotate_delta += delta;
            }
            if self.mouse_button_pressed(MouseButton::Right)
                || self.mouse_button_pressed(MouseButton::Middle)
            {
                self.pan_delta += delta;
            }
        }
        self.cursor = Some(position);
        PointerEvent::Moved(position)
    }

    /// Record a button transition. A left release over a known cursor
    /// position is a click.
    pub fn button(&mut self, button: MouseButton, pressed: bool) -> Option<PointerEvent> {
        if pressed {
            self.mouse_buttons.insert(button);
            return None;
        }
        let was_down = self.mouse_buttons.remove(&button);
        match (button, was_down, self.cursor) {
            (MouseButton::Left, true, Some(position)) => Some(PointerEvent::Clicked(position)),
            _ => None,
        }
    }

    /// Record wheel steps.
    pub fn wheel(&mut self, steps: f32) {
        self.wheel_delta += steps;
    }

    /// Last known cursor position.
    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    /// Check if a mouse button is currently pressed.
    pub fn mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }

    /// Reset per-frame state (call at the start of each frame).
    pub fn begin_frame(&mut self) {
        self.rotate_delta = Vec2::ZERO;
        self.pan_delta = Vec2::ZERO;
        self.wheel_delta = 0.0;
    }
}
