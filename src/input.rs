//! Pointer input for the fireworks window.
//!
//! [`Input`] tracks the cursor over raw winit window events and reports a
//! [`Click`] whenever the left mouse button is released, matching how a
//! browser fires `click` after the button comes back up.
//!
//! # Usage
//!
//! ```ignore
//! if let Some(click) = input.handle_event(&event) {
//!     driver.handle_click(click.position, input.viewport());
//! }
//! ```

use glam::Vec2;
use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};

use crate::picking::screen_to_ndc;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

impl From<WinitMouseButton> for MouseButton {
    fn from(btn: WinitMouseButton) -> Self {
        match btn {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

/// A completed primary-button click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Click {
    /// Cursor position in physical pixels, origin top-left.
    pub position: Vec2,
}

/// Cursor and button state.
#[derive(Debug, Default)]
pub struct Input {
    cursor: Vec2,
    left_held: bool,
    window_size: (u32, u32),
}

impl Input {
    /// Create an input tracker for a window of the given physical size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            window_size: (width, height),
            ..Default::default()
        }
    }

    /// Cursor position in screen pixels.
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Cursor position in normalized device coordinates (-1 to 1, Y up).
    pub fn cursor_ndc(&self) -> Vec2 {
        screen_to_ndc(self.cursor, self.viewport())
    }

    /// Window size as a vector, for picking.
    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.window_size.0 as f32, self.window_size.1 as f32)
    }

    /// Whether the left button is currently down.
    pub fn left_held(&self) -> bool {
        self.left_held
    }

    /// Update window size for NDC calculations.
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    /// Process a winit window event, returning a click if one completed.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<Click> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                None
            }
            WindowEvent::Resized(size) => {
                self.set_window_size(size.width, size.height);
                None
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.handle_button(MouseButton::from(*button), *state)
            }
            _ => None,
        }
    }

    fn handle_button(&mut self, button: MouseButton, state: ElementState) -> Option<Click> {
        if button != MouseButton::Left {
            return None;
        }
        match state {
            ElementState::Pressed => {
                self.left_held = true;
                None
            }
            ElementState::Released => {
                // A release without a matching press (e.g. press outside the window) is not a click
                let was_held = std::mem::replace(&mut self.left_held, false);
                was_held.then_some(Click { position: self.cursor })
            }
        }
    }
}
