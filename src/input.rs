//! Input handling for the butterfly window.
//!
//! [`Input`] tracks raw window events between frames and turns them into
//! [`Command`]s plus pointer updates for the field:
//!
//! | Input | Effect |
//! |-------|--------|
//! | `Space` | start the formation |
//! | `R` | reset (scatter and re-form) |
//! | `P` | pause / resume |
//! | `Escape` | quit |
//! | cursor move | pointer force |
//! | left click | ripple |

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

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

/// Keys the application reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Space,
    R,
    P,
    Escape,
    Other,
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::Space => KeyCode::Space,
            WinitKeyCode::KeyR => KeyCode::R,
            WinitKeyCode::KeyP => KeyCode::P,
            WinitKeyCode::Escape => KeyCode::Escape,
            _ => KeyCode::Other,
        }
    }
}

/// High-level action requested by the user this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Form,
    Reset,
    TogglePause,
    Quit,
}

impl Command {
    fn for_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::Space => Some(Command::Form),
            KeyCode::R => Some(Command::Reset),
            KeyCode::P => Some(Command::TogglePause),
            KeyCode::Escape => Some(Command::Quit),
            KeyCode::Other => None,
        }
    }
}

/// Input state between two frames.
#[derive(Debug, Default)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    /// Keys that went down this frame, in press order.
    keys_pressed: Vec<KeyCode>,

    /// Left clicks this frame, at the cursor position of the press.
    clicks: Vec<Vec2>,

    cursor: Option<Vec2>,
    cursor_moved: bool,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a key was pressed this frame (auto-repeat excluded).
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Last known cursor position in window pixels; `None` once it leaves.
    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    /// Cursor position if it moved since the last frame.
    pub fn cursor_moved(&self) -> Option<Vec2> {
        self.cursor.filter(|_| self.cursor_moved)
    }

    /// Left clicks since the last frame.
    pub fn clicks(&self) -> &[Vec2] {
        &self.clicks
    }

    /// Commands for keys pressed since the last frame, in press order.
    pub fn commands(&self) -> Vec<Command> {
        self.keys_pressed
            .iter()
            .filter_map(|&k| Command::for_key(k))
            .collect()
    }

    /// Clear per-frame state. Call after the frame consumed the input.
    pub(crate) fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.clicks.clear();
        self.cursor_moved = false;
    }

    /// Process a winit window event.
    pub(crate) fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.press_key(KeyCode::from(keycode)),
                        ElementState::Released => self.release_key(KeyCode::from(keycode)),
                    }
                }
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button,
                ..
            } => self.press_mouse(MouseButton::from(*button)),

            WindowEvent::CursorMoved { position, .. } => {
                self.move_cursor(Vec2::new(position.x as f32, position.y as f32));
            }

            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
            }

            _ => {}
        }
    }

    pub(crate) fn press_key(&mut self, key: KeyCode) {
        // Only fire pressed event if not already held (no repeat)
        if self.keys_held.insert(key) {
            self.keys_pressed.push(key);
        }
    }

    pub(crate) fn release_key(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    pub(crate) fn press_mouse(&mut self, button: MouseButton) {
        if button == MouseButton::Left {
            if let Some(at) = self.cursor {
                self.clicks.push(at);
            }
        }
    }

    pub(crate) fn move_cursor(&mut self, position: Vec2) {
        self.cursor = Some(position);
        self.cursor_moved = true;
    }
}
