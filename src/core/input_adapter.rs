use glam::Vec2;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::display_context::DisplayContext;
use crate::camera::CameraCommand;

/// Pixels of a smooth-scroll gesture counted as one wheel line
const PIXELS_PER_LINE: f32 = 40.0;

/// What a held mouse button does while the cursor moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Rotate,
    Pan,
}

/// Adapter that turns Winit pointer and key events into camera commands.
///
/// The previous cursor position is kept in normalized device coordinates
/// and cleared on every press and release, so the first move of a drag only
/// records a position.
#[derive(Debug, Clone)]
pub struct ArcballController {
    display: DisplayContext,
    drag: Option<DragMode>,
    prev_ndc: Option<Vec2>,
    cursor_ndc: Option<Vec2>,
}

impl ArcballController {
    pub fn new(display: DisplayContext) -> Self {
        Self {
            display,
            drag: None,
            prev_ndc: None,
            cursor_ndc: None,
        }
    }

    pub fn resize(&mut self, display: DisplayContext) {
        self.display = display;
        self.prev_ndc = None;
    }

    pub fn display(&self) -> DisplayContext {
        self.display
    }

    /// Active drag, if a mapped button is held
    pub fn drag(&self) -> Option<DragMode> {
        self.drag
    }

    /// Last cursor position in normalized device coordinates
    pub fn cursor_ndc(&self) -> Option<Vec2> {
        self.cursor_ndc
    }

    /// Process a Winit WindowEvent, returning the camera command it produces
    pub fn process_event(&mut self, event: &WindowEvent) -> Option<CameraCommand> {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                let mode = Self::mouse_button_to_drag(*button)?;
                self.on_button(mode, state.is_pressed());
                None
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.on_cursor_moved(position.x as f32, position.y as f32)
            }
            WindowEvent::CursorLeft { .. } => {
                self.prev_ndc = None;
                None
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
                };
                self.on_scroll(lines)
            }
            WindowEvent::KeyboardInput { event, .. } => Self::on_key(event),
            _ => None,
        }
    }

    pub fn on_button(&mut self, mode: DragMode, pressed: bool) {
        match (pressed, self.drag) {
            (true, _) => self.drag = Some(mode),
            (false, Some(active)) if active == mode => self.drag = None,
            (false, _) => {}
        }
        self.prev_ndc = None;
    }

    /// Cursor moved to pixel `(x, y)`; produces a command while dragging
    pub fn on_cursor_moved(&mut self, x: f32, y: f32) -> Option<CameraCommand> {
        let ndc = self.display.pixel_to_ndc(x, y);
        self.cursor_ndc = Some(ndc);

        let mode = self.drag?;
        let Some(from) = self.prev_ndc.replace(ndc) else {
            return None;
        };
        if from == ndc {
            return None;
        }
        Some(match mode {
            DragMode::Rotate => CameraCommand::Rotate { from, to: ndc },
            DragMode::Pan => CameraCommand::Pan { from, to: ndc },
        })
    }

    /// Wheel moved by `lines`; positive zooms in
    pub fn on_scroll(&mut self, lines: f32) -> Option<CameraCommand> {
        if lines == 0.0 || !lines.is_finite() {
            return None;
        }
        Some(CameraCommand::Zoom(lines))
    }

    fn on_key(event: &KeyEvent) -> Option<CameraCommand> {
        if !event.state.is_pressed() || event.repeat {
            return None;
        }
        match event.physical_key {
            PhysicalKey::Code(KeyCode::KeyR) => Some(CameraCommand::Reset),
            _ => None,
        }
    }

    fn mouse_button_to_drag(button: MouseButton) -> Option<DragMode> {
        match button {
            MouseButton::Left => Some(DragMode::Rotate),
            MouseButton::Right | MouseButton::Middle => Some(DragMode::Pan),
            _ => None,
        }
    }
}

/// True for a fresh Escape press
pub fn is_quit_key(event: &KeyEvent) -> bool {
    event.state == ElementState::Pressed && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
}
