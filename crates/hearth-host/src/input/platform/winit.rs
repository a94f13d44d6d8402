use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitMouseButton, TouchPhase, WindowEvent};
use winit::keyboard::{Key, NamedKey};

use crate::input::{HostEvent, HostTouch};

/// Translates winit `WindowEvent`s into host events.
///
/// winit reports positions in physical pixels and mouse buttons without a
/// position, so the translator tracks the last cursor position in displayed units.
#[derive(Debug, Default)]
pub struct EventTranslator {
    cursor: (f64, f64),
}

impl EventTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` for events the host does not forward.
    pub fn translate(&mut self, scale_factor: f64, event: &WindowEvent) -> Option<HostEvent> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let down = event.state == ElementState::Pressed;
                key_name(&event.logical_key).map(|key| HostEvent::Key { key, down })
            }

            WindowEvent::CursorMoved { position, .. } => {
                let (client_x, client_y) = to_client(scale_factor, *position);
                self.cursor = (client_x, client_y);
                Some(HostEvent::MouseMove { client_x, client_y })
            }

            WindowEvent::MouseInput { state, button, .. } => Some(HostEvent::MouseButton {
                client_x: self.cursor.0,
                client_y: self.cursor.1,
                button: map_mouse_button(*button),
                down: *state == ElementState::Pressed,
            }),

            WindowEvent::Touch(touch) => {
                let (client_x, client_y) = to_client(scale_factor, touch.location);
                let changed = vec![HostTouch {
                    id: touch.id,
                    client_x,
                    client_y,
                }];
                Some(match touch.phase {
                    TouchPhase::Started => HostEvent::TouchStart(changed),
                    TouchPhase::Moved => HostEvent::TouchMove(changed),
                    TouchPhase::Ended | TouchPhase::Cancelled => HostEvent::TouchEnd(changed),
                })
            }

            _ => None,
        }
    }
}

fn to_client(scale_factor: f64, pos: PhysicalPosition<f64>) -> (f64, f64) {
    let logical = pos.to_logical::<f64>(scale_factor);
    (logical.x, logical.y)
}

/// DOM-style key name (`"a"`, `"ArrowUp"`, `" "`).
fn key_name(key: &Key) -> Option<String> {
    match key {
        Key::Character(s) => Some(s.to_string()),
        Key::Named(NamedKey::Space) => Some(" ".to_string()),
        // winit named keys follow the DOM key value names.
        Key::Named(named) => Some(format!("{named:?}")),
        _ => None,
    }
}

fn map_mouse_button(b: WinitMouseButton) -> i32 {
    match b {
        WinitMouseButton::Left => 0,
        WinitMouseButton::Middle => 1,
        WinitMouseButton::Right => 2,
        WinitMouseButton::Back => 3,
        WinitMouseButton::Forward => 4,
        WinitMouseButton::Other(v) => i32::from(v),
    }
}
