/// One touch point as reported by the host, in displayed coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HostTouch {
    /// Stable identifier for the lifetime of the touch.
    pub id: u64,
    pub client_x: f64,
    pub client_y: f64,
}

/// Platform-agnostic host events forwarded to the module.
///
/// Pointer coordinates are in displayed (device-independent) units; the host
/// rescales them to backing-surface pixels. Touch events carry only the touches
/// that changed.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Key transition, named like DOM `KeyboardEvent.key`.
    Key { key: String, down: bool },

    MouseMove { client_x: f64, client_y: f64 },

    /// Button transition; `button` is 0 left, 1 middle, 2 right.
    MouseButton {
        client_x: f64,
        client_y: f64,
        button: i32,
        down: bool,
    },

    TouchStart(Vec<HostTouch>),
    TouchMove(Vec<HostTouch>),
    /// Ended or cancelled touches.
    TouchEnd(Vec<HostTouch>),
}

impl HostEvent {
    pub fn key(key: impl Into<String>, down: bool) -> Self {
        HostEvent::Key {
            key: key.into(),
            down,
        }
    }
}
