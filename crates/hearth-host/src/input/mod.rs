//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Platform code translates native events into `HostEvent`s; the host applies
//! them to `InputState` and forwards them to the module.

mod event;
mod keymap;
pub mod platform;
mod state;

pub use event::{HostEvent, HostTouch};
pub use keymap::key_code;
pub use state::{InputState, TouchPoint};
