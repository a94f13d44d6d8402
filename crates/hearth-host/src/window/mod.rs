//! Native window runtime.
//!
//! Owns the `winit` EventLoop and the window, and wires them to the host: redraws
//! become frames and window events become host events.

mod runtime;
mod surface;

pub use runtime::{Runtime, RuntimeConfig};
pub use surface::WindowSurface;
