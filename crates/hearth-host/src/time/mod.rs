//! Time subsystem.
//!
//! Provides the monotonic timestamps forwarded to the module's update entry point.
//! One `FrameClock` per runtime; call `tick()` once per frame callback.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
