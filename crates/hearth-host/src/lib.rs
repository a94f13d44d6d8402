//! Hearth host crate.
//!
//! Loads a compiled application module with its texture, atlas and audio clips,
//! starts it once everything is in, then drives its frames and forwards input.

pub mod backend;
pub mod bridge;
pub mod config;
pub mod error;
pub mod frame;
pub mod host;
pub mod input;
pub mod lifecycle;
pub mod load;
pub mod logging;
pub mod module;
pub mod time;
pub mod window;

#[cfg(test)]
mod testing;

pub use config::HostConfig;
pub use error::HostError;
pub use host::{Collaborators, Host};
pub use lifecycle::LifecycleState;
pub use load::{AssetSource, FsAssetSource, LoadProgress};
