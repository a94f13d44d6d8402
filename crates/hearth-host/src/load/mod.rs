//! Resource loading.
//!
//! Each resource is fetched by its own future. [`drive`] joins them and hands every
//! completion to the host, which gates the start sequence on the
//! [`ReadinessBarrier`] and issues the audio fetches once their count is known.

mod barrier;
mod join;
mod resource;
mod source;

pub use barrier::{LoadProgress, ReadinessBarrier};
pub use join::drive;
pub use resource::{ClipId, ClipKind, ResourceKind, ResourceRequest};
pub use source::{AssetSource, FsAssetSource};
