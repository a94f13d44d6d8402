use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::load::{ClipId, ResourceKind, ResourceRequest};

/// Host configuration.
///
/// Every field has a default, so an empty TOML document is a valid config.
/// File names are resolved relative to `asset_dir` by the asset source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub asset_dir: PathBuf,
    pub module_file: String,
    pub atlas_file: String,
    pub texture_file: String,

    pub music_prefix: String,
    pub sound_prefix: String,
    /// Encodings tried per clip, first available wins.
    pub audio_encodings: Vec<String>,

    /// Synthesize mouse calls from the primary touch (identifier 0).
    pub use_mouse_on_touch: bool,

    /// Lower bound for each displayed surface dimension, in device-independent units.
    pub min_surface_extent: f64,

    /// Saved-data strings longer than this are treated as absent.
    pub saved_data_max_len: usize,

    /// Optional per-resource load timeout.
    pub load_timeout_ms: Option<u64>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("."),
            module_file: "app.wasm".to_string(),
            atlas_file: "sprites.atlas".to_string(),
            texture_file: "sprites.png".to_string(),
            music_prefix: "music".to_string(),
            sound_prefix: "sound".to_string(),
            audio_encodings: vec!["ogg".to_string(), "mp3".to_string()],
            use_mouse_on_touch: false,
            min_surface_extent: 50.0,
            saved_data_max_len: 1000,
            load_timeout_ms: None,
        }
    }
}

impl HostConfig {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        toml::from_str(src).context("invalid host config")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read host config {}", path.display()))?;
        Self::from_toml_str(&src)
    }

    pub fn load_timeout(&self) -> Option<Duration> {
        self.load_timeout_ms.map(Duration::from_millis)
    }

    /// Requests for the three core resources, in issue order.
    pub fn initial_requests(&self) -> Vec<ResourceRequest> {
        vec![
            ResourceRequest::new(ResourceKind::AtlasBlob, vec![PathBuf::from(&self.atlas_file)]),
            ResourceRequest::new(
                ResourceKind::TextureImage,
                vec![PathBuf::from(&self.texture_file)],
            ),
            ResourceRequest::new(ResourceKind::ModuleImage, vec![PathBuf::from(&self.module_file)]),
        ]
    }

    /// Numbered clip requests (`music0.ogg`, `music0.mp3`, ...), music first.
    pub fn audio_requests(&self, music: u16, sound: u16) -> Vec<ResourceRequest> {
        let music = (0..music).map(|i| (ClipId::music(i), &self.music_prefix));
        let sound = (0..sound).map(|i| (ClipId::sound(i), &self.sound_prefix));

        music
            .chain(sound)
            .map(|(id, prefix)| {
                let candidates = self
                    .audio_encodings
                    .iter()
                    .map(|ext| PathBuf::from(format!("{prefix}{}.{ext}", id.index)))
                    .collect();
                ResourceRequest::new(ResourceKind::AudioClip(id), candidates)
            })
            .collect()
    }
}
