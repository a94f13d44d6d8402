use std::fmt;
use std::path::PathBuf;

/// Audio clip class.
///
/// Music clips are loopable and at most one plays at a time; sounds are one-shot.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ClipKind {
    Music,
    Sound,
}

/// Dense clip identifier, addressed per class.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ClipId {
    pub kind: ClipKind,
    pub index: u16,
}

impl ClipId {
    pub const fn music(index: u16) -> Self {
        Self { kind: ClipKind::Music, index }
    }

    pub const fn sound(index: u16) -> Self {
        Self { kind: ClipKind::Sound, index }
    }

    /// Whether the clip loads with looping enabled.
    pub fn loops(self) -> bool {
        self.kind == ClipKind::Music
    }
}

/// The four independently loaded resource classes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ResourceKind {
    ModuleImage,
    TextureImage,
    AtlasBlob,
    AudioClip(ClipId),
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::ModuleImage => f.write_str("module image"),
            ResourceKind::TextureImage => f.write_str("texture image"),
            ResourceKind::AtlasBlob => f.write_str("atlas blob"),
            ResourceKind::AudioClip(ClipId { kind: ClipKind::Music, index }) => {
                write!(f, "music clip {index}")
            }
            ResourceKind::AudioClip(ClipId { kind: ClipKind::Sound, index }) => {
                write!(f, "sound clip {index}")
            }
        }
    }
}

/// One fetch to issue: the resource it settles and the files that may satisfy it.
///
/// Candidates are tried in order; the first one available wins.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRequest {
    pub kind: ResourceKind,
    pub candidates: Vec<PathBuf>,
}

impl ResourceRequest {
    pub fn new(kind: ResourceKind, candidates: Vec<PathBuf>) -> Self {
        Self { kind, candidates }
    }
}
