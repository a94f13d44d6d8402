use std::collections::HashSet;

use super::resource::{ClipId, ClipKind, ResourceKind};

const CORE_RESOURCE_COUNT: u32 = 3;

/// Loading progress reported to the host page.
///
/// `core` is the fraction of core resources loaded; `audio` is the fraction of
/// issued audio clips loaded (0 until the clip counts are known, 1 if there are none).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LoadProgress {
    pub core: f64,
    pub audio: f64,
}

impl LoadProgress {
    pub const COMPLETE: LoadProgress = LoadProgress { core: 1.0, audio: 1.0 };
}

/// Two-phase readiness gate over the resource loaders.
///
/// Phase one waits for the module image, texture and atlas. Phase two waits for
/// the audio clips whose counts are only known once the module is loaded. Each
/// phase fires exactly once; repeated or late settlements never re-open a gate.
#[derive(Debug, Default)]
pub struct ReadinessBarrier {
    module: bool,
    texture: bool,
    atlas: bool,

    /// Issued music and sound clip counts, once known.
    audio_counts: Option<(u16, u16)>,
    audio_pending: u32,
    audio_settled: HashSet<ClipId>,

    core_fired: bool,
    ready_fired: bool,
    last_progress: Option<LoadProgress>,
}

impl ReadinessBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `kind` is a resource this barrier waits for: any core resource,
    /// or an audio clip within the issued counts.
    pub fn expects(&self, kind: ResourceKind) -> bool {
        match kind {
            ResourceKind::AudioClip(id) => match self.audio_counts {
                Some((music, sound)) => {
                    let count = match id.kind {
                        ClipKind::Music => music,
                        ClipKind::Sound => sound,
                    };
                    id.index < count
                }
                None => false,
            },
            _ => true,
        }
    }

    /// Records a successful settlement. Returns `false` for duplicates and
    /// for clips that were never issued.
    pub fn record(&mut self, kind: ResourceKind) -> bool {
        let flag = match kind {
            ResourceKind::ModuleImage => &mut self.module,
            ResourceKind::TextureImage => &mut self.texture,
            ResourceKind::AtlasBlob => &mut self.atlas,
            ResourceKind::AudioClip(id) => {
                if !self.expects(kind) || !self.audio_settled.insert(id) {
                    return false;
                }
                self.audio_pending = self.audio_pending.saturating_sub(1);
                return true;
            }
        };

        let fresh = !*flag;
        *flag = true;
        fresh
    }

    /// Whether `kind` has already settled successfully.
    pub fn is_settled(&self, kind: ResourceKind) -> bool {
        match kind {
            ResourceKind::ModuleImage => self.module,
            ResourceKind::TextureImage => self.texture,
            ResourceKind::AtlasBlob => self.atlas,
            ResourceKind::AudioClip(id) => self.audio_settled.contains(&id),
        }
    }

    pub fn core_loaded_count(&self) -> u32 {
        [self.module, self.texture, self.atlas]
            .iter()
            .filter(|loaded| **loaded)
            .count() as u32
    }

    pub fn core_ready(&self) -> bool {
        self.core_loaded_count() == CORE_RESOURCE_COUNT
    }

    pub fn audio_pending(&self) -> u32 {
        self.audio_pending
    }

    pub fn progress(&self) -> LoadProgress {
        let audio = match self.audio_counts {
            None => 0.0,
            Some((music, sound)) => match u32::from(music) + u32::from(sound) {
                0 => 1.0,
                total => 1.0 - f64::from(self.audio_pending) / f64::from(total),
            },
        };

        LoadProgress {
            core: f64::from(self.core_loaded_count()) / f64::from(CORE_RESOURCE_COUNT),
            audio,
        }
    }

    /// Returns the current progress if it differs from the last value returned.
    pub fn take_progress_update(&mut self) -> Option<LoadProgress> {
        let now = self.progress();
        if self.last_progress == Some(now) {
            return None;
        }
        self.last_progress = Some(now);
        Some(now)
    }

    /// Returns `true` exactly once, the first time all core resources are loaded.
    pub fn take_core_ready(&mut self) -> bool {
        if self.core_fired || !self.core_ready() {
            return false;
        }
        self.core_fired = true;
        true
    }

    /// Starts counting audio clips. Only the first call has an effect.
    pub fn begin_audio(&mut self, music: u16, sound: u16) {
        if self.audio_counts.is_some() {
            return;
        }
        self.audio_counts = Some((music, sound));
        self.audio_pending = u32::from(music) + u32::from(sound);
    }

    /// Returns `true` exactly once, when every core resource and every issued
    /// audio clip has settled successfully.
    pub fn take_ready(&mut self) -> bool {
        if self.ready_fired
            || !self.core_ready()
            || self.audio_counts.is_none()
            || self.audio_pending != 0
        {
            return false;
        }
        self.ready_fired = true;
        true
    }
}
