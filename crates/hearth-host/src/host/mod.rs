//! The host: readiness barrier, runtime bridge, lifecycle, frame driver and input
//! bridge wired together.
//!
//! Everything runs on one thread. Loader completions, frame callbacks and host
//! events all enter through methods on [`Host`], and every entry point goes
//! through the same guard: a broken host ignores the call, and any failure inside
//! it takes the single failure path.

mod requests;
mod running;
mod start;


use crate::backend::{AudioBackend, GraphicsBackend, Surface};
use crate::bridge::{RuntimeBridge, SavedDataStore};
use crate::config::HostConfig;
use crate::error::HostError;
use crate::frame::DisplayGeometry;
use crate::input::InputState;
use crate::lifecycle::{Lifecycle, LifecycleState};
use crate::load::{ClipId, LoadProgress, ReadinessBarrier, ResourceRequest};
use crate::module::ModuleFactory;

/// Platform services the host drives.
pub struct Collaborators {
    pub modules: Box<dyn ModuleFactory>,
    pub graphics: Box<dyn GraphicsBackend>,
    pub audio: Box<dyn AudioBackend>,
    pub surface: Box<dyn Surface>,
    pub saved_data: Box<dyn SavedDataStore>,
}

#[derive(Default)]
struct Callbacks {
    progress: Option<Box<dyn FnMut(LoadProgress)>>,
    ready: Option<Box<dyn FnMut()>>,
    quit: Option<Box<dyn FnMut()>>,
    error: Option<Box<dyn FnMut(&HostError)>>,
}

/// Host bridge for one application session.
///
/// ```rust,ignore
/// let mut host = Host::new(config, collaborators)
///     .on_progress(|p| log::info!("loading {:.0}%", p.core * 100.0))
///     .on_quit(|| log::info!("app quit"));
/// pollster::block_on(hearth_host::load::drive(&mut host, &source, None))?;
/// ```
pub struct Host {
    config: HostConfig,

    modules: Box<dyn ModuleFactory>,
    graphics: Box<dyn GraphicsBackend>,
    audio: Box<dyn AudioBackend>,
    surface: Box<dyn Surface>,
    saved_data: Box<dyn SavedDataStore>,

    callbacks: Callbacks,

    lifecycle: Lifecycle,
    barrier: ReadinessBarrier,
    bridge: Option<RuntimeBridge>,
    atlas: Option<Vec<u8>>,
    current_music: Option<ClipId>,

    input: InputState,
    geometry: Option<DisplayGeometry>,
    /// Fullscreen state last pushed to the module.
    fullscreen: Option<bool>,
    input_attached: bool,
}

impl Host {
    pub fn new(config: HostConfig, collaborators: Collaborators) -> Self {
        let Collaborators {
            modules,
            graphics,
            audio,
            surface,
            saved_data,
        } = collaborators;

        Self {
            config,
            modules,
            graphics,
            audio,
            surface,
            saved_data,
            callbacks: Callbacks::default(),
            lifecycle: Lifecycle::new(),
            barrier: ReadinessBarrier::new(),
            bridge: None,
            atlas: None,
            current_music: None,
            input: InputState::default(),
            geometry: None,
            fullscreen: None,
            input_attached: false,
        }
    }

    /// Loading progress observer, called after each settlement that changes progress.
    pub fn on_progress(mut self, f: impl FnMut(LoadProgress) + 'static) -> Self {
        self.callbacks.progress = Some(Box::new(f));
        self
    }

    /// Called once, when the host enters the running state for the first time.
    pub fn on_ready(mut self, f: impl FnMut() + 'static) -> Self {
        self.callbacks.ready = Some(Box::new(f));
        self
    }

    /// Called every time the module asks to stop.
    pub fn on_quit(mut self, f: impl FnMut() + 'static) -> Self {
        self.callbacks.quit = Some(Box::new(f));
        self
    }

    /// Error observer. Without one, failures are returned to the caller instead.
    pub fn on_error(mut self, f: impl FnMut(&HostError) + 'static) -> Self {
        self.callbacks.error = Some(Box::new(f));
        self
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn is_broken(&self) -> bool {
        self.lifecycle.is_broken()
    }

    pub fn progress(&self) -> LoadProgress {
        self.barrier.progress()
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// The core resource fetches to issue at startup.
    pub fn initial_requests(&self) -> Vec<ResourceRequest> {
        self.config.initial_requests()
    }

    /// Runs `f` under the central guard.
    ///
    /// A broken host skips `f` entirely. An error from `f` takes the failure path;
    /// it is only returned when no error observer is registered.
    fn guarded<T: Default>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, HostError>,
    ) -> Result<T, HostError> {
        if self.lifecycle.is_broken() {
            return Ok(T::default());
        }
        match f(self) {
            Ok(v) => Ok(v),
            Err(err) => {
                self.fail(err)?;
                Ok(T::default())
            }
        }
    }

    /// Single failure path. Idempotent once broken.
    fn fail(&mut self, err: HostError) -> Result<(), HostError> {
        if !self.lifecycle.transition(LifecycleState::Broken) {
            return Ok(());
        }

        if let Some(clip) = self.current_music.take() {
            self.audio.stop(clip);
        }
        self.bridge = None;
        self.atlas = None;

        log::error!("{err}");
        match self.callbacks.error.as_mut() {
            Some(cb) => {
                cb(&err);
                Ok(())
            }
            None => Err(err),
        }
    }

    fn bridge_mut(&mut self) -> Result<&mut RuntimeBridge, HostError> {
        self.bridge
            .as_mut()
            .ok_or_else(|| HostError::contract("module is not loaded"))
    }
}
