use anyhow::{anyhow, Context};

use super::Host;
use crate::backend::TextureImage;
use crate::bridge::RuntimeBridge;
use crate::error::HostError;
use crate::lifecycle::LifecycleState;
use crate::load::{ResourceKind, ResourceRequest};

impl Host {
    /// Reports one loader completion.
    ///
    /// Returns the follow-up fetches to issue: the audio clips, once the core
    /// resources are in and the module has told the host how many it needs.
    /// Settlements after a failure are ignored.
    pub fn settle(
        &mut self,
        kind: ResourceKind,
        result: anyhow::Result<Vec<u8>>,
    ) -> Result<Vec<ResourceRequest>, HostError> {
        self.guarded(|host| {
            if !host.barrier.expects(kind) {
                log::warn!("ignoring settlement of unrequested {kind}");
                return Ok(Vec::new());
            }
            if host.barrier.is_settled(kind) {
                log::warn!("ignoring repeated settlement of {kind}");
                return Ok(Vec::new());
            }

            let bytes = result.map_err(|e| HostError::resource(kind, &e))?;
            host.accept(kind, bytes)
                .map_err(|e| HostError::resource(kind, &e))?;
            host.barrier.record(kind);
            log::debug!("{kind} loaded");
            host.report_progress();

            let issued = if host.barrier.take_core_ready() {
                host.start_sequence()?
            } else {
                Vec::new()
            };

            host.try_enter_running()?;
            Ok(issued)
        })
    }

    /// Hands a loaded payload to whichever collaborator owns its kind.
    fn accept(&mut self, kind: ResourceKind, bytes: Vec<u8>) -> anyhow::Result<()> {
        match kind {
            ResourceKind::ModuleImage => {
                let module = self
                    .modules
                    .instantiate(&bytes)
                    .context("module instantiation failed")?;
                self.bridge = Some(RuntimeBridge::new(module));
            }
            ResourceKind::TextureImage => {
                let texture = TextureImage::decode(&bytes).context("texture decode failed")?;
                self.graphics
                    .upload_texture(&texture)
                    .context("texture upload failed")?;
            }
            ResourceKind::AtlasBlob => self.atlas = Some(bytes),
            ResourceKind::AudioClip(id) => {
                self.audio
                    .register(id, bytes, id.loops())
                    .context("audio registration failed")?;
            }
        }
        Ok(())
    }

    fn report_progress(&mut self) {
        if self.lifecycle.is_broken() {
            return;
        }
        if let Some(progress) = self.barrier.take_progress_update() {
            log::debug!("load progress core={:.2} audio={:.2}", progress.core, progress.audio);
            if let Some(cb) = self.callbacks.progress.as_mut() {
                cb(progress);
            }
        }
    }

    /// One-shot start sequence, run when the core resources first become ready.
    fn start_sequence(&mut self) -> Result<Vec<ResourceRequest>, HostError> {
        let max_len = self.config.saved_data_max_len;
        let Some(bridge) = self.bridge.as_mut() else {
            return Err(HostError::contract("module is not loaded"));
        };

        if !bridge.ensure_registered()? {
            return Err(HostError::contract(
                "module main did not register an application",
            ));
        }

        if let Some(len) = bridge.load_saved_data(self.saved_data.as_mut(), max_len)? {
            log::debug!("transferred {len} bytes of saved data");
        }

        let (vertex_src, fragment_src) = bridge.shader_sources()?;
        self.graphics
            .compile_program(&vertex_src, &fragment_src)
            .context("sprite program build failed")?;

        let music = bridge.module().music_clip_count()?;
        let sound = bridge.module().sound_clip_count()?;
        self.barrier.begin_audio(music, sound);
        log::info!("core resources ready, loading {music} music and {sound} sound clips");

        self.drain_requests()?;
        self.report_progress();
        Ok(self.config.audio_requests(music, sound))
    }

    /// `Loading → Running`, once every resource has settled.
    fn try_enter_running(&mut self) -> Result<(), HostError> {
        if !self.barrier.take_ready() || !self.lifecycle.transition(LifecycleState::Running) {
            return Ok(());
        }

        self.current_music = None;
        if let Some(cb) = self.callbacks.ready.as_mut() {
            cb();
        }

        let atlas = self
            .atlas
            .take()
            .ok_or_else(|| anyhow!("atlas missing at start"))?;
        let (width, height) = self.surface.backing_size();

        self.bridge_mut()?.transfer_atlas(&atlas)?;
        self.sync_fullscreen()?;
        let bridge = self.bridge_mut()?;
        bridge.module().init().context("module init failed")?;
        bridge.module().on_resize(width, height)?;
        self.drain_requests()?;

        self.graphics.bind_vertex_attributes()?;
        self.surface.request_frame();

        if !self.input_attached {
            self.surface.attach_input();
            self.input_attached = true;
        }
        Ok(())
    }
}
