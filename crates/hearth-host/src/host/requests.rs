use anyhow::{bail, Context};

use super::Host;
use crate::backend::decode_sprite_vertices;
use crate::error::HostError;
use crate::load::{ClipId, ResourceKind};
use crate::module::HostRequest;

impl Host {
    /// Applies every request the module made during the last entry call.
    pub(super) fn drain_requests(&mut self) -> Result<(), HostError> {
        let requests = match self.bridge.as_mut() {
            Some(bridge) => bridge.module().take_requests(),
            None => return Ok(()),
        };
        for request in requests {
            self.dispatch(request)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, request: HostRequest) -> Result<(), HostError> {
        match request {
            HostRequest::SetScissor { x, y, width, height } => {
                self.graphics.set_scissor(x, y, width, height)
            }
            HostRequest::Clear { r, g, b } => self.graphics.clear(r, g, b),
            HostRequest::DrawSprites { offset, len } => {
                let bytes = self.bridge_mut()?.read_bytes(offset, len)?;
                let vertices = decode_sprite_vertices(bytes)?;
                self.graphics.draw_sprites(&vertices)?;
            }

            HostRequest::PlayMusic { id, looped } => {
                let clip = self.checked_clip(ClipId::music(id))?;
                if let Some(current) = self.current_music.take() {
                    self.audio.stop(current);
                }
                self.audio.set_looping(clip, looped);
                self.audio.play(clip);
                self.current_music = Some(clip);
            }
            HostRequest::StopMusic => {
                if let Some(current) = self.current_music.take() {
                    self.audio.stop(current);
                }
            }
            HostRequest::PlaySound(id) => {
                let clip = self.checked_clip(ClipId::sound(id))?;
                self.audio.play(clip);
            }

            HostRequest::RequestFullscreen => self.surface.request_fullscreen(),
            HostRequest::CancelFullscreen => self.surface.exit_fullscreen(),

            HostRequest::WriteSavedData { offset, len } => {
                let Some(bridge) = self.bridge.as_ref() else {
                    return Err(HostError::contract("module is not loaded"));
                };
                bridge
                    .export_saved_data(offset, len, self.saved_data.as_mut())
                    .context("saved data export failed")?;
            }
            HostRequest::Log { offset } => {
                let msg = self.bridge_mut()?.read_c_str(offset)?;
                log::info!(target: "hearth_host::module", "{msg}");
            }
        }
        Ok(())
    }

    /// Only clips that finished loading can be played.
    fn checked_clip(&self, clip: ClipId) -> anyhow::Result<ClipId> {
        if !self.barrier.is_settled(ResourceKind::AudioClip(clip)) {
            bail!("module referenced {clip:?}, which was never loaded");
        }
        Ok(clip)
    }
}
