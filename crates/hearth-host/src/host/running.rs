use anyhow::Context;

use super::Host;
use crate::error::HostError;
use crate::frame::DisplayGeometry;
use crate::input::{key_code, HostEvent, HostTouch, TouchPoint};
use crate::lifecycle::LifecycleState;

/// Identifier of the touch that drives synthesized mouse input.
const PRIMARY_TOUCH: u64 = 0;

impl Host {
    /// Per-frame step. Does nothing unless running.
    ///
    /// Schedules the next frame unless the module asked to stop.
    pub fn frame(&mut self, timestamp_ms: f64) -> Result<(), HostError> {
        self.guarded(|host| {
            if !host.lifecycle.is_running() {
                return Ok(());
            }

            host.resize_if_changed()?;
            host.sync_fullscreen()?;

            let touches = host.input.touches_json()?;
            let (x, y) = host.pointer_px();
            let bridge = host.bridge_mut()?;
            let handle = bridge.write_string(&touches)?;
            let continuing = bridge
                .module()
                .update(timestamp_ms, x, y, handle)
                .context("module update failed")?;
            host.drain_requests()?;

            if continuing {
                host.surface.request_frame();
            } else {
                host.quit();
            }
            Ok(())
        })
    }

    /// Forwards one host input event. Ignored unless running.
    pub fn handle_event(&mut self, event: HostEvent) -> Result<(), HostError> {
        self.guarded(|host| {
            if !host.lifecycle.is_running() {
                return Ok(());
            }

            match event {
                HostEvent::Key { key, down } => host.key(&key, down),
                HostEvent::MouseMove { client_x, client_y } => {
                    host.input.pointer = host.to_backing(client_x, client_y);
                    Ok(())
                }
                HostEvent::MouseButton {
                    client_x,
                    client_y,
                    button,
                    down,
                } => host.mouse_button(client_x, client_y, button, down),
                HostEvent::TouchStart(changed) => host.touch_start(&changed),
                HostEvent::TouchMove(changed) => {
                    host.touch_move(&changed);
                    Ok(())
                }
                HostEvent::TouchEnd(changed) => host.touch_end(&changed),
            }
        })
    }

    /// Resumes a quit application. No-op in any other state.
    pub fn restart(&mut self) -> Result<(), HostError> {
        self.guarded(|host| {
            if host.lifecycle.state() != LifecycleState::Quit
                || !host.lifecycle.transition(LifecycleState::Running)
            {
                return Ok(());
            }

            if let Some(clip) = host.current_music {
                host.audio.play(clip);
            }
            host.bridge_mut()?
                .module()
                .on_restart()
                .context("module restart failed")?;
            host.drain_requests()?;
            host.surface.request_frame();
            Ok(())
        })
    }

    /// `Running → Quit`.
    fn quit(&mut self) {
        if !self.lifecycle.transition(LifecycleState::Quit) {
            return;
        }
        self.surface.exit_fullscreen();
        if let Some(clip) = self.current_music {
            self.audio.pause(clip);
        }
        if let Some(cb) = self.callbacks.quit.as_mut() {
            cb();
        }
    }

    /// Pushes the surface's fullscreen state to the module if it changed.
    pub(super) fn sync_fullscreen(&mut self) -> Result<(), HostError> {
        let now = self.surface.is_fullscreen();
        if self.fullscreen == Some(now) {
            return Ok(());
        }
        self.fullscreen = Some(now);
        self.bridge_mut()?.module().set_fullscreen_state(now)?;
        Ok(())
    }

    fn resize_if_changed(&mut self) -> Result<(), HostError> {
        let observed = DisplayGeometry::observe(
            self.surface.client_size(),
            self.surface.pixel_density(),
            self.config.min_surface_extent,
        );
        if self.geometry == Some(observed) {
            return Ok(());
        }
        self.geometry = Some(observed);

        let (width, height) = observed.backing_size();
        log::debug!("surface resized to {width}x{height}");
        self.surface.set_backing_size(width, height);
        self.graphics.set_viewport(width, height);
        self.bridge_mut()?.module().on_resize(width, height)?;
        self.drain_requests()
    }

    /// Rescales displayed coordinates to backing-surface pixels.
    fn to_backing(&self, client_x: f64, client_y: f64) -> (f64, f64) {
        let (bw, bh) = self.surface.backing_size();
        let (cw, ch) = self.surface.client_size();
        let ratio = |backing: u32, client: f64| {
            if client > 0.0 {
                f64::from(backing) / client
            } else {
                1.0
            }
        };
        (client_x * ratio(bw, cw), client_y * ratio(bh, ch))
    }

    fn pointer_px(&self) -> (i32, i32) {
        let (x, y) = self.input.pointer;
        (x as i32, y as i32)
    }

    /// Applies a "continue" flag returned by an input entry point.
    fn after_input(&mut self, continuing: bool) -> Result<(), HostError> {
        self.drain_requests()?;
        if !continuing {
            self.quit();
        }
        Ok(())
    }

    fn key(&mut self, key: &str, down: bool) -> Result<(), HostError> {
        let Some(code) = key_code(key) else {
            return Ok(());
        };
        let continuing = self.bridge_mut()?.module().on_key(code, down)?;
        self.after_input(continuing)
    }

    fn mouse_button(
        &mut self,
        client_x: f64,
        client_y: f64,
        button: i32,
        down: bool,
    ) -> Result<(), HostError> {
        self.input.pointer = self.to_backing(client_x, client_y);
        let (x, y) = self.pointer_px();
        let continuing = self
            .bridge_mut()?
            .module()
            .on_mouse_event(x, y, button, down)?;
        self.after_input(continuing)
    }

    fn touch_point(&self, touch: &HostTouch) -> TouchPoint {
        let (x, y) = self.to_backing(touch.client_x, touch.client_y);
        TouchPoint { id: touch.id, x, y }
    }

    fn forward_touches(&mut self, down: bool) -> Result<(), HostError> {
        let touches = self.input.touches_json()?;
        let bridge = self.bridge_mut()?;
        let handle = bridge.write_string(&touches)?;
        let continuing = bridge.module().on_touch_event(handle, down)?;
        self.after_input(continuing)
    }

    fn primary(changed: &[HostTouch]) -> Option<HostTouch> {
        changed.iter().copied().find(|t| t.id == PRIMARY_TOUCH)
    }

    fn touch_start(&mut self, changed: &[HostTouch]) -> Result<(), HostError> {
        if changed.is_empty() {
            return Ok(());
        }
        for touch in changed {
            let point = self.touch_point(touch);
            self.input.upsert_touch(point);
        }

        self.forward_touches(true)?;

        if let Some(primary) = Self::primary(changed) {
            if self.config.use_mouse_on_touch && self.lifecycle.is_running() {
                self.mouse_button(primary.client_x, primary.client_y, 0, true)?;
            }
        }
        Ok(())
    }

    /// Moves touches that are already down; unknown ids are dropped. The module
    /// sees the new positions on the next `update`.
    fn touch_move(&mut self, changed: &[HostTouch]) {
        if !self.input.has_touches() {
            return;
        }
        for touch in changed {
            let point = self.touch_point(touch);
            self.input.move_touch(point);
        }

        if let Some(primary) = Self::primary(changed) {
            if self.config.use_mouse_on_touch {
                self.input.pointer = self.to_backing(primary.client_x, primary.client_y);
            }
        }
    }

    fn touch_end(&mut self, changed: &[HostTouch]) -> Result<(), HostError> {
        if !self.input.has_touches() {
            return Ok(());
        }
        for touch in changed {
            self.input.remove_touch(touch.id);
        }

        self.forward_touches(false)?;

        if let Some(primary) = Self::primary(changed) {
            if self.config.use_mouse_on_touch && self.lifecycle.is_running() {
                self.mouse_button(primary.client_x, primary.client_y, 0, false)?;
            }
        }
        Ok(())
    }
}
