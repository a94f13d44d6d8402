use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use winit::window::{Fullscreen, Window};

use crate::backend::Surface;

/// `Surface` over a winit window.
///
/// The backing size is whatever the host last set; the graphics backend reads it
/// through [`WindowSurface::backing_size`] when it configures its render target.
pub struct WindowSurface {
    window: Arc<Window>,
    backing: (u32, u32),
    input_attached: Rc<Cell<bool>>,
}

impl WindowSurface {
    pub fn new(window: Arc<Window>) -> Self {
        let size = window.inner_size();
        Self {
            window,
            backing: (size.width, size.height),
            input_attached: Rc::new(Cell::new(false)),
        }
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Flag flipped when the host starts accepting input.
    pub(crate) fn input_gate(&self) -> Rc<Cell<bool>> {
        self.input_attached.clone()
    }
}

impl Surface for WindowSurface {
    fn client_size(&self) -> (f64, f64) {
        let logical = self
            .window
            .inner_size()
            .to_logical::<f64>(self.window.scale_factor());
        (logical.width, logical.height)
    }

    fn pixel_density(&self) -> f64 {
        self.window.scale_factor()
    }

    fn backing_size(&self) -> (u32, u32) {
        self.backing
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.backing = (width, height);
    }

    fn request_frame(&mut self) {
        self.window.request_redraw();
    }

    fn is_fullscreen(&self) -> bool {
        self.window.fullscreen().is_some()
    }

    fn request_fullscreen(&mut self) {
        self.window.set_fullscreen(Some(Fullscreen::Borderless(None)));
    }

    fn exit_fullscreen(&mut self) {
        if self.is_fullscreen() {
            self.window.set_fullscreen(None);
        }
    }

    fn attach_input(&mut self) {
        self.input_attached.set(true);
    }
}
