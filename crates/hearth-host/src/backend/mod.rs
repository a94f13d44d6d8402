//! Platform collaborators driven by the host.
//!
//! Each trait is a thin seam over a platform API. The host decides when to call
//! them; implementations only perform the call.

mod vertex;

pub use vertex::{decode_sprite_vertices, SpriteVertex, SPRITE_VERTEX_STRIDE};

use anyhow::Result;

use crate::load::ClipId;

/// Decoded RGBA8 texture ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    /// Decodes an encoded image (PNG, JPEG, ...) into RGBA8.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            width,
            height,
            rgba: img.into_raw(),
        })
    }
}

/// Sprite renderer backend.
pub trait GraphicsBackend {
    fn upload_texture(&mut self, texture: &TextureImage) -> Result<()>;
    fn compile_program(&mut self, vertex_src: &str, fragment_src: &str) -> Result<()>;
    /// Rebinds the sprite vertex layout to the program.
    fn bind_vertex_attributes(&mut self) -> Result<()>;
    fn set_viewport(&mut self, width: u32, height: u32);
    fn set_scissor(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn clear(&mut self, r: f32, g: f32, b: f32);
    fn draw_sprites(&mut self, vertices: &[SpriteVertex]) -> Result<()>;
}

/// Audio playback backend.
pub trait AudioBackend {
    /// Registers encoded clip data under `id`.
    fn register(&mut self, id: ClipId, data: Vec<u8>, looped: bool) -> Result<()>;
    fn set_looping(&mut self, id: ClipId, looped: bool);
    fn play(&mut self, id: ClipId);
    fn pause(&mut self, id: ClipId);
    fn stop(&mut self, id: ClipId);
}

/// Display surface and host page services.
pub trait Surface {
    /// Displayed size in device-independent units.
    fn client_size(&self) -> (f64, f64);
    fn pixel_density(&self) -> f64;

    /// Backing store size in device pixels.
    fn backing_size(&self) -> (u32, u32);
    fn set_backing_size(&mut self, width: u32, height: u32);

    /// Asks for one more frame callback at the next display refresh.
    fn request_frame(&mut self);

    fn is_fullscreen(&self) -> bool;
    fn request_fullscreen(&mut self);
    fn exit_fullscreen(&mut self);

    /// Starts delivering keyboard/pointer/touch events to the host.
    fn attach_input(&mut self);
}
