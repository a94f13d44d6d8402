//! Contract between the host and the compiled application module.
//!
//! The module is an external collaborator: it owns a linear memory region and
//! exposes fixed entry points. The host never owns allocations inside that memory;
//! it only reads and writes through the offsets the module hands out.
//!
//! Calls the module makes back into the host (draw, audio, saved data, ...) are
//! buffered as [`HostRequest`]s and drained by the host after each entry call.

use anyhow::Result;

/// Opaque handle to a module-owned string buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct StringHandle(pub u32);

/// Byte offset into module memory.
pub type Offset = usize;

/// Host services requested by the module during an entry call.
#[derive(Debug, Clone, PartialEq)]
pub enum HostRequest {
    SetScissor { x: i32, y: i32, width: i32, height: i32 },
    Clear { r: f32, g: f32, b: f32 },
    /// Sprite vertices packed in module memory.
    DrawSprites { offset: Offset, len: usize },
    /// Starts a music clip, replacing the current one.
    PlayMusic { id: u16, looped: bool },
    StopMusic,
    PlaySound(u16),
    RequestFullscreen,
    CancelFullscreen,
    /// Byte range of module memory to persist as saved data.
    WriteSavedData { offset: Offset, len: usize },
    /// NUL-terminated message in module memory.
    Log { offset: Offset },
}

/// Entry points exposed by a loaded application module.
///
/// Boolean returns from `update` and the input entry points mean "continue";
/// `false` asks the host to quit.
pub trait RuntimeModule {
    fn memory(&self) -> &[u8];
    fn memory_mut(&mut self) -> &mut [u8];

    /// Drains host requests made since the last call.
    fn take_requests(&mut self) -> Vec<HostRequest>;

    fn is_application_registered(&mut self) -> Result<bool>;
    fn entry_main(&mut self) -> Result<()>;
    fn init(&mut self) -> Result<()>;
    fn on_resize(&mut self, width: u32, height: u32) -> Result<()>;
    fn update(&mut self, timestamp_ms: f64, x: i32, y: i32, touches: StringHandle) -> Result<bool>;
    fn on_key(&mut self, code: u8, down: bool) -> Result<bool>;
    fn on_mouse_event(&mut self, x: i32, y: i32, button: i32, down: bool) -> Result<bool>;
    fn on_touch_event(&mut self, touches: StringHandle, down: bool) -> Result<bool>;
    fn on_restart(&mut self) -> Result<()>;

    /// Tells the module whether the surface is fullscreen. The host calls this
    /// before `init` and whenever the state changes, ahead of the next `update`.
    fn set_fullscreen_state(&mut self, fullscreen: bool) -> Result<()>;

    fn music_clip_count(&mut self) -> Result<u16>;
    fn sound_clip_count(&mut self) -> Result<u16>;

    /// Offset of a NUL-terminated vertex shader source.
    fn vertex_shader_source(&mut self) -> Result<Offset>;
    /// Offset of a NUL-terminated fragment shader source.
    fn fragment_shader_source(&mut self) -> Result<Offset>;

    /// Reserves `len` bytes for saved data and returns their offset.
    fn cookie_data_offset(&mut self, len: usize) -> Result<Offset>;

    /// Atlas size the module expects, in bytes.
    fn atlas_byte_size(&mut self) -> Result<usize>;
    /// Reserves `len` bytes for the atlas and returns their offset.
    fn atlas_data_offset(&mut self, len: usize) -> Result<Offset>;

    fn allocate_string(&mut self, len: usize) -> Result<StringHandle>;
    fn string_data_offset(&mut self, handle: StringHandle) -> Result<Offset>;
    fn string_byte_length(&mut self, handle: StringHandle) -> Result<usize>;
}

/// Instantiates modules from their binary image.
pub trait ModuleFactory {
    fn instantiate(&mut self, image: &[u8]) -> Result<Box<dyn RuntimeModule>>;
}
