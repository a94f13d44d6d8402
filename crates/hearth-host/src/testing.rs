//! Recording doubles for the module and the platform collaborators.
//!
//! Every double keeps its observable state behind an `Rc<RefCell<_>>` so a test
//! can hand the double to the host and keep a probe on what it saw.

use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::{anyhow, bail, Result};

use crate::backend::{AudioBackend, GraphicsBackend, SpriteVertex, Surface, TextureImage};
use crate::bridge::{read_bytes, write_bytes};
use crate::bridge::SavedDataStore;
use crate::config::HostConfig;
use crate::host::{Collaborators, Host};
use crate::load::ClipId;
use crate::module::{HostRequest, ModuleFactory, Offset, RuntimeModule, StringHandle};

pub const VERTEX_SRC: &str = "attribute vec2 vert; void main() {}";
pub const FRAGMENT_SRC: &str = "precision mediump float; void main() {}";

const MEMORY_SIZE: usize = 64 * 1024;
/// Start of the region tests may write into directly.
pub const SCRATCH: Offset = 48 * 1024;

/// A tiny encoded PNG.
pub fn png_bytes() -> Vec<u8> {
    let mut png = Vec::new();
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
    img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .expect("encode test png");
    png
}

// ── module ──────────────────────────────────────────────────────────────

/// What the mock module was asked, and how it should answer.
#[derive(Debug)]
pub struct MockState {
    pub calls: Vec<String>,
    pub registered: bool,
    pub register_on_main: bool,

    pub music: u16,
    pub sound: u16,
    pub atlas_size: usize,

    pub continue_updates: bool,
    pub continue_input: bool,
    /// Entry point that returns an error when called.
    pub fail_on: Option<String>,
    /// Requests issued the next time the named entry point runs.
    pub scripted: HashMap<String, Vec<HostRequest>>,
    /// Bytes copied into memory before the next request drain.
    pub staged_bytes: Vec<(Offset, Vec<u8>)>,

    pub images: Vec<Vec<u8>>,
    pub resizes: Vec<(u32, u32)>,
    pub updates: Vec<(f64, i32, i32, String)>,
    pub keys: Vec<(u8, bool)>,
    pub mouse: Vec<(i32, i32, i32, bool)>,
    pub touch_events: Vec<(String, bool)>,
    pub fullscreen_states: Vec<bool>,

    pub cookie_requests: Vec<usize>,
    pub cookie_offset: Option<Offset>,
    pub atlas_offset: Option<Offset>,

    pending: Vec<HostRequest>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            registered: false,
            register_on_main: false,
            music: 0,
            sound: 0,
            atlas_size: 4,
            continue_updates: true,
            continue_input: true,
            fail_on: None,
            scripted: HashMap::new(),
            staged_bytes: Vec::new(),
            images: Vec::new(),
            resizes: Vec::new(),
            updates: Vec::new(),
            keys: Vec::new(),
            mouse: Vec::new(),
            touch_events: Vec::new(),
            fullscreen_states: Vec::new(),
            cookie_requests: Vec::new(),
            cookie_offset: None,
            atlas_offset: None,
            pending: Vec::new(),
        }
    }
}

impl MockState {
    /// Issues `requests` the next time `entry` runs.
    pub fn script(&mut self, entry: &str, requests: Vec<HostRequest>) {
        self.scripted.entry(entry.to_string()).or_default().extend(requests);
    }

    pub fn count(&self, entry: &str) -> usize {
        self.calls.iter().filter(|c| *c == entry).count()
    }
}

/// Module with a local linear memory and a bump allocator.
pub struct MockModule {
    state: Rc<RefCell<MockState>>,
    memory: Vec<u8>,
    next: Offset,
    strings: HashMap<u32, (Offset, usize)>,
    vertex_src: Offset,
    fragment_src: Offset,
}

impl MockModule {
    pub fn new() -> Self {
        Self::with_state(Rc::new(RefCell::new(MockState::default())))
    }

    pub fn with_state(state: Rc<RefCell<MockState>>) -> Self {
        let mut module = Self {
            state,
            memory: vec![0; MEMORY_SIZE],
            next: 16,
            strings: HashMap::new(),
            vertex_src: 0,
            fragment_src: 0,
        };
        module.vertex_src = module.place_c_str(VERTEX_SRC);
        module.fragment_src = module.place_c_str(FRAGMENT_SRC);
        module
    }

    pub fn shared(&self) -> Rc<RefCell<MockState>> {
        self.state.clone()
    }

    pub fn state(&self) -> Ref<'_, MockState> {
        self.state.borrow()
    }

    fn place_c_str(&mut self, s: &str) -> Offset {
        let offset = self.next;
        self.memory[offset..offset + s.len()].copy_from_slice(s.as_bytes());
        self.next += s.len() + 1;
        offset
    }

    fn alloc(&mut self, len: usize) -> Result<Offset> {
        let offset = self.next;
        if offset + len > SCRATCH {
            bail!("mock module out of memory");
        }
        self.next += len.max(1);
        Ok(offset)
    }

    /// Records an entry call, failing if the test asked it to.
    fn enter(&mut self, name: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(name.to_string());
        if state.fail_on.as_deref() == Some(name) {
            return Err(anyhow!("{name} trapped"));
        }
        if let Some(requests) = state.scripted.remove(name) {
            state.pending.extend(requests);
        }
        Ok(())
    }

    fn string_at(&self, handle: StringHandle) -> Result<String> {
        let (offset, len) = *self
            .strings
            .get(&handle.0)
            .ok_or_else(|| anyhow!("unknown string handle {handle:?}"))?;
        Ok(String::from_utf8(read_bytes(&self.memory, offset, len)?.to_vec())?)
    }
}

impl RuntimeModule for MockModule {
    fn memory(&self) -> &[u8] {
        &self.memory
    }

    fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    fn take_requests(&mut self) -> Vec<HostRequest> {
        let mut state = self.state.borrow_mut();
        for (offset, bytes) in state.staged_bytes.drain(..) {
            write_bytes(&mut self.memory, offset, &bytes).expect("staged bytes fit");
        }
        std::mem::take(&mut state.pending)
    }

    fn is_application_registered(&mut self) -> Result<bool> {
        Ok(self.state.borrow().registered)
    }

    fn entry_main(&mut self) -> Result<()> {
        self.enter("entry_main")?;
        let mut state = self.state.borrow_mut();
        if state.register_on_main {
            state.registered = true;
        }
        Ok(())
    }

    fn init(&mut self) -> Result<()> {
        self.enter("init")
    }

    fn on_resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.enter("on_resize")?;
        self.state.borrow_mut().resizes.push((width, height));
        Ok(())
    }

    fn update(&mut self, timestamp_ms: f64, x: i32, y: i32, touches: StringHandle) -> Result<bool> {
        self.enter("update")?;
        let touches = self.string_at(touches)?;
        let mut state = self.state.borrow_mut();
        state.updates.push((timestamp_ms, x, y, touches));
        Ok(state.continue_updates)
    }

    fn on_key(&mut self, code: u8, down: bool) -> Result<bool> {
        self.enter("on_key")?;
        let mut state = self.state.borrow_mut();
        state.keys.push((code, down));
        Ok(state.continue_input)
    }

    fn on_mouse_event(&mut self, x: i32, y: i32, button: i32, down: bool) -> Result<bool> {
        self.enter("on_mouse_event")?;
        let mut state = self.state.borrow_mut();
        state.mouse.push((x, y, button, down));
        Ok(state.continue_input)
    }

    fn on_touch_event(&mut self, touches: StringHandle, down: bool) -> Result<bool> {
        self.enter("on_touch_event")?;
        let touches = self.string_at(touches)?;
        let mut state = self.state.borrow_mut();
        state.touch_events.push((touches, down));
        Ok(state.continue_input)
    }

    fn on_restart(&mut self) -> Result<()> {
        self.enter("on_restart")
    }

    fn set_fullscreen_state(&mut self, fullscreen: bool) -> Result<()> {
        self.state.borrow_mut().fullscreen_states.push(fullscreen);
        Ok(())
    }

    fn music_clip_count(&mut self) -> Result<u16> {
        Ok(self.state.borrow().music)
    }

    fn sound_clip_count(&mut self) -> Result<u16> {
        Ok(self.state.borrow().sound)
    }

    fn vertex_shader_source(&mut self) -> Result<Offset> {
        Ok(self.vertex_src)
    }

    fn fragment_shader_source(&mut self) -> Result<Offset> {
        Ok(self.fragment_src)
    }

    fn cookie_data_offset(&mut self, len: usize) -> Result<Offset> {
        let offset = self.alloc(len)?;
        let mut state = self.state.borrow_mut();
        state.cookie_requests.push(len);
        state.cookie_offset = Some(offset);
        Ok(offset)
    }

    fn atlas_byte_size(&mut self) -> Result<usize> {
        Ok(self.state.borrow().atlas_size)
    }

    fn atlas_data_offset(&mut self, len: usize) -> Result<Offset> {
        let offset = self.alloc(len)?;
        self.state.borrow_mut().atlas_offset = Some(offset);
        Ok(offset)
    }

    fn allocate_string(&mut self, len: usize) -> Result<StringHandle> {
        let offset = self.alloc(len)?;
        let handle = StringHandle(self.strings.len() as u32);
        self.strings.insert(handle.0, (offset, len));
        Ok(handle)
    }

    fn string_data_offset(&mut self, handle: StringHandle) -> Result<Offset> {
        self.strings
            .get(&handle.0)
            .map(|(offset, _)| *offset)
            .ok_or_else(|| anyhow!("unknown string handle {handle:?}"))
    }

    fn string_byte_length(&mut self, handle: StringHandle) -> Result<usize> {
        self.strings
            .get(&handle.0)
            .map(|(_, len)| *len)
            .ok_or_else(|| anyhow!("unknown string handle {handle:?}"))
    }
}

/// Hands out mock modules sharing one state.
pub struct MockFactory(pub Rc<RefCell<MockState>>);

impl ModuleFactory for MockFactory {
    fn instantiate(&mut self, image: &[u8]) -> Result<Box<dyn RuntimeModule>> {
        {
            let mut state = self.0.borrow_mut();
            state.images.push(image.to_vec());
            if state.fail_on.as_deref() == Some("instantiate") {
                bail!("image rejected");
            }
        }
        Ok(Box::new(MockModule::with_state(self.0.clone())))
    }
}

// ── graphics ────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct GraphicsLog {
    pub textures: Vec<(u32, u32)>,
    pub programs: Vec<(String, String)>,
    pub attribute_binds: usize,
    pub viewports: Vec<(u32, u32)>,
    pub scissors: Vec<(i32, i32, i32, i32)>,
    pub clears: Vec<(f32, f32, f32)>,
    pub draws: Vec<Vec<SpriteVertex>>,
}

#[derive(Clone, Default)]
pub struct MockGraphics(pub Rc<RefCell<GraphicsLog>>);

impl GraphicsBackend for MockGraphics {
    fn upload_texture(&mut self, texture: &TextureImage) -> Result<()> {
        self.0.borrow_mut().textures.push((texture.width, texture.height));
        Ok(())
    }

    fn compile_program(&mut self, vertex_src: &str, fragment_src: &str) -> Result<()> {
        self.0
            .borrow_mut()
            .programs
            .push((vertex_src.to_string(), fragment_src.to_string()));
        Ok(())
    }

    fn bind_vertex_attributes(&mut self) -> Result<()> {
        self.0.borrow_mut().attribute_binds += 1;
        Ok(())
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.0.borrow_mut().viewports.push((width, height));
    }

    fn set_scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.0.borrow_mut().scissors.push((x, y, width, height));
    }

    fn clear(&mut self, r: f32, g: f32, b: f32) {
        self.0.borrow_mut().clears.push((r, g, b));
    }

    fn draw_sprites(&mut self, vertices: &[SpriteVertex]) -> Result<()> {
        self.0.borrow_mut().draws.push(vertices.to_vec());
        Ok(())
    }
}

// ── audio ───────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AudioEvent {
    Loop(ClipId, bool),
    Play(ClipId),
    Pause(ClipId),
    Stop(ClipId),
}

#[derive(Debug, Default)]
pub struct AudioLog {
    pub registered: Vec<(ClipId, bool)>,
    pub events: Vec<AudioEvent>,
}

#[derive(Clone, Default)]
pub struct MockAudio(pub Rc<RefCell<AudioLog>>);

impl AudioBackend for MockAudio {
    fn register(&mut self, id: ClipId, _data: Vec<u8>, looped: bool) -> Result<()> {
        self.0.borrow_mut().registered.push((id, looped));
        Ok(())
    }

    fn set_looping(&mut self, id: ClipId, looped: bool) {
        self.0.borrow_mut().events.push(AudioEvent::Loop(id, looped));
    }

    fn play(&mut self, id: ClipId) {
        self.0.borrow_mut().events.push(AudioEvent::Play(id));
    }

    fn pause(&mut self, id: ClipId) {
        self.0.borrow_mut().events.push(AudioEvent::Pause(id));
    }

    fn stop(&mut self, id: ClipId) {
        self.0.borrow_mut().events.push(AudioEvent::Stop(id));
    }
}

// ── surface ─────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct SurfaceState {
    pub client: (f64, f64),
    pub density: f64,
    pub backing: (u32, u32),
    pub frame_requests: usize,
    pub fullscreen: bool,
    pub fullscreen_exits: usize,
    pub input_attached: usize,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            client: (200.0, 100.0),
            density: 1.0,
            backing: (300, 150),
            frame_requests: 0,
            fullscreen: false,
            fullscreen_exits: 0,
            input_attached: 0,
        }
    }
}

#[derive(Clone, Default)]
pub struct MockSurface(pub Rc<RefCell<SurfaceState>>);

impl Surface for MockSurface {
    fn client_size(&self) -> (f64, f64) {
        self.0.borrow().client
    }

    fn pixel_density(&self) -> f64 {
        self.0.borrow().density
    }

    fn backing_size(&self) -> (u32, u32) {
        self.0.borrow().backing
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.0.borrow_mut().backing = (width, height);
    }

    fn request_frame(&mut self) {
        self.0.borrow_mut().frame_requests += 1;
    }

    fn is_fullscreen(&self) -> bool {
        self.0.borrow().fullscreen
    }

    fn request_fullscreen(&mut self) {
        self.0.borrow_mut().fullscreen = true;
    }

    fn exit_fullscreen(&mut self) {
        let mut state = self.0.borrow_mut();
        state.fullscreen = false;
        state.fullscreen_exits += 1;
    }

    fn attach_input(&mut self) {
        self.0.borrow_mut().input_attached += 1;
    }
}

// ── saved data ──────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct SavedLog {
    stored: Option<String>,
    failing: bool,
    written: Vec<String>,
}

#[derive(Clone, Default)]
pub struct MemorySavedData(Rc<RefCell<SavedLog>>);

impl MemorySavedData {
    pub fn with(data: String) -> Self {
        let store = Self::default();
        store.0.borrow_mut().stored = Some(data);
        store
    }

    /// A store whose reads always fail.
    pub fn failing() -> Self {
        let store = Self::default();
        store.0.borrow_mut().failing = true;
        store
    }

    pub fn written(&self) -> Vec<String> {
        self.0.borrow().written.clone()
    }
}

impl SavedDataStore for MemorySavedData {
    fn read(&mut self) -> Result<Option<String>> {
        let log = self.0.borrow();
        if log.failing {
            bail!("storage unavailable");
        }
        Ok(log.stored.clone())
    }

    fn write(&mut self, data: String) -> Result<()> {
        let mut log = self.0.borrow_mut();
        log.stored = Some(data.clone());
        log.written.push(data);
        Ok(())
    }
}

// ── harness ─────────────────────────────────────────────────────────────

/// Probes on every collaborator of a host built with [`Harness::host`].
pub struct Harness {
    pub module: Rc<RefCell<MockState>>,
    pub graphics: Rc<RefCell<GraphicsLog>>,
    pub audio: Rc<RefCell<AudioLog>>,
    pub surface: Rc<RefCell<SurfaceState>>,
    pub saved: MemorySavedData,
}

impl Harness {
    /// A harness whose module registers its application from `main`.
    pub fn new() -> Self {
        let state = MockState {
            register_on_main: true,
            ..MockState::default()
        };
        Self {
            module: Rc::new(RefCell::new(state)),
            graphics: Rc::default(),
            audio: Rc::default(),
            surface: Rc::default(),
            saved: MemorySavedData::default(),
        }
    }

    pub fn host(&self) -> Host {
        self.host_with(HostConfig::default())
    }

    pub fn host_with(&self, config: HostConfig) -> Host {
        let collaborators = Collaborators {
            modules: Box::new(MockFactory(self.module.clone())),
            graphics: Box::new(MockGraphics(self.graphics.clone())),
            audio: Box::new(MockAudio(self.audio.clone())),
            surface: Box::new(MockSurface(self.surface.clone())),
            saved_data: Box::new(self.saved.clone()),
        };
        Host::new(config, collaborators)
    }
}
