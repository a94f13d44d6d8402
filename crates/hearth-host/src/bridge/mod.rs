//! Runtime bridge: owns the loaded module and the marshalling protocol over its memory.
//!
//! Strings cross host→module as UTF-8 copied into module-allocated buffers and
//! module→host as NUL-terminated or length-prefixed byte ranges. Saved data and
//! the sprite atlas are fixed-size blob transfers into module-reserved buffers.

mod marshal;
mod saved_data;

pub use marshal::{read_bytes, read_c_str, read_string, transfer_blob, write_bytes, write_string};
pub use saved_data::{
    encode as encode_saved_data, export_from_memory, load_into_module, read_saved_bytes,
    FileSavedData, SavedDataStore,
};

use anyhow::{Context, Result};

use crate::module::{Offset, RuntimeModule, StringHandle};

/// Exclusive owner of the loaded module.
///
/// Dropping the bridge discards the module and every handle into its memory.
pub struct RuntimeBridge {
    module: Box<dyn RuntimeModule>,
}

impl RuntimeBridge {
    pub fn new(module: Box<dyn RuntimeModule>) -> Self {
        Self { module }
    }

    pub fn module(&mut self) -> &mut dyn RuntimeModule {
        self.module.as_mut()
    }

    pub fn write_string(&mut self, s: &str) -> Result<StringHandle> {
        write_string(self.module.as_mut(), s)
    }

    pub fn read_c_str(&self, offset: Offset) -> Result<String> {
        read_c_str(self.module.memory(), offset).map(|s| s.into_owned())
    }

    pub fn read_bytes(&self, offset: Offset, len: usize) -> Result<&[u8]> {
        read_bytes(self.module.memory(), offset, len)
    }

    /// Calls the registration predicate, running the module's main entry point
    /// once if the application is not registered yet.
    ///
    /// Returns `Ok(false)` if the module still has no application afterwards.
    pub fn ensure_registered(&mut self) -> Result<bool> {
        if self.module.is_application_registered()? {
            return Ok(true);
        }
        log::debug!("application not registered yet, invoking module main");
        self.module.entry_main().context("module main entry point failed")?;
        self.module.is_application_registered()
    }

    /// Copies the loaded atlas into the buffer the module reserves for it.
    pub fn transfer_atlas(&mut self, atlas: &[u8]) -> Result<()> {
        let expected = self.module.atlas_byte_size()?;
        transfer_blob(self.module.as_mut(), atlas, expected, |m, len| {
            m.atlas_data_offset(len)
        })
        .context("atlas transfer failed")
    }

    pub fn load_saved_data(
        &mut self,
        store: &mut dyn SavedDataStore,
        max_len: usize,
    ) -> Result<Option<usize>> {
        load_into_module(self.module.as_mut(), store, max_len)
    }

    pub fn export_saved_data(
        &self,
        offset: Offset,
        len: usize,
        store: &mut dyn SavedDataStore,
    ) -> Result<()> {
        export_from_memory(self.module.memory(), offset, len, store)
    }

    /// Reads both shader sources the module ships.
    pub fn shader_sources(&mut self) -> Result<(String, String)> {
        let vs = self.module.vertex_shader_source()?;
        let fs = self.module.fragment_shader_source()?;
        Ok((self.read_c_str(vs)?, self.read_c_str(fs)?))
    }
}
