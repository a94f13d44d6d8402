use std::path::PathBuf;

use anyhow::{Context, Result};
use base64::Engine;

use super::marshal::{read_bytes, write_bytes};
use crate::module::{Offset, RuntimeModule};

/// External persistence for the module's save data.
///
/// The host stores save data as a cookie-safe base64 string.
pub trait SavedDataStore {
    /// Returns the stored string, `None` if nothing was saved.
    fn read(&mut self) -> Result<Option<String>>;
    fn write(&mut self, data: String) -> Result<()>;
}

/// Save data kept in a single file.
#[derive(Debug, Clone)]
pub struct FileSavedData {
    path: PathBuf,
}

impl FileSavedData {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SavedDataStore for FileSavedData {
    fn read(&mut self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) => Ok(Some(s.trim_end().to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", self.path.display())),
        }
    }

    fn write(&mut self, data: String) -> Result<()> {
        std::fs::write(&self.path, data)
            .with_context(|| format!("writing {}", self.path.display()))
    }
}

/// Standard base64 with `=` padding written as `.` so the value is cookie-safe.
pub fn encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD
        .encode(bytes)
        .replace('=', ".")
}

pub fn decode(s: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(s.replace('.', "="))
        .context("saved data is not valid base64")
}

/// Reads saved data from `store`, best effort.
///
/// Missing, oversized (`> max_len` characters) and undecodable data all read
/// as "nothing saved"; none of them is an error.
pub fn read_saved_bytes(store: &mut dyn SavedDataStore, max_len: usize) -> Option<Vec<u8>> {
    let encoded = match store.read() {
        Ok(Some(s)) => s,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("ignoring unreadable saved data: {e:#}");
            return None;
        }
    };

    if encoded.len() > max_len {
        log::warn!(
            "ignoring saved data of {} characters (limit {max_len})",
            encoded.len()
        );
        return None;
    }

    match decode(&encoded) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            log::warn!("ignoring corrupt saved data: {e:#}");
            None
        }
    }
}

/// Copies saved data into the buffer the module reserves for it.
///
/// Returns the number of bytes transferred, `None` if nothing was saved.
pub fn load_into_module(
    module: &mut dyn RuntimeModule,
    store: &mut dyn SavedDataStore,
    max_len: usize,
) -> Result<Option<usize>> {
    let Some(bytes) = read_saved_bytes(store, max_len) else {
        return Ok(None);
    };
    let offset = module
        .cookie_data_offset(bytes.len())
        .context("module failed to reserve saved data")?;
    write_bytes(module.memory_mut(), offset, &bytes)?;
    Ok(Some(bytes.len()))
}

/// Persists `memory[offset..offset + len]` through `store`.
pub fn export_from_memory(
    memory: &[u8],
    offset: Offset,
    len: usize,
    store: &mut dyn SavedDataStore,
) -> Result<()> {
    let bytes = read_bytes(memory, offset, len)?;
    store.write(encode(bytes))
}
