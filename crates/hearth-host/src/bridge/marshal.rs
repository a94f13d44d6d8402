use std::borrow::Cow;

use anyhow::{bail, ensure, Context, Result};

use crate::module::{Offset, RuntimeModule, StringHandle};

/// Returns `memory[offset..offset + len]`, or an error if the range is out of bounds.
pub fn read_bytes(memory: &[u8], offset: Offset, len: usize) -> Result<&[u8]> {
    let end = offset
        .checked_add(len)
        .context("byte range overflows address space")?;
    memory
        .get(offset..end)
        .with_context(|| format!("range {offset}..{end} outside module memory ({} bytes)", memory.len()))
}

/// Copies `bytes` into `memory` at `offset`.
pub fn write_bytes(memory: &mut [u8], offset: Offset, bytes: &[u8]) -> Result<()> {
    let size = memory.len();
    let end = offset
        .checked_add(bytes.len())
        .context("byte range overflows address space")?;
    let dst = memory
        .get_mut(offset..end)
        .with_context(|| format!("range {offset}..{end} outside module memory ({size} bytes)"))?;
    dst.copy_from_slice(bytes);
    Ok(())
}

/// Reads a NUL-terminated UTF-8 string starting at `offset`.
///
/// Invalid sequences are replaced rather than rejected.
pub fn read_c_str(memory: &[u8], offset: Offset) -> Result<Cow<'_, str>> {
    let Some(tail) = memory.get(offset..) else {
        bail!("string offset {offset} outside module memory ({} bytes)", memory.len());
    };
    let Some(end) = tail.iter().position(|b| *b == 0) else {
        bail!("string at {offset} is not NUL-terminated");
    };
    Ok(String::from_utf8_lossy(&tail[..end]))
}

/// Transfers a host string into a module-allocated buffer.
///
/// The module allocates exactly the encoded byte length and keeps ownership of
/// the buffer; the returned handle is what string-taking entry points accept.
pub fn write_string(module: &mut dyn RuntimeModule, s: &str) -> Result<StringHandle> {
    let bytes = s.as_bytes();
    let handle = module
        .allocate_string(bytes.len())
        .context("module failed to allocate string")?;
    let offset = module
        .string_data_offset(handle)
        .context("module failed to report string offset")?;
    write_bytes(module.memory_mut(), offset, bytes)?;
    Ok(handle)
}

/// Reads a module-owned string back through its handle.
pub fn read_string(module: &mut dyn RuntimeModule, handle: StringHandle) -> Result<String> {
    let offset = module.string_data_offset(handle)?;
    let len = module.string_byte_length(handle)?;
    let bytes = read_bytes(module.memory(), offset, len)?;
    String::from_utf8(bytes.to_vec()).context("module string is not valid UTF-8")
}

/// Copies a fixed-size blob into the buffer the module reserves for it.
///
/// `expected` is the size the module asked for; a mismatch is an error so a
/// truncated or foreign blob never reaches the module.
pub fn transfer_blob(
    module: &mut dyn RuntimeModule,
    blob: &[u8],
    expected: usize,
    reserve: impl FnOnce(&mut dyn RuntimeModule, usize) -> Result<Offset>,
) -> Result<()> {
    ensure!(
        blob.len() == expected,
        "blob is {} bytes but the module expects {expected}",
        blob.len()
    );
    let offset = reserve(module, expected)?;
    write_bytes(module.memory_mut(), offset, blob)
}
