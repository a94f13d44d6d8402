use std::path::PathBuf;

use anyhow::{anyhow, Result};
use futures::future::BoxFuture;

use crate::config::HostConfig;

/// Byte source for resource requests.
///
/// Implementations try `candidates` in order and resolve with the first one that
/// can be read. Futures are `'static` so they can be joined independently.
pub trait AssetSource {
    fn fetch(&self, candidates: &[PathBuf]) -> BoxFuture<'static, Result<Vec<u8>>>;
}

/// Reads assets from a directory on disk.
#[derive(Debug, Clone)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Source rooted at the configured asset directory.
    pub fn from_config(config: &HostConfig) -> Self {
        Self::new(&config.asset_dir)
    }
}

impl AssetSource for FsAssetSource {
    fn fetch(&self, candidates: &[PathBuf]) -> BoxFuture<'static, Result<Vec<u8>>> {
        let paths: Vec<PathBuf> = candidates.iter().map(|c| self.root.join(c)).collect();

        Box::pin(async move {
            let mut last_err = None;
            for path in &paths {
                match std::fs::read(path) {
                    Ok(bytes) => {
                        log::debug!("read {} ({} bytes)", path.display(), bytes.len());
                        return Ok(bytes);
                    }
                    Err(e) => {
                        last_err =
                            Some(anyhow::Error::new(e).context(format!("reading {}", path.display())))
                    }
                }
            }
            let err = last_err.unwrap_or_else(|| anyhow!("no candidate files"));
            Err(err.context("no candidate could be read"))
        })
    }
}
