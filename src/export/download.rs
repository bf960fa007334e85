use std::path::{Path, PathBuf};

use crate::export::capture::{Blob, DownloadSink};
use crate::foundation::error::{CardError, CardResult};

/// Writes exports into a directory, the way a browser drops downloads into one.
#[derive(Clone, Debug)]
pub struct DirectoryDownloads {
    dir: PathBuf,
}

impl DirectoryDownloads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectoryDownloads {
    fn deliver(&mut self, file_name: &str, blob: &Blob) -> CardResult<PathBuf> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) {
            return Err(CardError::validation(format!(
                "download name must be a plain file name, got '{file_name}'"
            )));
        }
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, &blob.bytes)?;
        tracing::debug!(path = %path.display(), bytes = blob.len(), mime = blob.mime, "download written");
        Ok(path)
    }
}

/// Keeps delivered exports in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryDownloads {
    pub delivered: Vec<(String, Blob)>,
}

impl MemoryDownloads {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DownloadSink for MemoryDownloads {
    fn deliver(&mut self, file_name: &str, blob: &Blob) -> CardResult<PathBuf> {
        self.delivered.push((file_name.to_string(), blob.clone()));
        Ok(PathBuf::from(file_name))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/download.rs"]
mod tests;
