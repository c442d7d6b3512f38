//! Filesystem input source.
//!
//! Every regular file directly inside the directory is one item. Names are
//! returned sorted so batch output is stable across runs and platforms.

use std::path::{Path, PathBuf};

use crate::error::HostError;
use crate::input_source::InputSource;

/// Reads batch items from a directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl InputSource for DirSource {
    fn names(&self) -> Result<Vec<String>, HostError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| {
            HostError::Source(format!("cannot list {}: {}", self.dir.display(), e))
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                HostError::Source(format!("cannot list {}: {}", self.dir.display(), e))
            })?;
            let file_type = entry.file_type().map_err(|e| {
                HostError::Source(format!("cannot stat {}: {}", entry.path().display(), e))
            })?;
            if !file_type.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => {
                    tracing::warn!(name = ?raw, "skipping input with non UTF-8 file name");
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, HostError> {
        let path = self.dir.join(name);
        std::fs::read(&path)
            .map_err(|e| HostError::Source(format!("cannot read {}: {}", path.display(), e)))
    }
}
