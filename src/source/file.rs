//! Configuration files, with the format taken from the extension.

use std::path::{Path, PathBuf};
use tracing::debug;

use super::{BufferSource, Source};
use crate::error::{ConfigError, Result};
use crate::flatten::FlatMap;

/// A JSON or YAML file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    required: bool,
}

impl FileSource {
    /// A file that must exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: true,
        }
    }

    /// A file that contributes nothing when it does not exist.
    ///
    /// Any other read failure is still an error.
    pub fn optional(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Extension of the path, lower-cased and without its dot.
    fn extension(&self) -> Result<String> {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| ConfigError::UnsupportedFormat(self.path.display().to_string()))
    }
}

impl Source for FileSource {
    fn overlay(&self, flat: FlatMap) -> Result<FlatMap> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if !self.required && e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "optional config file not found");
                return Ok(flat);
            }
            Err(e) => return Err(ConfigError::io(&self.path, e)),
        };
        let extension = self.extension()?;
        debug!(path = %self.path.display(), "applying file source");
        BufferSource::new(bytes, extension).overlay(flat)
    }
}
