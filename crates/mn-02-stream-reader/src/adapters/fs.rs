//! Directory-backed `StreamFileSource`.

use crate::domain::errors::StreamFileError;
use crate::ports::outbound::StreamFileSource;
use std::path::{Path, PathBuf};

/// Lists files with one extension in a single directory.
#[derive(Debug, Clone)]
pub struct DirectoryStreamSource {
    directory: PathBuf,
    extension: String,
}

impl DirectoryStreamSource {
    pub fn new(directory: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            extension: extension.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn io_error(&self, name: &str, source: std::io::Error) -> StreamFileError {
        StreamFileError::Io {
            file: name.to_string(),
            source,
        }
    }
}

impl StreamFileSource for DirectoryStreamSource {
    fn list(&self, after: Option<&str>) -> Result<Vec<String>, StreamFileError> {
        let directory = self.directory.display().to_string();
        if !self.directory.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.directory).map_err(|e| self.io_error(&directory, e))? {
            let path = entry.map_err(|e| self.io_error(&directory, e))?.path();
            let extension = path.extension().and_then(|e| e.to_str());
            if !path.is_file() || extension != Some(self.extension.as_str()) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if after.map_or(true, |after| name > after) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, StreamFileError> {
        std::fs::read(self.directory.join(name)).map_err(|e| self.io_error(name, e))
    }
}
