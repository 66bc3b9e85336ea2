//! JSON file backend.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use wheel_core::Wheel;

use crate::WheelStore;
use crate::error::{StoreReadError, StoreWriteError};

/// Stores the wheel as a 4-space indented JSON file.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous document intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store for the given file. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl WheelStore for FileStore {
    fn identity(&self) -> String {
        format!("file:{}", self.path.display())
    }

    async fn load(&self) -> Result<Wheel, StoreReadError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreReadError::Missing(self.path.display().to_string()));
            }
            Err(source) => {
                return Err(StoreReadError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        Wheel::from_json(&text).map_err(|source| StoreReadError::Malformed {
            location: self.path.display().to_string(),
            source,
        })
    }

    async fn save(&self, wheel: &Wheel) -> Result<(), StoreWriteError> {
        let json = wheel.to_json_pretty()?;
        let io_err = |source| StoreWriteError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir).await.map_err(io_err)?;
            }
        }
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, json).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)?;
        tracing::debug!(path = %self.path.display(), options = wheel.len(), "wheel saved");
        Ok(())
    }
}
