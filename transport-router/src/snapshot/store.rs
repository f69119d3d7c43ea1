//! JSON snapshot file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::SnapshotError;
use crate::catalog::{TransportBase, TransportBaseSnapshot};

/// The `serialization_settings` object of the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializationSettings {
    /// Path of the snapshot file.
    pub file: PathBuf,
}

/// Reads and writes a base snapshot at a fixed path.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save a base, replacing any previous snapshot.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self, base: &TransportBase) -> Result<(), SnapshotError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let json = serde_json::to_vec(&base.to_snapshot())?;
        std::fs::write(&self.path, &json).map_err(|source| self.io_error(source))?;

        debug!(
            path = %self.path.display(),
            bytes = json.len(),
            stops = base.router.stop_count(),
            "Snapshot saved"
        );
        Ok(())
    }

    /// Load a base saved by [`save`](Self::save).
    pub fn load(&self) -> Result<TransportBase, SnapshotError> {
        let json = std::fs::read(&self.path).map_err(|source| self.io_error(source))?;
        let snapshot: TransportBaseSnapshot = serde_json::from_slice(&json)?;
        let base = TransportBase::from_snapshot(snapshot)?;

        debug!(
            path = %self.path.display(),
            bytes = json.len(),
            stops = base.router.stop_count(),
            "Snapshot loaded"
        );
        Ok(base)
    }

    fn io_error(&self, source: std::io::Error) -> SnapshotError {
        SnapshotError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl From<SerializationSettings> for SnapshotStore {
    fn from(settings: SerializationSettings) -> Self {
        Self::new(settings.file)
    }
}
