//! # JSON File Store
//!
//! Writes go to a sibling temporary file which is then renamed over the
//! record, so a crash mid-write leaves the previous record intact.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use formkit_core::FormCollection;

use crate::{decode, encode, FormStore, StoreError};

/// A [`FormStore`] backed by one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// A store at `path`. Nothing is read or created until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The record location.
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

impl FormStore for JsonFileStore {
    fn load(&self) -> FormCollection {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => decode(&raw, &self.path.display().to_string()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored forms yet");
                FormCollection::new()
            }
            Err(error) => {
                warn!(path = %self.path.display(), %error, "cannot read stored forms, starting empty");
                FormCollection::new()
            }
        }
    }

    fn save(&mut self, collection: &FormCollection) -> Result<(), StoreError> {
        let raw = encode(collection)?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let temp = self.temp_path();
        std::fs::write(&temp, raw).map_err(|source| StoreError::Io {
            path: temp.clone(),
            source,
        })?;
        std::fs::rename(&temp, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), forms = collection.len(), "saved forms");
        Ok(())
    }
}
