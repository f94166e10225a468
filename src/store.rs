//! Save file storage.
//!
//! Holds the single JSON document for a collection. Writes go to a temp file
//! in the same directory and are renamed into place, so an interrupted write
//! never leaves a truncated save behind. A save that no longer parses is
//! moved aside rather than deleted.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::state::SaveDocument;

/// File-backed storage for one collection document.
pub struct SaveStore {
    /// Location of the save document.
    pub path: PathBuf,
}

impl SaveStore {
    /// Create a store for the document at `path`. Nothing is read yet.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Whether a save document is present on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the raw document, if one has been saved.
    ///
    /// A document that fails to parse is renamed to `<name>.corrupt` and
    /// `Ok(None)` is returned, so the caller starts from a fresh state while
    /// the old bytes stay recoverable.
    pub fn load(&self) -> Result<Option<serde_json::Value>> {
        if !self.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&self.path)?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                let quarantine = self.quarantine_path();
                tracing::warn!(
                    path = %self.path.display(),
                    moved_to = %quarantine.display(),
                    error = %e,
                    "Save file is corrupt; moving it aside"
                );
                fs::rename(&self.path, &quarantine)?;
                Ok(None)
            }
        }
    }

    /// Atomically replace the save document.
    pub fn save(&self, doc: &SaveDocument) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let body = serde_json::to_vec_pretty(doc)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&body)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn quarantine_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("collection.json");
        self.path.with_file_name(format!("{}.corrupt", name))
    }
}
