use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::types::{SavedUrlEntry, StoreError};
use super::TARGET_STORE;
use crate::web::is_valid_url;

/// Persistence for the saved URL list.
pub trait SavedUrlRepository {
    fn load(&self) -> Result<Vec<SavedUrlEntry>, StoreError>;

    /// Add an entry. Returns `false` when the URL is already saved.
    fn save(&mut self, entry: SavedUrlEntry) -> Result<bool, StoreError>;

    /// Remove an entry by URL. Returns `false` when nothing matched.
    fn remove(&mut self, url: &str) -> Result<bool, StoreError>;
}

fn check_entry(entry: &SavedUrlEntry) -> Result<(), StoreError> {
    if is_valid_url(&entry.url) {
        Ok(())
    } else {
        Err(StoreError::InvalidUrl(entry.url.clone()))
    }
}

/// Saved list kept as a pretty-printed JSON array on disk.
///
/// A missing file reads as an empty list; the file is created on first save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, entries: &[SavedUrlEntry]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(target: TARGET_STORE, "Wrote {} saved URLs to {}", entries.len(), self.path.display());
        Ok(())
    }
}

impl SavedUrlRepository for JsonFileStore {
    fn load(&self) -> Result<Vec<SavedUrlEntry>, StoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(target: TARGET_STORE, "No saved URL file at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&data)?)
    }

    fn save(&mut self, entry: SavedUrlEntry) -> Result<bool, StoreError> {
        check_entry(&entry)?;
        let mut entries = self.load()?;
        if entries.iter().any(|e| e.url == entry.url) {
            debug!(target: TARGET_STORE, "URL already saved: {}", entry.url);
            return Ok(false);
        }
        info!(target: TARGET_STORE, "Saving URL: {}", entry.url);
        entries.push(entry);
        self.write(&entries)?;
        Ok(true)
    }

    fn remove(&mut self, url: &str) -> Result<bool, StoreError> {
        let mut entries = self.load()?;
        let before = entries.len();
        entries.retain(|e| e.url != url.trim());
        if entries.len() == before {
            return Ok(false);
        }
        info!(target: TARGET_STORE, "Removed saved URL: {}", url);
        self.write(&entries)?;
        Ok(true)
    }
}

/// Saved list held in memory only.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Vec<SavedUrlEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SavedUrlRepository for MemoryStore {
    fn load(&self) -> Result<Vec<SavedUrlEntry>, StoreError> {
        Ok(self.entries.clone())
    }

    fn save(&mut self, entry: SavedUrlEntry) -> Result<bool, StoreError> {
        check_entry(&entry)?;
        if self.entries.iter().any(|e| e.url == entry.url) {
            return Ok(false);
        }
        self.entries.push(entry);
        Ok(true)
    }

    fn remove(&mut self, url: &str) -> Result<bool, StoreError> {
        let before = self.entries.len();
        self.entries.retain(|e| e.url != url.trim());
        Ok(self.entries.len() != before)
    }
}
