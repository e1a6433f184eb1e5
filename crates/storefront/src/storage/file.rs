//! File-backed storage: one directory per origin, one JSON file per slot.
//!
//! ```text
//! <root>/<origin>/cart.json
//! <root>/<origin>/likedItems.json
//! ```
//!
//! Each write goes to its own uniquely named temporary sibling and is renamed
//! into place, so concurrent writers never share a temporary file and a slot
//! always holds one complete write. Ordering between writers is the caller's
//! concern: the storefront serializes sessions per visitor.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::{KeyValueStorage, StorageError, validate_key};

const EXTENSION: &str = "json";

/// A [`KeyValueStorage`] rooted at one origin directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage for `origin` under `root`. The directory is created lazily on
    /// the first write.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] if `origin` is not a safe
    /// directory name.
    pub fn for_origin(root: &Path, origin: &str) -> Result<Self, StorageError> {
        validate_key(origin)?;
        Ok(Self {
            dir: root.join(origin),
        })
    }

    /// The origin directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Every origin that has a directory under `root`, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` exists but cannot be listed.
    pub fn origins(root: &Path) -> Result<Vec<String>, StorageError> {
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut origins = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if validate_key(name).is_ok() {
                    origins.push(name.to_string());
                }
            }
        }
        origins.sort();
        Ok(origins)
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.{EXTENSION}")))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        fs::create_dir_all(&self.dir)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            let stem = path.file_stem().and_then(|stem| stem.to_str());
            if let Some(stem) = stem.filter(|stem| validate_key(stem).is_ok()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}
