// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{
    collections::{BTreeMap, HashMap},
    fs::{self, OpenOptions},
    io,
    path::{Path, PathBuf},
};

use fd_lock::RwLock;

use crate::{error::PersistenceError, identity::Identity};

/// Key prefix balances are stored under.
pub const DEFAULT_KEY_PREFIX: &str = "base_moon_points";

/// Storage key for the balance of `identity`: `<prefix>_<identity>`.
#[must_use]
pub fn storage_key(prefix: &str, identity: &Identity) -> String {
    format!("{prefix}_{identity}")
}

/// String key-value store balances are persisted to.
pub trait Persistence {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] when the write does not reach the
    /// underlying storage.
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

/// Volatile in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Persistence for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a single JSON object on disk.
///
/// Several stores, in one process or many, may share a file. Reads go to
/// the file every time. A [`set`](Persistence::set) takes an exclusive lock
/// on a sidecar `.lock` file, re-reads the object, replaces the one key and
/// renames a fresh copy into place, so keys written by others are kept.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or is not a JSON
    /// object of strings.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref().to_path_buf();
        let entries = read_entries(&path)?;

        tracing::debug!(path = %path.display(), keys = entries.len(), "opened store");
        Ok(Self { path })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("json.lock")
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl Persistence for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match read_entries(&self.path) {
            Ok(mut entries) => entries.remove(key),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "store unreadable");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())?;
        let mut lock = RwLock::new(lock_file);
        let _guard = lock.write()?;

        // other writers may have added keys since this store last looked
        let mut entries = read_entries(&self.path)?;
        entries.insert(key.to_string(), value.to_string());

        let content = serde_json::to_string_pretty(&entries)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<BTreeMap<String, String>, PersistenceError> {
    match fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(err) => Err(err.into()),
    }
}
