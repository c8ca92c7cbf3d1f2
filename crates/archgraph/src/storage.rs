//! Key-value persistence of the architecture description source text.
//!
//! The [`Storage`] trait is the seam between the synchronization driver and
//! wherever the host keeps the last accepted source. Two implementations are
//! provided:
//!
//! - [`MemoryStorage`] - in-memory map, for tests and embedding hosts.
//! - [`FileStorage`] - one file per key inside a directory.

use std::{
    collections::HashMap,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use log::{debug, trace};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors raised by [`Storage`] implementations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid storage key `{0}`: use letters, digits, `-`, `_` or `.`, not starting with `.`")]
    InvalidKey(String),
}

/// A string store addressed by key.
pub trait Storage {
    /// Returns the value stored under `key`, or `None` if nothing was stored.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Storage held in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the storage with `value` already stored under `key`.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage keeping each key in `<dir>/<key>.yaml`.
///
/// Writes go through a temporary file in the same directory that is then
/// renamed over the target, so a reader never sees a half-written source.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a storage rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file that holds `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] for keys that could escape the directory.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.yaml")))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => {
                debug!(path:? = path, bytes = value.len(); "Loaded stored source");
                Ok(Some(value))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                trace!(path:? = path; "No stored source");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        write_atomic(&path, value.as_bytes())?;
        debug!(path:? = path, bytes = value.len(); "Stored source");
        Ok(())
    }
}

/// Writes `bytes` to `path` by persisting a temporary sibling file over it.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}
