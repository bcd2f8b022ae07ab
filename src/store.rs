//! Key-value stores that hold the serialized ledger between runs.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use crate::Error;

/// A durable key-value store of strings.
///
/// Access is single-threaded: the repository that owns a store is always
/// behind a lock, so implementations need no internal synchronisation.
pub trait DurableStore: Send {
    /// Get the value stored at `key`, or `None` if nothing has been stored yet.
    ///
    /// # Errors
    /// Returns [Error::StoreError] if the underlying medium could not be read.
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store `value` at `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns [Error::StoreError] if the underlying medium could not be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), Error>;
}

/// A store that keeps each key in its own JSON file inside a directory.
///
/// Writes go to a temporary file that is then renamed over the old one, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    directory: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `directory`, creating the directory if needed.
    ///
    /// # Errors
    /// Returns [Error::StoreError] if the directory could not be created.
    pub fn open(directory: impl AsRef<Path>) -> Result<Self, Error> {
        let directory = directory.as_ref().to_path_buf();

        fs::create_dir_all(&directory).map_err(|error| {
            Error::StoreError(directory.display().to_string(), error.to_string())
        })?;

        Ok(Self { directory })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{key}.json"))
    }
}

impl DurableStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(Error::StoreError(key.to_owned(), error.to_string())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        let path = self.path_for(key);
        let temp_path = self.directory.join(format!(".{key}.json.tmp"));

        fs::write(&temp_path, value)
            .and_then(|_| fs::rename(&temp_path, &path))
            .map_err(|error| Error::StoreError(key.to_owned(), error.to_string()))?;

        tracing::debug!("wrote {} bytes to {}", value.len(), path.display());

        Ok(())
    }
}

/// A store that only lives as long as the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `value` at `key`.
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_owned(), value.to_owned());
        store
    }
}

impl DurableStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
