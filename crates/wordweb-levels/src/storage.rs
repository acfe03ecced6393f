//! Durable key-value storage for custom levels and player progress.
//!
//! Values are whole JSON documents; every write replaces the previous value.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};

/// Key holding the array of custom levels.
pub const CUSTOM_LEVELS_KEY: &str = "wordweb_custom_levels";

/// Key holding the player's [`Progress`](crate::Progress).
pub const SAVE_KEY: &str = "wordweb_save";

/// Errors returned by storage providers.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum StorageError {
    /// Reading or writing the backing store failed.
    #[display("cannot access {}: {source}", path.display())]
    Io {
        /// Location that failed.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// A value could not be converted to or from JSON.
    #[display("cannot convert stored value: {_0}")]
    #[from]
    Serialize(serde_json::Error),
}

/// A synchronous string store.
pub trait Storage {
    /// Returns the value stored under `key`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the store cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S> Storage for &mut S
where
    S: Storage + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Reads and deserializes the JSON value under `key`.
pub(crate) fn load_json<T, S>(storage: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: Storage + ?Sized,
{
    storage
        .get(key)?
        .map(|text| serde_json::from_str(&text))
        .transpose()
        .map_err(StorageError::from)
}

/// Serializes `value` as JSON and stores it under `key`.
pub(crate) fn save_json<T, S>(storage: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: Storage + ?Sized,
{
    let text = serde_json::to_string(value)?;
    storage.set(key, &text)
}

/// In-process storage. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Storage backed by one `<key>.json` file per key in a directory.
///
/// The directory is created on the first write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file backing `key`.
    #[must_use]
    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path(key);
        fs::write(&path, value).map_err(|source| StorageError::Io { path, source })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_memory_round_trip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get("k").unwrap(), None);
        storage.set("k", "one").unwrap();
        storage.set("k", "two").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("data"));
        assert_eq!(storage.get(SAVE_KEY).unwrap(), None);

        storage.set(SAVE_KEY, r#"{"currentLevel":2}"#).unwrap();
        assert!(dir.path().join("data/wordweb_save.json").is_file());

        let reopened = FileStorage::new(dir.path().join("data"));
        assert_eq!(
            reopened.get(SAVE_KEY).unwrap().as_deref(),
            Some(r#"{"currentLevel":2}"#)
        );
    }

    #[test]
    fn test_file_write_failure_is_reported() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let mut storage = FileStorage::new(&blocker);
        assert!(matches!(
            storage.set(SAVE_KEY, "{}"),
            Err(StorageError::Io { .. })
        ));
    }

    #[test]
    fn test_json_helpers() {
        let mut storage = MemoryStorage::new();
        save_json(&mut storage, "numbers", &[1, 2, 3]).unwrap();
        let numbers: Option<Vec<u32>> = load_json(&storage, "numbers").unwrap();
        assert_eq!(numbers, Some(vec![1, 2, 3]));

        storage.set("numbers", "not json").unwrap();
        assert!(matches!(
            load_json::<Vec<u32>, _>(&storage, "numbers"),
            Err(StorageError::Serialize(_))
        ));
    }
}
