//! Durable key-value storage.
//!
//! The page persists everything through a string-keyed store shaped like the
//! browser's `localStorage`. [`Storage`] is that seam: the cart, the order log
//! and the cookie consent flag all read and write opaque string values under
//! fixed keys.

use std::{
    cell::RefCell,
    fs, io,
    path::{Path, PathBuf},
    rc::Rc,
};

use mockall::automock;
use rustc_hash::FxHashMap;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Key holding the serialized cart items.
pub const CART_KEY: &str = "cart";

/// Key holding the append-only order log.
pub const ORDERS_KEY: &str = "orders";

/// Key holding the cookie consent flag.
pub const COOKIE_ACCEPTED_KEY: &str = "cookieAccepted";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store could not be reached.
    #[error("storage is unavailable")]
    Unavailable,

    /// The backing store refused the write (e.g. quota exceeded).
    #[error("storage rejected write to {key}: {reason}")]
    Rejected {
        /// Key being written
        key: String,

        /// Reason reported by the backend
        reason: String,
    },

    /// Filesystem error from a file-backed store.
    #[error("storage file error")]
    Io(#[from] io::Error),

    /// A file-backed store contains something other than a JSON object of strings.
    #[error("storage file is not a valid key-value document")]
    Format(#[source] serde_json::Error),

    /// A value could not be serialized before being written.
    #[error("failed to encode value for {key}")]
    Encode {
        /// Key being written
        key: String,

        /// Serializer error
        #[source]
        source: serde_json::Error,
    },
}

/// String-keyed durable store.
#[automock]
pub trait Storage {
    /// Reads the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend rejects the write.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend rejects the removal.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Serializes `value` as JSON and writes it under `key`.
///
/// # Errors
///
/// Returns [`StorageError::Encode`] if serialization fails, or the backend's
/// error if the write is rejected.
pub fn write_json<S, T>(storage: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    S: Storage + ?Sized,
    T: Serialize + ?Sized,
{
    let encoded = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;

    storage.set_item(key, &encoded)
}

/// Outcome of reading a JSON value back from storage.
#[derive(Debug)]
pub enum Stored<T> {
    /// Nothing is stored under the key.
    Absent,

    /// The stored value decoded successfully.
    Present(T),

    /// A value is stored but could not be decoded.
    Malformed(serde_json::Error),
}

/// Reads the value under `key` and decodes it as JSON.
///
/// # Errors
///
/// Returns a [`StorageError`] only if the backend read fails; decode failures
/// are reported as [`Stored::Malformed`] so callers can pick a fallback.
pub fn read_json<S, T>(storage: &S, key: &str) -> Result<Stored<T>, StorageError>
where
    S: Storage + ?Sized,
    T: DeserializeOwned,
{
    let Some(raw) = storage.get_item(key)? else {
        return Ok(Stored::Absent);
    };

    Ok(match serde_json::from_str(&raw) {
        Ok(value) => Stored::Present(value),
        Err(error) => Stored::Malformed(error),
    })
}

/// In-memory store. Clones share the same entries, like handles to the
/// browser's `localStorage`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<FxHashMap<String, String>>>,
}

impl MemoryStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);

        Ok(())
    }
}

/// Store backed by a single JSON document on disk, mapping keys to string
/// values. Every call reads the file afresh; writes replace it atomically via
/// a sibling temporary file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Creates a store at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<FxHashMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(FxHashMap::default()),
            Ok(contents) => serde_json::from_str(&contents).map_err(StorageError::Format),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(FxHashMap::default()),
            Err(error) => Err(StorageError::Io(error)),
        }
    }

    fn save(&self, entries: &FxHashMap<String, String>) -> Result<(), StorageError> {
        let encoded = serde_json::to_string_pretty(entries).map_err(StorageError::Format)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let staging = self.path.with_extension("tmp");

        fs::write(&staging, encoded)?;
        fs::rename(&staging, &self.path)?;

        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.load()?;

        entries.insert(key.to_string(), value.to_string());

        self.save(&entries)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.load()?;

        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn memory_storage_clones_share_entries() -> TestResult {
        let storage = MemoryStorage::new();
        let handle = storage.clone();

        storage.set_item(CART_KEY, "[]")?;

        assert_eq!(handle.get_item(CART_KEY)?, Some("[]".to_string()));
        assert_eq!(handle.len(), 1);

        handle.remove_item(CART_KEY)?;

        assert!(storage.is_empty());

        Ok(())
    }

    #[test]
    fn memory_storage_missing_key_is_none() -> TestResult {
        let storage = MemoryStorage::new();

        assert_eq!(storage.get_item("missing")?, None);

        Ok(())
    }

    #[test]
    fn read_json_reports_absent_present_and_malformed() -> TestResult {
        let storage = MemoryStorage::new();

        assert!(matches!(
            read_json::<_, Vec<u32>>(&storage, "numbers")?,
            Stored::Absent
        ));

        write_json(&storage, "numbers", &[1_u32, 2, 3])?;

        assert!(matches!(
            read_json::<_, Vec<u32>>(&storage, "numbers")?,
            Stored::Present(numbers) if numbers == vec![1, 2, 3]
        ));

        storage.set_item("numbers", "{not json")?;

        assert!(matches!(
            read_json::<_, Vec<u32>>(&storage, "numbers")?,
            Stored::Malformed(_)
        ));

        Ok(())
    }

    #[test]
    fn read_json_propagates_backend_errors() {
        let mut storage = MockStorage::new();

        storage
            .expect_get_item()
            .returning(|_| Err(StorageError::Unavailable));

        let result = read_json::<_, Vec<u32>>(&storage, CART_KEY);

        assert!(matches!(result, Err(StorageError::Unavailable)));
    }

    #[test]
    fn file_storage_round_trips_values() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path().join("storage.json"));

        assert_eq!(storage.get_item(CART_KEY)?, None);

        storage.set_item(CART_KEY, "[]")?;
        storage.set_item(COOKIE_ACCEPTED_KEY, "true")?;

        let reopened = FileStorage::new(storage.path());

        assert_eq!(reopened.get_item(CART_KEY)?, Some("[]".to_string()));
        assert_eq!(
            reopened.get_item(COOKIE_ACCEPTED_KEY)?,
            Some("true".to_string())
        );

        reopened.remove_item(CART_KEY)?;

        assert_eq!(storage.get_item(CART_KEY)?, None);

        Ok(())
    }

    #[test]
    fn file_storage_creates_parent_directories() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path().join("nested/deeper/storage.json"));

        storage.set_item(ORDERS_KEY, "[]")?;

        assert!(storage.path().exists());

        Ok(())
    }

    #[test]
    fn file_storage_rejects_non_object_documents() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("storage.json");

        fs::write(&path, "[1, 2, 3]")?;

        let result = FileStorage::new(path).get_item(CART_KEY);

        assert!(matches!(result, Err(StorageError::Format(_))));

        Ok(())
    }
}
