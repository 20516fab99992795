use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::StoreError;

/// Loads and saves one JSON document of type `T` at a fixed path.
pub struct JsonFileStore<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut staged = self.path.clone().into_os_string();
        staged.push(".tmp");
        PathBuf::from(staged)
    }
}

impl<T: DeserializeOwned> JsonFileStore<T> {
    /// Read and parse the document.
    pub fn load(&self) -> Result<T, StoreError> {
        let raw = fs::read(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;

        serde_json::from_slice(&raw).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

impl<T: Serialize> JsonFileStore<T> {
    /// Write the document.
    ///
    /// The bytes land in a sibling `.tmp` file first and are renamed over the target, so
    /// readers never observe a half-written record.
    pub fn save(&self, record: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_vec_pretty(record).map_err(StoreError::Serialize)?;
        let staged = self.staging_path();

        fs::write(&staged, &raw).map_err(|source| StoreError::Write {
            path: staged.clone(),
            source,
        })?;
        fs::rename(&staged, &self.path).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), bytes = raw.len(), "saved json record");
        Ok(())
    }
}

impl<T> Clone for JsonFileStore<T> {
    fn clone(&self) -> Self {
        Self::new(self.path.clone())
    }
}

impl<T> fmt::Debug for JsonFileStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonFileStore").field("path", &self.path).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("packforge-json-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn save_then_load_returns_same_document() {
        let path = temp_path();
        let store: JsonFileStore<BTreeMap<String, u32>> = JsonFileStore::new(&path);

        let doc = BTreeMap::from([("a".to_string(), 1), ("b".to_string(), 2)]);
        store.save(&doc).unwrap();

        assert_eq!(store.load().unwrap(), doc);
        assert!(!store.staging_path().exists());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let store: JsonFileStore<Vec<u32>> = JsonFileStore::new(temp_path());
        let err = store.load().unwrap_err();
        assert!(err.is_missing());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let path = temp_path();
        fs::write(&path, b"{ not json").unwrap();
        let store: JsonFileStore<Vec<u32>> = JsonFileStore::new(&path);

        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn save_into_missing_directory_is_a_write_error() {
        let path = std::env::temp_dir()
            .join(format!("packforge-missing-{}", uuid::Uuid::new_v4()))
            .join("record.json");
        let store: JsonFileStore<Vec<u32>> = JsonFileStore::new(path);

        let err = store.save(&vec![1, 2, 3]).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
    }
}
