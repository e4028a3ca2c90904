//! JSON key-value storage for persisting local state to disk.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Keys of the local persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey {
    FitnessData,
    TimerDuration,
    UserWeights,
    ExerciseFeedback,
    RecoveryChecklist,
    PerfectRecoveryDays,
    OfflineSyncQueue,
}

impl StorageKey {
    pub const ALL: [StorageKey; 7] = [
        StorageKey::FitnessData,
        StorageKey::TimerDuration,
        StorageKey::UserWeights,
        StorageKey::ExerciseFeedback,
        StorageKey::RecoveryChecklist,
        StorageKey::PerfectRecoveryDays,
        StorageKey::OfflineSyncQueue,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StorageKey::FitnessData => "fitnessData",
            StorageKey::TimerDuration => "timerDuration",
            StorageKey::UserWeights => "userWeights",
            StorageKey::ExerciseFeedback => "exerciseFeedback",
            StorageKey::RecoveryChecklist => "recoveryChecklist",
            StorageKey::PerfectRecoveryDays => "perfectRecoveryDays",
            StorageKey::OfflineSyncQueue => "offlineSyncQueue",
        }
    }

    /// Returns the filename for this key.
    pub fn filename(&self) -> String {
        format!("{}.json", self.name())
    }
}

/// Errors that can occur during storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error for {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] io::Error),

    #[error("Invalid JSON in {}: {}", .0.display(), .1)]
    Json(PathBuf, #[source] serde_json::Error),
}

/// Storage for local state.
///
/// Each key is a JSON file in the data directory; values are always written
/// whole.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    data_dir: PathBuf,
}

impl LocalStorage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the full path for a key.
    pub fn path(&self, key: StorageKey) -> PathBuf {
        self.data_dir.join(key.filename())
    }

    pub fn exists(&self, key: StorageKey) -> bool {
        self.path(key).exists()
    }

    /// Reads the raw JSON value for a key.
    ///
    /// Returns `Ok(None)` if the file doesn't exist.
    pub fn load_value(&self, key: StorageKey) -> Result<Option<serde_json::Value>, StorageError> {
        let path = self.path(key);

        match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| StorageError::Json(path, e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(path, e)),
        }
    }

    /// Loads and deserializes a key. Returns `Ok(None)` if absent.
    pub fn load<T: DeserializeOwned>(&self, key: StorageKey) -> Result<Option<T>, StorageError> {
        match self.load_value(key)? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| StorageError::Json(self.path(key), e)),
            None => Ok(None),
        }
    }

    /// Loads a key or returns the type's default if it doesn't exist.
    pub fn load_or_default<T: DeserializeOwned + Default>(
        &self,
        key: StorageKey,
    ) -> Result<T, StorageError> {
        Ok(self.load(key)?.unwrap_or_default())
    }

    /// Saves a value, replacing the previous one atomically.
    ///
    /// Creates the data directory if it doesn't exist.
    pub fn save<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StorageError::Io(self.data_dir.clone(), e))?;

        let path = self.path(key);
        let bytes =
            serde_json::to_vec_pretty(value).map_err(|e| StorageError::Json(path.clone(), e))?;

        let tmp = self.data_dir.join(format!(".{}.tmp", key.filename()));
        fs::write(&tmp, bytes).map_err(|e| StorageError::Io(tmp.clone(), e))?;
        fs::rename(&tmp, &path).map_err(|e| StorageError::Io(path, e))?;

        Ok(())
    }

    pub fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        let path = self.path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn test_storage() -> (LocalStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());
        (storage, temp_dir)
    }

    #[test]
    fn test_key_filenames() {
        assert_eq!(StorageKey::FitnessData.filename(), "fitnessData.json");
        assert_eq!(StorageKey::OfflineSyncQueue.filename(), "offlineSyncQueue.json");
    }

    #[test]
    fn test_load_nonexistent_returns_none() {
        let (storage, _temp) = test_storage();
        let result: Option<u32> = storage.load(StorageKey::TimerDuration).unwrap();
        assert!(result.is_none());
        assert!(!storage.exists(StorageKey::TimerDuration));
    }

    #[test]
    fn test_save_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("data");
        let storage = LocalStorage::new(nested.clone());

        storage.save(StorageKey::TimerDuration, &75u32).unwrap();

        assert!(nested.exists());
        assert!(storage.exists(StorageKey::TimerDuration));
    }

    #[test]
    fn test_overwrite_existing_value() {
        let (storage, _temp) = test_storage();

        let mut weights = BTreeMap::new();
        weights.insert("Bench Press".to_string(), 100.0);
        storage.save(StorageKey::UserWeights, &weights).unwrap();

        weights.insert("Bench Press".to_string(), 105.0);
        storage.save(StorageKey::UserWeights, &weights).unwrap();

        let loaded: BTreeMap<String, f64> = storage.load(StorageKey::UserWeights).unwrap().unwrap();
        assert_eq!(loaded["Bench Press"], 105.0);
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let (storage, temp) = test_storage();
        storage.save(StorageKey::TimerDuration, &60u32).unwrap();

        let names: Vec<String> = std::fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["timerDuration.json".to_string()]);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let (storage, _temp) = test_storage();
        std::fs::write(storage.path(StorageKey::UserWeights), "{not json").unwrap();

        let result: Result<Option<u32>, _> = storage.load(StorageKey::UserWeights);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Invalid JSON"));
    }

    #[test]
    fn test_load_or_default() {
        let (storage, _temp) = test_storage();
        let weights: BTreeMap<String, f64> =
            storage.load_or_default(StorageKey::UserWeights).unwrap();
        assert!(weights.is_empty());
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let (storage, _temp) = test_storage();
        storage.remove(StorageKey::RecoveryChecklist).unwrap();
    }
}
