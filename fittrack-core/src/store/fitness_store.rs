use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::migration::{self, SCHEMA_VERSION};
use super::storage::{LocalStorage, StorageError, StorageKey};
use crate::models::DailyLogEntry;
use crate::streak::compute_streak;

/// On-disk shape of the `fitnessData` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FitnessData {
    #[serde(default)]
    version: u64,
    #[serde(default)]
    logs: Vec<DailyLogEntry>,
    #[serde(default)]
    streak: u32,
    #[serde(default)]
    start_date: Option<DateTime<Utc>>,
}

/// All daily log entries plus the aggregate streak.
///
/// Entries keep their insertion order for history views; lookups by date go
/// through an index. At most one entry exists per date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "FitnessData", into = "FitnessData")]
pub struct FitnessStore {
    logs: Vec<DailyLogEntry>,
    index: HashMap<NaiveDate, usize>,
    streak: u32,
    start_date: Option<DateTime<Utc>>,
}

impl From<FitnessData> for FitnessStore {
    fn from(data: FitnessData) -> Self {
        let mut store = FitnessStore {
            streak: data.streak,
            start_date: data.start_date,
            ..Default::default()
        };
        for entry in data.logs {
            store.save(entry);
        }
        store
    }
}

impl From<FitnessStore> for FitnessData {
    fn from(store: FitnessStore) -> Self {
        FitnessData {
            version: SCHEMA_VERSION,
            logs: store.logs,
            streak: store.streak,
            start_date: store.start_date,
        }
    }
}

impl FitnessStore {
    /// An empty store started at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            start_date: Some(now),
            ..Default::default()
        }
    }

    /// Loads the store, migrating legacy documents.
    ///
    /// A missing key yields an empty store started at `now`.
    pub fn load(storage: &LocalStorage, now: DateTime<Utc>) -> Result<Self, StorageError> {
        let Some(mut doc) = storage.load_value(StorageKey::FitnessData)? else {
            return Ok(Self::new(now));
        };

        if migration::migrate(&mut doc) {
            tracing::info!(version = SCHEMA_VERSION, "Migrated fitness data");
        }

        let mut store: FitnessStore = serde_json::from_value(doc)
            .map_err(|e| StorageError::Json(storage.path(StorageKey::FitnessData), e))?;
        if store.start_date.is_none() {
            store.start_date = Some(now);
        }
        Ok(store)
    }

    /// Writes the whole store back.
    pub fn persist(&self, storage: &LocalStorage) -> Result<(), StorageError> {
        storage.save(StorageKey::FitnessData, self)
    }

    /// The entry for `date`, or a zero-valued one that is not stored.
    pub fn get_or_create(&self, date: NaiveDate, default_weight: f64) -> DailyLogEntry {
        self.find_by_date(date)
            .cloned()
            .unwrap_or_else(|| DailyLogEntry::new(date, default_weight))
    }

    pub fn find_by_date(&self, date: NaiveDate) -> Option<&DailyLogEntry> {
        self.index.get(&date).map(|&i| &self.logs[i])
    }

    /// Inserts or replaces the entry for its date.
    pub fn save(&mut self, entry: DailyLogEntry) {
        match self.index.get(&entry.date) {
            Some(&i) => self.logs[i] = entry,
            None => {
                self.index.insert(entry.date, self.logs.len());
                self.logs.push(entry);
            }
        }
    }

    /// Entries in insertion order.
    pub fn logs(&self) -> &[DailyLogEntry] {
        &self.logs
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    /// Recomputes the streak from the stored logs.
    pub fn recompute_streak<F>(&mut self, is_rest_day: F) -> u32
    where
        F: Fn(NaiveDate) -> bool,
    {
        self.streak = compute_streak(&self.logs, is_rest_day);
        self.streak
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Macros;
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn test_storage() -> (LocalStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());
        (storage, temp_dir)
    }

    #[test]
    fn test_get_or_create_does_not_store() {
        let store = FitnessStore::new(Utc::now());
        let entry = store.get_or_create(date("2024-01-08"), 180.0);

        assert_eq!(entry.body_weight, 180.0);
        assert!(!entry.workout_completed);
        assert!(store.find_by_date(date("2024-01-08")).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_is_idempotent() {
        let mut store = FitnessStore::new(Utc::now());
        let entry = DailyLogEntry::new(date("2024-01-08"), 175.0).with_workout_completed(true);

        store.save(entry.clone());
        let once = store.clone();
        store.save(entry);

        assert_eq!(store, once);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_save_replaces_in_place() {
        let mut store = FitnessStore::new(Utc::now());
        store.save(DailyLogEntry::new(date("2024-01-08"), 175.0));
        store.save(DailyLogEntry::new(date("2024-01-09"), 175.0));
        store.save(
            DailyLogEntry::new(date("2024-01-08"), 175.0)
                .with_nutrition(Macros::new(1800.0, 150.0, 180.0, 60.0)),
        );

        assert_eq!(store.len(), 2);
        assert_eq!(store.logs()[0].date, date("2024-01-08"));
        assert_eq!(store.logs()[0].nutrition_consumed.calories, 1800.0);
        assert_eq!(store.logs()[1].date, date("2024-01-09"));
    }

    #[test]
    fn test_load_missing_returns_empty_store() {
        let (storage, _temp) = test_storage();
        let now = Utc::now();
        let store = FitnessStore::load(&storage, now).unwrap();

        assert!(store.is_empty());
        assert_eq!(store.streak(), 0);
        assert_eq!(store.start_date(), Some(now));
    }

    #[test]
    fn test_persist_and_load() {
        let (storage, _temp) = test_storage();
        let mut store = FitnessStore::new(Utc::now());
        store.save(DailyLogEntry::new(date("2024-01-08"), 175.0).with_workout_completed(true));
        store.recompute_streak(|_| false);
        store.persist(&storage).unwrap();

        let loaded = FitnessStore::load(&storage, Utc::now()).unwrap();
        assert_eq!(loaded, store);
        assert_eq!(loaded.streak(), 1);

        let raw = storage.load_value(StorageKey::FitnessData).unwrap().unwrap();
        assert_eq!(raw["version"], SCHEMA_VERSION);
    }

    #[test]
    fn test_load_repairs_legacy_document() {
        let (storage, _temp) = test_storage();
        std::fs::write(
            storage.path(StorageKey::FitnessData),
            r#"{
                "logs": [
                    {"date": "2024-01-08", "workoutCompleted": true, "bodyWeight": 176},
                    {"date": "2024-01-08", "workoutCompleted": true, "bodyWeight": 177, "waterIntake": 4}
                ],
                "streak": 1,
                "startDate": "2024-01-01T08:00:00Z"
            }"#,
        )
        .unwrap();

        let store = FitnessStore::load(&storage, Utc::now()).unwrap();
        let entry = store.find_by_date(date("2024-01-08")).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(entry.body_weight, 177.0);
        assert_eq!(entry.water_intake, 4);
        assert!(entry.exercise_logs.is_empty());
        assert_eq!(entry.updated_at, crate::models::start_of_day(date("2024-01-08")));
    }

    #[test]
    fn test_recompute_streak_updates_counter() {
        let mut store = FitnessStore::new(Utc::now());
        store.save(DailyLogEntry::new(date("2024-01-08"), 175.0).with_workout_completed(true));
        store.save(DailyLogEntry::new(date("2024-01-09"), 175.0).with_workout_completed(true));

        assert_eq!(store.recompute_streak(|_| false), 2);
        assert_eq!(store.streak(), 2);
    }
}
