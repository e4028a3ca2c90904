//! Persisted FIFO of remote writes that could not be delivered.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{DailyLogEntry, Macros, Meal};
use crate::store::{LocalStorage, StorageError, StorageKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueueOperation {
    SaveWorkout,
    SaveNutrition,
    SaveBodyMetrics,
}

impl fmt::Display for QueueOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueOperation::SaveWorkout => write!(f, "saveWorkout"),
            QueueOperation::SaveNutrition => write!(f, "saveNutrition"),
            QueueOperation::SaveBodyMetrics => write!(f, "saveBodyMetrics"),
        }
    }
}

/// Data for a `saveNutrition` write: the day's totals, water and meals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionPayload {
    pub date: NaiveDate,
    pub nutrition: Macros,
    #[serde(default)]
    pub water: u32,
    #[serde(default)]
    pub meals: Vec<Meal>,
    pub updated_at: DateTime<Utc>,
}

impl From<&DailyLogEntry> for NutritionPayload {
    fn from(entry: &DailyLogEntry) -> Self {
        Self {
            date: entry.date,
            nutrition: entry.nutrition_consumed,
            water: entry.water_intake,
            meals: entry.meals.clone(),
            updated_at: entry.updated_at,
        }
    }
}

/// Data for a `saveBodyMetrics` write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyMetricsPayload {
    pub date: NaiveDate,
    pub weight: Option<f64>,
}

impl From<&DailyLogEntry> for BodyMetricsPayload {
    fn from(entry: &DailyLogEntry) -> Self {
        Self {
            date: entry.date,
            weight: Some(entry.body_weight).filter(|w| *w > 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfflineQueueItem {
    pub operation: QueueOperation,
    pub data: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

/// Pending writes, oldest first. Never reordered or deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfflineQueue {
    items: Vec<OfflineQueueItem>,
}

impl OfflineQueue {
    pub fn load(storage: &LocalStorage) -> Result<Self, StorageError> {
        storage.load_or_default(StorageKey::OfflineSyncQueue)
    }

    pub fn persist(&self, storage: &LocalStorage) -> Result<(), StorageError> {
        storage.save(StorageKey::OfflineSyncQueue, self)
    }

    /// Appends a write. Fails only if `data` cannot be represented as JSON.
    pub fn push<T: Serialize>(
        &mut self,
        operation: QueueOperation,
        data: &T,
        now: DateTime<Utc>,
    ) -> Result<(), serde_json::Error> {
        self.items.push(OfflineQueueItem {
            operation,
            data: serde_json::to_value(data)?,
            timestamp: now,
        });
        Ok(())
    }

    pub fn items(&self) -> &[OfflineQueueItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_queue_keeps_insertion_order_and_duplicates() {
        let mut queue = OfflineQueue::default();
        let entry = DailyLogEntry::new(date("2024-01-08"), 175.0);
        let now = Utc::now();

        queue.push(QueueOperation::SaveWorkout, &entry, now).unwrap();
        queue
            .push(QueueOperation::SaveNutrition, &NutritionPayload::from(&entry), now)
            .unwrap();
        queue.push(QueueOperation::SaveWorkout, &entry, now).unwrap();

        let ops: Vec<QueueOperation> = queue.items().iter().map(|i| i.operation).collect();
        assert_eq!(
            ops,
            vec![
                QueueOperation::SaveWorkout,
                QueueOperation::SaveNutrition,
                QueueOperation::SaveWorkout
            ]
        );
    }

    #[test]
    fn test_queue_persists_as_array() {
        let temp = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp.path());
        let mut queue = OfflineQueue::default();
        let entry = DailyLogEntry::new(date("2024-01-08"), 175.0);
        queue
            .push(QueueOperation::SaveBodyMetrics, &BodyMetricsPayload::from(&entry), Utc::now())
            .unwrap();
        queue.persist(&storage).unwrap();

        let raw = storage.load_value(StorageKey::OfflineSyncQueue).unwrap().unwrap();
        assert_eq!(raw[0]["operation"], "saveBodyMetrics");
        assert_eq!(raw[0]["data"]["weight"], 175.0);

        let loaded = OfflineQueue::load(&storage).unwrap();
        assert_eq!(loaded, queue);
    }

    #[test]
    fn test_load_missing_queue_is_empty() {
        let temp = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp.path());
        assert!(OfflineQueue::load(&storage).unwrap().is_empty());
    }
}
