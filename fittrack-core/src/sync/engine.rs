//! Local/remote reconciliation with an offline write queue.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::fmt;

use super::error::RemoteError;
use super::merge::merge_remote;
use super::queue::{
    BodyMetricsPayload, NutritionPayload, OfflineQueue, OfflineQueueItem, QueueOperation,
};
use super::remote::{
    BodyMetricRow, DateRange, ExerciseLogRow, MealRow, NutritionRow, RemoteBackend,
    RemoteSnapshot, WorkoutRow,
};
use crate::identity::IdentityProvider;
use crate::models::{DailyLogEntry, UserProfile, WeeklySchedule};
use crate::store::{FitnessStore, LocalStorage, StorageError};

/// Days of history fetched by a pull, counted back from today.
pub const SYNC_WINDOW_DAYS: i64 = 90;

/// State of the most recent sync cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Idle,
    Syncing,
    Synced,
    Error,
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Idle => write!(f, "idle"),
            SyncStatus::Syncing => write!(f, "syncing"),
            SyncStatus::Synced => write!(f, "synced"),
            SyncStatus::Error => write!(f, "error"),
        }
    }
}

/// Outcome of a sync operation. Remote failures end up here instead of
/// being returned as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    pub success: bool,
    pub error: Option<String>,
    /// Entries changed locally (pull) or written remotely (push)
    pub updated: usize,
}

impl SyncResult {
    pub fn ok(updated: usize) -> Self {
        Self {
            success: true,
            error: None,
            updated,
        }
    }

    pub fn failed(error: impl fmt::Display) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            updated: 0,
        }
    }
}

impl fmt::Display for SyncResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            None => write!(f, "ok ({} updated)", self.updated),
            Some(e) => write!(f, "failed: {}", e),
        }
    }
}

/// Moves daily logs between the local store and a [`RemoteBackend`].
///
/// Local writes always land first; pushes that fail are queued in the
/// `offlineSyncQueue` key and replayed in order once back online.
pub struct SyncEngine {
    backend: Box<dyn RemoteBackend>,
    identity: Box<dyn IdentityProvider>,
    storage: LocalStorage,
    schedule: WeeklySchedule,
    queue: OfflineQueue,
    status: SyncStatus,
    online: bool,
}

impl SyncEngine {
    /// Creates an engine, loading any queued writes from `storage`.
    pub fn new(
        backend: Box<dyn RemoteBackend>,
        identity: Box<dyn IdentityProvider>,
        storage: LocalStorage,
        schedule: WeeklySchedule,
    ) -> Result<Self, StorageError> {
        let queue = OfflineQueue::load(&storage)?;
        if !queue.is_empty() {
            tracing::debug!(queued = queue.len(), "Loaded offline sync queue");
        }
        Ok(Self {
            backend,
            identity,
            storage,
            schedule,
            queue,
            status: SyncStatus::Idle,
            online: true,
        })
    }

    pub fn status(&self) -> SyncStatus {
        self.status
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_authenticated()
    }

    pub fn queue(&self) -> &OfflineQueue {
        &self.queue
    }

    /// Updates connectivity. Coming back online drains the queue.
    pub async fn set_online(&mut self, online: bool) -> Option<SyncResult> {
        let was_online = self.online;
        self.online = online;
        if online && !was_online {
            tracing::info!("Back online, processing queued changes");
            Some(self.drain().await)
        } else {
            None
        }
    }

    /// Applies the remote profile over `profile`, field by field.
    pub async fn load_profile(&mut self, profile: &mut UserProfile) -> SyncResult {
        let Some(user_id) = self.identity.current_user_id() else {
            return SyncResult::failed(RemoteError::NotAuthenticated);
        };

        match self.backend.fetch_profile(&user_id).await {
            Ok(Some(row)) => {
                row.apply_to(profile);
                SyncResult::ok(1)
            }
            Ok(None) => SyncResult::ok(0),
            Err(e) => {
                tracing::warn!(error = %e, "Load profile failed");
                SyncResult::failed(e)
            }
        }
    }

    /// Pulls the trailing window of remote records into `store`.
    ///
    /// On success the streak is recomputed and the whole store persisted. A
    /// failed fetch leaves the store untouched.
    pub async fn pull(
        &mut self,
        store: &mut FitnessStore,
        profile: &UserProfile,
        today: NaiveDate,
    ) -> SyncResult {
        let Some(user_id) = self.identity.current_user_id() else {
            return SyncResult::failed(RemoteError::NotAuthenticated);
        };

        self.status = SyncStatus::Syncing;
        let range = DateRange::trailing(today, SYNC_WINDOW_DAYS);
        tracing::debug!(start = %range.start, end = %range.end, "Pulling remote records");

        let snapshot = match self.fetch_snapshot(&user_id, range).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "Sync cloud to local failed");
                self.status = SyncStatus::Error;
                return SyncResult::failed(e);
            }
        };

        let workouts = snapshot.workouts.len();
        let stats = merge_remote(store, snapshot.into_entries(profile.weight));
        let streak = store.recompute_streak(|d| profile.is_rest_day(d));

        if let Err(e) = store.persist(&self.storage) {
            tracing::error!(error = %e, "Failed to save merged fitness data");
            self.status = SyncStatus::Error;
            return SyncResult::failed(e);
        }

        tracing::info!(
            workouts,
            inserted = stats.inserted,
            updated = stats.updated,
            streak,
            "Cloud data synced to local storage"
        );
        self.status = SyncStatus::Synced;
        SyncResult::ok(stats.changed())
    }

    async fn fetch_snapshot(
        &self,
        user_id: &str,
        range: DateRange,
    ) -> Result<RemoteSnapshot, RemoteError> {
        let (workouts, nutrition, metrics, meals) = tokio::try_join!(
            self.backend.fetch_workouts(user_id, range),
            self.backend.fetch_nutrition(user_id, range),
            self.backend.fetch_body_metrics(user_id, range),
            self.backend.fetch_meals(user_id, range),
        )?;
        Ok(RemoteSnapshot {
            workouts,
            nutrition,
            metrics,
            meals,
        })
    }

    /// Pushes a whole day: workout, exercise logs, nutrition, meals and body
    /// weight.
    pub async fn push_entry(&mut self, entry: &DailyLogEntry) -> SyncResult {
        self.push(QueueOperation::SaveWorkout, entry).await
    }

    /// Pushes the day's nutrition totals, water and meals.
    pub async fn push_nutrition(&mut self, entry: &DailyLogEntry) -> SyncResult {
        self.push(QueueOperation::SaveNutrition, &NutritionPayload::from(entry))
            .await
    }

    /// Pushes the day's body weight.
    pub async fn push_body_metrics(&mut self, entry: &DailyLogEntry) -> SyncResult {
        self.push(QueueOperation::SaveBodyMetrics, &BodyMetricsPayload::from(entry))
            .await
    }

    /// Pushes every stored entry in order. Failures are queued individually.
    pub async fn push_all(&mut self, store: &FitnessStore) -> SyncResult {
        let total = store.len();
        let mut pushed = 0;
        for entry in store.logs() {
            if self.push_entry(entry).await.success {
                pushed += 1;
            }
        }

        if pushed == total {
            tracing::info!(entries = total, "Local data synced to cloud");
            SyncResult::ok(pushed)
        } else {
            SyncResult {
                success: false,
                error: Some(format!("{} of {} entries failed to sync", total - pushed, total)),
                updated: pushed,
            }
        }
    }

    async fn push<T: Serialize>(&mut self, operation: QueueOperation, data: &T) -> SyncResult {
        let Some(user_id) = self.identity.current_user_id() else {
            return SyncResult::failed(RemoteError::NotAuthenticated);
        };

        if !self.online {
            self.enqueue(operation, data);
            return SyncResult::failed("Offline, change queued");
        }

        // Older queued writes must land first
        if !self.queue.is_empty() {
            self.enqueue(operation, data);
            return self.drain().await;
        }

        self.status = SyncStatus::Syncing;
        let result = match serde_json::to_value(data) {
            Ok(value) => self.dispatch(&user_id, operation, value).await,
            Err(e) => Err(RemoteError::Payload(e.to_string())),
        };

        match result {
            Ok(()) => {
                self.status = SyncStatus::Synced;
                SyncResult::ok(1)
            }
            Err(e) => {
                tracing::warn!(operation = %operation, error = %e, "Push failed");
                self.status = SyncStatus::Error;
                self.enqueue(operation, data);
                SyncResult::failed(e)
            }
        }
    }

    fn enqueue<T: Serialize>(&mut self, operation: QueueOperation, data: &T) {
        if let Err(e) = self.queue.push(operation, data, Utc::now()) {
            tracing::error!(operation = %operation, error = %e, "Could not queue change");
            return;
        }
        tracing::info!(operation = %operation, queued = self.queue.len(), "Queued offline change");
        if let Err(e) = self.queue.persist(&self.storage) {
            tracing::error!(error = %e, "Failed to save offline sync queue");
        }
    }

    /// Replays queued writes in order.
    ///
    /// The queue is cleared only when every item succeeds; any failure keeps
    /// all items, including those already replayed, for the next attempt.
    /// Only items whose payload no longer parses are dropped.
    pub async fn drain(&mut self) -> SyncResult {
        let Some(user_id) = self.identity.current_user_id() else {
            return SyncResult::failed(RemoteError::NotAuthenticated);
        };
        if self.queue.is_empty() {
            return SyncResult::ok(0);
        }

        let items: Vec<OfflineQueueItem> = self.queue.items().to_vec();
        tracing::info!(queued = items.len(), "Processing queued changes");
        self.status = SyncStatus::Syncing;

        for item in &items {
            if let Err(e) = self
                .dispatch(&user_id, item.operation, item.data.clone())
                .await
            {
                if let RemoteError::Payload(_) = e {
                    tracing::warn!(operation = %item.operation, error = %e, "Skipping malformed queued change");
                    continue;
                }
                tracing::warn!(operation = %item.operation, error = %e, "Process sync queue failed");
                self.status = SyncStatus::Error;
                return SyncResult::failed(e);
            }
        }

        self.queue.clear();
        if let Err(e) = self.queue.persist(&self.storage) {
            tracing::error!(error = %e, "Failed to save offline sync queue");
        }
        tracing::info!(processed = items.len(), "Sync queue processed");
        self.status = SyncStatus::Synced;
        SyncResult::ok(items.len())
    }

    async fn dispatch(
        &self,
        user_id: &str,
        operation: QueueOperation,
        data: serde_json::Value,
    ) -> Result<(), RemoteError> {
        let invalid = |e: serde_json::Error| RemoteError::Payload(e.to_string());
        match operation {
            QueueOperation::SaveWorkout => {
                let entry: DailyLogEntry = serde_json::from_value(data).map_err(invalid)?;
                self.write_workout(user_id, &entry).await
            }
            QueueOperation::SaveNutrition => {
                let payload: NutritionPayload = serde_json::from_value(data).map_err(invalid)?;
                self.write_nutrition(user_id, &payload).await
            }
            QueueOperation::SaveBodyMetrics => {
                let payload: BodyMetricsPayload = serde_json::from_value(data).map_err(invalid)?;
                self.write_body_metrics(user_id, &payload).await
            }
        }
    }

    async fn write_workout(&self, user_id: &str, entry: &DailyLogEntry) -> Result<(), RemoteError> {
        let day = self.schedule.for_date(entry.date);
        let row = WorkoutRow {
            id: None,
            user_id: user_id.to_string(),
            date: entry.date,
            workout_type: day.workout_key().map(|k| k.as_str().to_string()),
            workout_name: Some(day.name().to_string()),
            completed: entry.workout_completed,
            completed_at: entry.workout_completed.then_some(entry.updated_at),
            updated_at: Some(entry.updated_at),
            exercise_logs: Vec::new(),
        };

        let stored = self.backend.upsert_workout(&row).await?;
        let workout_id = stored
            .id
            .ok_or_else(|| RemoteError::Decode("workout saved without an id".to_string()))?;

        self.backend.delete_exercise_logs(&workout_id).await?;
        let logs: Vec<ExerciseLogRow> = entry
            .exercise_performance
            .iter()
            .map(|(name, perf)| ExerciseLogRow {
                workout_id: Some(workout_id.clone()),
                exercise_name: name.clone(),
                set_number: perf.sets.max(1),
                reps: perf.reps,
                weight: perf.weighted(),
                created_at: Some(entry.updated_at),
            })
            .collect();
        if !logs.is_empty() {
            self.backend.insert_exercise_logs(&logs).await?;
        }

        self.write_nutrition(user_id, &NutritionPayload::from(entry))
            .await?;
        self.write_body_metrics(user_id, &BodyMetricsPayload::from(entry))
            .await
    }

    async fn write_nutrition(
        &self,
        user_id: &str,
        payload: &NutritionPayload,
    ) -> Result<(), RemoteError> {
        let n = payload.nutrition.clamped();
        self.backend
            .upsert_nutrition(&NutritionRow {
                user_id: user_id.to_string(),
                date: payload.date,
                calories: n.calories,
                protein: n.protein,
                carbs: n.carbs,
                fat: n.fat,
                water_intake: payload.water,
                updated_at: Some(payload.updated_at),
            })
            .await?;

        // Replace the day's meals wholesale
        self.backend.delete_meals(user_id, payload.date).await?;
        let meals: Vec<MealRow> = payload
            .meals
            .iter()
            .filter(|m| !m.description.trim().is_empty())
            .map(|m| MealRow {
                user_id: user_id.to_string(),
                date: payload.date,
                meal_name: m.description.clone(),
                nutrition: m.macros,
                created_at: m.timestamp,
            })
            .collect();
        if !meals.is_empty() {
            self.backend.insert_meals(&meals).await?;
        }
        Ok(())
    }

    async fn write_body_metrics(
        &self,
        user_id: &str,
        payload: &BodyMetricsPayload,
    ) -> Result<(), RemoteError> {
        self.backend
            .upsert_body_metric(&BodyMetricRow {
                user_id: user_id.to_string(),
                date: payload.date,
                weight: payload.weight,
                created_at: Some(Utc::now()),
            })
            .await
    }
}

impl fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncEngine")
            .field("status", &self.status)
            .field("online", &self.online)
            .field("queued", &self.queue.len())
            .finish_non_exhaustive()
    }
}
