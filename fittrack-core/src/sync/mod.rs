//! Remote sync.
//!
//! The local store is the source of truth for the device. A pull fetches the
//! trailing 90 days from the backend, joins the collections by date (days
//! with a workout or nutrition row) and merges them in with a recency-biased
//! policy:
//!
//! 1. A date missing locally is inserted
//! 2. A local entry whose workout is not completed is overwritten
//! 3. Otherwise the remote entry wins only if its `updatedAt` is strictly newer
//!
//! An overwrite keeps whatever local parts the remote rows did not carry.
//!
//! Pushes replace a day's records wholesale (delete then insert). A push that
//! fails is queued and replayed in order once the engine is back online.

mod engine;
mod error;
#[cfg(test)]
pub(crate) mod memory;
mod merge;
mod queue;
mod remote;
mod rest;

pub use engine::{SyncEngine, SyncResult, SyncStatus, SYNC_WINDOW_DAYS};
pub use error::RemoteError;
pub use merge::{merge_remote, remote_wins, MergeStats};
pub use queue::{
    BodyMetricsPayload, NutritionPayload, OfflineQueue, OfflineQueueItem, QueueOperation,
};
pub use remote::{
    BodyMetricRow, DateRange, ExerciseLogRow, MealRow, NutritionRow, ProfileRow, RemoteBackend,
    RemoteEntry, RemoteSnapshot, WorkoutRow,
};
pub use rest::RestBackend;
