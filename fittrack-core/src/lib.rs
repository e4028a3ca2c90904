//! FitTrack Core Library
//!
//! Daily fitness logs, rest-day-aware streaks, training and nutrition
//! suggestions, and local/cloud sync for FitTrack applications.

pub mod app;
pub mod identity;
pub mod lookup;
pub mod models;
pub mod progress;
pub mod store;
pub mod streak;
pub mod suggest;
pub mod sync;

pub use app::{AppError, Completion, FitnessApp, ValidationError, WaterUpdate, WeightUnit};
pub use identity::{IdentityProvider, Session};
pub use lookup::{CalorieNinjasClient, LookupError, MockNutritionLookup, NutritionLookup};
pub use models::{
    DailyLogEntry, ExercisePerformance, Macros, Meal, NutritionGoals, ScheduleDay, UserProfile,
    WeeklySchedule, WorkoutKey,
};
pub use store::{FitnessStore, LocalStorage, StorageError, StorageKey};
pub use streak::compute_streak;
pub use sync::{RemoteBackend, RemoteError, RestBackend, SyncEngine, SyncResult, SyncStatus};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
