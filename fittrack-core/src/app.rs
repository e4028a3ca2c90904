//! Application state and the operations the UI calls.

use chrono::{NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::lookup::LookupError;
use crate::models::{
    DailyLogEntry, ExercisePerformance, FeedbackBook, FeedbackEntry, FeedbackType, Macros, Meal,
    NextWorkout, PerfectRecoveryDays, RecoveryChecklist, RestTimer, ScheduleDay, UserProfile,
    WeeklySchedule, WeightBook, WeightRecord, CHECKLIST_ITEMS,
};
use crate::store::{FitnessStore, LocalStorage, StorageError, StorageKey};
use crate::suggest::{self, FeedbackSuggestion, WeightSuggestion};
use crate::sync::{SyncEngine, SyncResult};

/// kg to lbs.
pub const LBS_PER_KG: f64 = 2.20462;

/// Invalid input from the caller. Never retried.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Exercise name is required")]
    MissingExercise,

    #[error("Sets and reps are required")]
    MissingSetsOrReps,

    #[error("Please describe your meal")]
    MissingMealDescription,

    #[error("Weight must be greater than zero")]
    InvalidWeight,

    #[error("{0} is a rest day")]
    RestDay(NaiveDate),

    #[error("{0} is not a rest day")]
    NotRestDay(NaiveDate),

    #[error("Exercise {index} does not exist in {workout} ({count} exercises)")]
    InvalidExerciseIndex {
        index: usize,
        workout: &'static str,
        count: usize,
    },

    #[error("Checklist item {0} does not exist (1-{max})", max = CHECKLIST_ITEMS)]
    InvalidChecklistItem(usize),

    #[error("Unknown unit '{0}'. Valid units: lbs, kg")]
    UnknownUnit(String),
}

/// Errors returned by [`FitnessApp`] operations.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeightUnit {
    #[default]
    Lbs,
    Kg,
}

impl WeightUnit {
    pub fn to_lbs(&self, value: f64) -> f64 {
        match self {
            WeightUnit::Lbs => value,
            WeightUnit::Kg => value * LBS_PER_KG,
        }
    }
}

impl FromStr for WeightUnit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lbs" | "lb" => Ok(WeightUnit::Lbs),
            "kg" | "kgs" => Ok(WeightUnit::Kg),
            _ => Err(ValidationError::UnknownUnit(s.to_string())),
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightUnit::Lbs => write!(f, "lbs"),
            WeightUnit::Kg => write!(f, "kg"),
        }
    }
}

/// Which remote write follows a local save.
#[derive(Debug, Clone, Copy)]
enum PushScope {
    Day,
    Nutrition,
    BodyMetrics,
}

/// Result of completing a day.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub previous_streak: u32,
    pub streak: u32,
    pub sync: Option<SyncResult>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaterUpdate {
    pub glasses: u32,
    pub goal: u32,
    /// True when this change landed exactly on the goal
    pub goal_reached: bool,
    pub sync: Option<SyncResult>,
}

/// Owns all local state. Every mutation goes through here: entries are saved
/// locally first, then pushed when a user is signed in.
#[derive(Debug)]
pub struct FitnessApp {
    storage: LocalStorage,
    store: FitnessStore,
    profile: UserProfile,
    schedule: WeeklySchedule,
    sync: Option<SyncEngine>,
}

impl FitnessApp {
    /// Loads the store from `storage`, migrating legacy data.
    pub fn open(storage: LocalStorage, profile: UserProfile) -> Result<Self, AppError> {
        let store = FitnessStore::load(&storage, Utc::now())?;
        Ok(Self {
            storage,
            store,
            profile,
            schedule: WeeklySchedule::default(),
            sync: None,
        })
    }

    pub fn with_schedule(mut self, schedule: WeeklySchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_sync(mut self, engine: SyncEngine) -> Self {
        self.sync = Some(engine);
        self
    }

    pub fn store(&self) -> &FitnessStore {
        &self.store
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn schedule(&self) -> &WeeklySchedule {
        &self.schedule
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    pub fn sync(&self) -> Option<&SyncEngine> {
        self.sync.as_ref()
    }

    /// The stored entry for `date`, or a fresh one (not saved).
    pub fn entry(&self, date: NaiveDate) -> DailyLogEntry {
        self.store.get_or_create(date, self.profile.weight)
    }

    pub fn schedule_for(&self, date: NaiveDate) -> ScheduleDay {
        self.schedule.for_date(date)
    }

    pub fn next_workout(&self, from: NaiveDate) -> Option<NextWorkout> {
        self.schedule.next_workout(from)
    }

    async fn save_entry(
        &mut self,
        mut entry: DailyLogEntry,
        scope: PushScope,
    ) -> Result<Option<SyncResult>, AppError> {
        entry.touch(Utc::now());
        let pushed = entry.clone();

        self.store.save(entry);
        let profile = &self.profile;
        self.store.recompute_streak(|d| profile.is_rest_day(d));
        self.store.persist(&self.storage)?;

        let Some(engine) = self.sync.as_mut().filter(|e| e.is_authenticated()) else {
            return Ok(None);
        };
        let result = match scope {
            PushScope::Day => engine.push_entry(&pushed).await,
            PushScope::Nutrition => engine.push_nutrition(&pushed).await,
            PushScope::BodyMetrics => engine.push_body_metrics(&pushed).await,
        };
        if !result.success {
            tracing::debug!(date = %pushed.date, "Saved locally, remote write pending");
        }
        Ok(Some(result))
    }

    /// Checks or unchecks exercise `index` of the day's workout.
    pub async fn toggle_exercise(
        &mut self,
        date: NaiveDate,
        index: usize,
        completed: bool,
    ) -> Result<Option<SyncResult>, AppError> {
        let day = self.schedule.for_date(date);
        let Some(key) = day.workout_key() else {
            return Err(ValidationError::RestDay(date).into());
        };
        let count = key.exercises().len();
        if index >= count {
            return Err(ValidationError::InvalidExerciseIndex {
                index,
                workout: key.name(),
                count,
            }
            .into());
        }

        let mut entry = self.entry(date);
        if completed {
            entry.exercise_logs.insert(index);
        } else {
            entry.exercise_logs.remove(&index);
        }
        self.save_entry(entry, PushScope::Day).await
    }

    /// Records sets, reps and load for an exercise. A missing or zero weight
    /// means bodyweight work.
    pub async fn log_performance(
        &mut self,
        date: NaiveDate,
        exercise: &str,
        sets: u32,
        reps: u32,
        weight: Option<f64>,
    ) -> Result<Option<SyncResult>, AppError> {
        let exercise = exercise.trim();
        if exercise.is_empty() {
            return Err(ValidationError::MissingExercise.into());
        }
        if sets == 0 || reps == 0 {
            return Err(ValidationError::MissingSetsOrReps.into());
        }

        let mut entry = self.entry(date);
        entry.exercise_performance.insert(
            exercise.to_string(),
            ExercisePerformance::new(sets, reps, weight.filter(|w| *w > 0.0)),
        );
        self.save_entry(entry, PushScope::Day).await
    }

    /// Marks the day's workout done.
    ///
    /// `nutrition` replaces the day's totals only when no meals were logged.
    /// Body weight falls back to the profile weight.
    pub async fn complete_workout(
        &mut self,
        date: NaiveDate,
        nutrition: Option<Macros>,
        body_weight: Option<f64>,
    ) -> Result<Completion, AppError> {
        let mut entry = self.entry(date);
        if entry.meals.is_empty() {
            if let Some(nutrition) = nutrition {
                entry.nutrition_consumed = nutrition.clamped();
            }
        }
        self.finish_day(entry, body_weight).await
    }

    /// Logs a scheduled rest day. Rest days count as completed.
    pub async fn log_rest_day(
        &mut self,
        date: NaiveDate,
        nutrition: Option<Macros>,
        body_weight: Option<f64>,
    ) -> Result<Completion, AppError> {
        if !self.schedule.for_date(date).is_rest() {
            return Err(ValidationError::NotRestDay(date).into());
        }
        let mut entry = self.entry(date);
        if let Some(nutrition) = nutrition {
            entry.nutrition_consumed = nutrition.clamped();
        }
        self.finish_day(entry, body_weight).await
    }

    async fn finish_day(
        &mut self,
        mut entry: DailyLogEntry,
        body_weight: Option<f64>,
    ) -> Result<Completion, AppError> {
        let previous_streak = self.store.streak();
        entry.body_weight = body_weight
            .filter(|w| *w > 0.0)
            .unwrap_or(self.profile.weight);
        entry.workout_completed = true;

        let sync = self.save_entry(entry, PushScope::Day).await?;
        Ok(Completion {
            previous_streak,
            streak: self.store.streak(),
            sync,
        })
    }

    /// Adds a glass. Going over the goal is allowed.
    pub async fn increment_water(&mut self, date: NaiveDate) -> Result<WaterUpdate, AppError> {
        let mut entry = self.entry(date);
        entry.water_intake += 1;
        let glasses = entry.water_intake;
        let goal = self.profile.goals.water;

        let sync = self.save_entry(entry, PushScope::Nutrition).await?;
        Ok(WaterUpdate {
            glasses,
            goal,
            goal_reached: glasses == goal,
            sync,
        })
    }

    /// Removes a glass. Nothing happens at zero.
    pub async fn decrement_water(&mut self, date: NaiveDate) -> Result<WaterUpdate, AppError> {
        let mut entry = self.entry(date);
        let goal = self.profile.goals.water;
        if entry.water_intake == 0 {
            return Ok(WaterUpdate {
                glasses: 0,
                goal,
                goal_reached: false,
                sync: None,
            });
        }

        entry.water_intake -= 1;
        let glasses = entry.water_intake;
        let sync = self.save_entry(entry, PushScope::Nutrition).await?;
        Ok(WaterUpdate {
            glasses,
            goal,
            goal_reached: false,
            sync,
        })
    }

    /// Appends a meal and adds its macros to the day's totals.
    pub async fn add_meal(
        &mut self,
        date: NaiveDate,
        description: &str,
        macros: Macros,
    ) -> Result<Option<SyncResult>, AppError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ValidationError::MissingMealDescription.into());
        }

        let meal = Meal::new(description, macros);
        let mut entry = self.entry(date);
        entry.nutrition_consumed += meal.macros;
        entry.meals.push(meal);
        self.save_entry(entry, PushScope::Nutrition).await
    }

    /// Removes all meals and zeroes the day's totals.
    pub async fn clear_meals(&mut self, date: NaiveDate) -> Result<Option<SyncResult>, AppError> {
        let mut entry = self.entry(date);
        entry.meals.clear();
        entry.nutrition_consumed = Macros::default();
        self.save_entry(entry, PushScope::Nutrition).await
    }

    /// Sets body weight for any date, converting to lbs.
    pub async fn log_body_weight(
        &mut self,
        date: NaiveDate,
        value: f64,
        unit: WeightUnit,
    ) -> Result<Option<SyncResult>, AppError> {
        if value <= 0.0 || !value.is_finite() {
            return Err(ValidationError::InvalidWeight.into());
        }
        let mut entry = self.entry(date);
        entry.body_weight = unit.to_lbs(value);
        self.save_entry(entry, PushScope::BodyMetrics).await
    }

    pub fn suggest_weight(&self, exercise: &str, today: NaiveDate) -> WeightSuggestion {
        suggest::suggest_weight(exercise, self.store.logs(), today)
    }

    pub fn is_personal_record(&self, exercise: &str, weight: f64, date: NaiveDate) -> bool {
        suggest::is_personal_record(exercise, weight, self.store.logs(), date)
    }

    pub fn weight_book(&self) -> Result<WeightBook, AppError> {
        Ok(self.storage.load_or_default(StorageKey::UserWeights)?)
    }

    /// Sets the working weight for an exercise and appends it to history.
    pub fn record_weight(
        &self,
        exercise: &str,
        weight: f64,
        date: NaiveDate,
    ) -> Result<WeightRecord, AppError> {
        if weight <= 0.0 {
            return Err(ValidationError::InvalidWeight.into());
        }
        let mut book = self.weight_book()?;
        let record = book
            .entry(exercise.to_string())
            .and_modify(|r| r.update(weight, date))
            .or_insert_with(|| WeightRecord::new(weight, date))
            .clone();
        self.storage.save(StorageKey::UserWeights, &book)?;
        Ok(record)
    }

    pub fn feedback_book(&self) -> Result<FeedbackBook, AppError> {
        Ok(self.storage.load_or_default(StorageKey::ExerciseFeedback)?)
    }

    /// Stores feedback and returns the resulting suggestion.
    pub fn record_feedback(
        &self,
        exercise: &str,
        kind: FeedbackType,
        weight: f64,
        date: NaiveDate,
    ) -> Result<Option<FeedbackSuggestion>, AppError> {
        if exercise.trim().is_empty() {
            return Err(ValidationError::MissingExercise.into());
        }
        let mut book = self.feedback_book()?;
        book.entry(exercise.to_string())
            .or_default()
            .push(FeedbackEntry { kind, weight, date });
        self.storage.save(StorageKey::ExerciseFeedback, &book)?;
        self.feedback_suggestion(exercise)
    }

    pub fn feedback_suggestion(
        &self,
        exercise: &str,
    ) -> Result<Option<FeedbackSuggestion>, AppError> {
        let weights = self.weight_book()?;
        let feedback = self.feedback_book()?;
        Ok(suggest::suggest_weight_from_feedback(
            exercise,
            weights.get(exercise),
            feedback.get(exercise),
        ))
    }

    pub fn perfect_recovery_days(&self) -> Result<PerfectRecoveryDays, AppError> {
        Ok(self.storage.load_or_default(StorageKey::PerfectRecoveryDays)?)
    }

    /// Today's checklist. A list from an earlier day is reset, and recorded
    /// as a perfect day if every item was checked.
    pub fn recovery_checklist(&self, today: NaiveDate) -> Result<RecoveryChecklist, AppError> {
        let stored: Option<RecoveryChecklist> = self.storage.load(StorageKey::RecoveryChecklist)?;
        let Some(mut checklist) = stored else {
            return Ok(RecoveryChecklist::new(today));
        };
        if checklist.date == today {
            return Ok(checklist);
        }

        if let Some(perfect) = checklist.roll_over(today) {
            let mut days = self.perfect_recovery_days()?;
            if days.record(perfect) {
                tracing::debug!(date = %perfect, "Recorded perfect recovery day");
                self.storage.save(StorageKey::PerfectRecoveryDays, &days)?;
            }
        }
        self.storage.save(StorageKey::RecoveryChecklist, &checklist)?;
        Ok(checklist)
    }

    /// Checks or unchecks a checklist item (0-based).
    pub fn set_recovery_item(
        &self,
        today: NaiveDate,
        item: usize,
        checked: bool,
    ) -> Result<RecoveryChecklist, AppError> {
        if item >= CHECKLIST_ITEMS {
            return Err(ValidationError::InvalidChecklistItem(item + 1).into());
        }
        let mut checklist = self.recovery_checklist(today)?;
        checklist.checklist[item] = checked;
        self.storage.save(StorageKey::RecoveryChecklist, &checklist)?;
        Ok(checklist)
    }

    /// Perfect days this month, counting today.
    pub fn perfect_recovery_count(&self, today: NaiveDate) -> Result<usize, AppError> {
        Ok(self.perfect_recovery_days()?.count_this_month(today))
    }

    pub fn timer_duration(&self) -> Result<RestTimer, AppError> {
        Ok(self.storage.load_or_default(StorageKey::TimerDuration)?)
    }

    pub fn set_timer_duration(&self, timer: RestTimer) -> Result<(), AppError> {
        Ok(self.storage.save(StorageKey::TimerDuration, &timer)?)
    }

    /// Pulls remote records into the store. `None` when sync is not set up.
    pub async fn pull(&mut self, today: NaiveDate) -> Option<SyncResult> {
        let engine = self.sync.as_mut()?;
        Some(engine.pull(&mut self.store, &self.profile, today).await)
    }

    /// Pushes every stored entry.
    pub async fn push_all(&mut self) -> Option<SyncResult> {
        let engine = self.sync.as_mut()?;
        Some(engine.push_all(&self.store).await)
    }

    /// Replays the offline queue.
    pub async fn drain_queue(&mut self) -> Option<SyncResult> {
        Some(self.sync.as_mut()?.drain().await)
    }

    pub async fn set_online(&mut self, online: bool) -> Option<SyncResult> {
        self.sync.as_mut()?.set_online(online).await
    }

    /// Applies the remote profile over the local one.
    pub async fn load_profile(&mut self) -> Option<SyncResult> {
        let engine = self.sync.as_mut()?;
        Some(engine.load_profile(&mut self.profile).await)
    }
}
