//! In-memory backend used by the sync tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::error::RemoteError;
use super::remote::{
    BodyMetricRow, DateRange, ExerciseLogRow, MealRow, NutritionRow, ProfileRow, RemoteBackend,
    WorkoutRow,
};

#[derive(Debug, Default)]
pub struct State {
    pub profile: Option<ProfileRow>,
    pub workouts: Vec<WorkoutRow>,
    pub exercise_logs: Vec<ExerciseLogRow>,
    pub nutrition: Vec<NutritionRow>,
    pub meals: Vec<MealRow>,
    pub metrics: Vec<BodyMetricRow>,
    /// Names of the calls made, in order
    pub calls: Vec<&'static str>,
    next_id: u64,
}

/// Shared handle; clones see the same rows.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<State>>,
    failing: Arc<AtomicBool>,
    bad_response: Arc<Mutex<Option<&'static str>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with a network error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Makes the named call answer with an unreadable response.
    pub fn set_bad_response(&self, call: Option<&'static str>) {
        *self.bad_response.lock().unwrap() = call;
    }

    pub fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn call(&self, name: &'static str) -> Result<MutexGuard<'_, State>, RemoteError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RemoteError::Network("backend unavailable".to_string()));
        }
        if *self.bad_response.lock().unwrap() == Some(name) {
            return Err(RemoteError::Decode(format!("{} returned garbage", name)));
        }
        let mut state = self.state();
        state.calls.push(name);
        Ok(state)
    }
}

#[async_trait]
impl RemoteBackend for MemoryBackend {
    async fn fetch_profile(&self, _user_id: &str) -> Result<Option<ProfileRow>, RemoteError> {
        Ok(self.call("fetch_profile")?.profile.clone())
    }

    async fn fetch_workouts(
        &self,
        user_id: &str,
        range: DateRange,
    ) -> Result<Vec<WorkoutRow>, RemoteError> {
        let state = self.call("fetch_workouts")?;
        Ok(state
            .workouts
            .iter()
            .filter(|w| w.user_id == user_id && range.contains(w.date))
            .map(|w| {
                let mut row = w.clone();
                row.exercise_logs = state
                    .exercise_logs
                    .iter()
                    .filter(|l| l.workout_id == w.id)
                    .cloned()
                    .collect();
                row
            })
            .collect())
    }

    async fn fetch_nutrition(
        &self,
        user_id: &str,
        range: DateRange,
    ) -> Result<Vec<NutritionRow>, RemoteError> {
        let state = self.call("fetch_nutrition")?;
        Ok(state
            .nutrition
            .iter()
            .filter(|n| n.user_id == user_id && range.contains(n.date))
            .cloned()
            .collect())
    }

    async fn fetch_body_metrics(
        &self,
        user_id: &str,
        range: DateRange,
    ) -> Result<Vec<BodyMetricRow>, RemoteError> {
        let state = self.call("fetch_body_metrics")?;
        Ok(state
            .metrics
            .iter()
            .filter(|m| m.user_id == user_id && range.contains(m.date))
            .cloned()
            .collect())
    }

    async fn fetch_meals(
        &self,
        user_id: &str,
        range: DateRange,
    ) -> Result<Vec<MealRow>, RemoteError> {
        let state = self.call("fetch_meals")?;
        Ok(state
            .meals
            .iter()
            .filter(|m| m.user_id == user_id && range.contains(m.date))
            .cloned()
            .collect())
    }

    async fn upsert_workout(&self, row: &WorkoutRow) -> Result<WorkoutRow, RemoteError> {
        let mut state = self.call("upsert_workout")?;
        let existing = state
            .workouts
            .iter()
            .position(|w| w.user_id == row.user_id && w.date == row.date);

        let stored = match existing {
            Some(i) => {
                let mut updated = row.clone();
                updated.id = state.workouts[i].id.clone();
                state.workouts[i] = updated.clone();
                updated
            }
            None => {
                state.next_id += 1;
                let mut inserted = row.clone();
                inserted.id = Some(state.next_id.to_string());
                state.workouts.push(inserted.clone());
                inserted
            }
        };
        Ok(stored)
    }

    async fn delete_exercise_logs(&self, workout_id: &str) -> Result<(), RemoteError> {
        let mut state = self.call("delete_exercise_logs")?;
        state
            .exercise_logs
            .retain(|l| l.workout_id.as_deref() != Some(workout_id));
        Ok(())
    }

    async fn insert_exercise_logs(&self, rows: &[ExerciseLogRow]) -> Result<(), RemoteError> {
        let mut state = self.call("insert_exercise_logs")?;
        state.exercise_logs.extend_from_slice(rows);
        Ok(())
    }

    async fn upsert_nutrition(&self, row: &NutritionRow) -> Result<(), RemoteError> {
        let mut state = self.call("upsert_nutrition")?;
        match state
            .nutrition
            .iter_mut()
            .find(|n| n.user_id == row.user_id && n.date == row.date)
        {
            Some(existing) => *existing = row.clone(),
            None => state.nutrition.push(row.clone()),
        }
        Ok(())
    }

    async fn delete_meals(&self, user_id: &str, date: NaiveDate) -> Result<(), RemoteError> {
        let mut state = self.call("delete_meals")?;
        state
            .meals
            .retain(|m| !(m.user_id == user_id && m.date == date));
        Ok(())
    }

    async fn insert_meals(&self, rows: &[MealRow]) -> Result<(), RemoteError> {
        let mut state = self.call("insert_meals")?;
        state.meals.extend_from_slice(rows);
        Ok(())
    }

    async fn upsert_body_metric(&self, row: &BodyMetricRow) -> Result<(), RemoteError> {
        let mut state = self.call("upsert_body_metric")?;
        match state
            .metrics
            .iter_mut()
            .find(|m| m.user_id == row.user_id && m.date == row.date)
        {
            Some(existing) => *existing = row.clone(),
            None => state.metrics.push(row.clone()),
        }
        Ok(())
    }
}
