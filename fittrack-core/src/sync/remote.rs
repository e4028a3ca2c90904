//! Remote record shapes and the backend trait.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::error::RemoteError;
use crate::models::{
    DailyLogEntry, ExercisePerformance, Macros, Meal, NutritionGoals, UserProfile,
};

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// The `days` days before `end`, plus `end` itself.
    pub fn trailing(end: NaiveDate, days: i64) -> Self {
        Self {
            start: end - Duration::days(days),
            end,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Row ids may come back as numbers or strings depending on the column type.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// A row of the `profiles` collection. Absent fields keep local values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileRow {
    #[serde(deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub age: Option<u32>,
    pub height_inches: Option<u32>,
    pub weight: Option<f64>,
    pub goals: Option<NutritionGoals>,
    pub diet: Option<String>,
    pub rest_days: Option<Vec<u32>>,
    pub program_duration: Option<u32>,
}

impl ProfileRow {
    /// Overrides the fields of `profile` that this row carries.
    pub fn apply_to(&self, profile: &mut UserProfile) {
        if let Some(age) = self.age {
            profile.age = age;
        }
        if let Some(height) = self.height_inches {
            profile.height_inches = height;
        }
        if let Some(weight) = self.weight.filter(|w| *w > 0.0) {
            profile.weight = weight;
        }
        if let Some(goals) = &self.goals {
            profile.goals = goals.clone();
        }
        if let Some(diet) = self.diet.as_ref().filter(|d| !d.is_empty()) {
            profile.diet = diet.clone();
        }
        if let Some(rest_days) = &self.rest_days {
            profile.rest_days = rest_days.clone();
        }
        if let Some(duration) = self.program_duration {
            profile.program_duration = duration;
        }
    }
}

/// A row of the `exercise_logs` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseLogRow {
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub workout_id: Option<String>,
    pub exercise_name: String,
    #[serde(default)]
    pub set_number: u32,
    #[serde(default)]
    pub reps: u32,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A row of the `workouts` collection, keyed by user and date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRow {
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub workout_type: Option<String>,
    #[serde(default)]
    pub workout_name: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Embedded on reads, never written with the workout
    #[serde(default, skip_serializing)]
    pub exercise_logs: Vec<ExerciseLogRow>,
}

/// A row of the `daily_nutrition` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionRow {
    pub user_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub water_intake: u32,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl NutritionRow {
    pub fn macros(&self) -> Macros {
        Macros::new(self.calories, self.protein, self.carbs, self.fat)
    }
}

/// A row of the `meals` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRow {
    pub user_id: String,
    pub date: NaiveDate,
    pub meal_name: String,
    #[serde(default)]
    pub nutrition: Macros,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A row of the `body_metrics` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyMetricRow {
    pub user_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Everything the backend holds for a window of dates.
#[derive(Debug, Clone, Default)]
pub struct RemoteSnapshot {
    pub workouts: Vec<WorkoutRow>,
    pub nutrition: Vec<NutritionRow>,
    pub metrics: Vec<BodyMetricRow>,
    pub meals: Vec<MealRow>,
}

/// A day rebuilt from remote rows, with the parts those rows carried.
///
/// Parts the rows did not carry hold zero values and must not replace
/// local data.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteEntry {
    pub entry: DailyLogEntry,
    pub has_workout: bool,
    pub has_nutrition: bool,
    pub has_meals: bool,
    pub has_body_weight: bool,
}

impl RemoteEntry {
    /// Takes the parts the remote rows did not carry from `local`.
    pub fn fill_from(self, local: &DailyLogEntry) -> DailyLogEntry {
        let mut entry = self.entry;
        if !self.has_workout {
            entry.workout_completed = local.workout_completed;
            entry.exercise_performance = local.exercise_performance.clone();
        }
        if !self.has_nutrition {
            entry.nutrition_consumed = local.nutrition_consumed;
            entry.water_intake = local.water_intake;
        }
        if !self.has_meals {
            entry.meals = local.meals.clone();
        }
        if !self.has_body_weight {
            entry.body_weight = local.body_weight;
        }
        // Checked exercise indices only exist locally
        if entry.exercise_logs.is_empty() {
            entry.exercise_logs = local.exercise_logs.clone();
        }
        entry
    }
}

impl From<DailyLogEntry> for RemoteEntry {
    fn from(entry: DailyLogEntry) -> Self {
        Self {
            entry,
            has_workout: true,
            has_nutrition: true,
            has_meals: true,
            has_body_weight: true,
        }
    }
}

impl RemoteSnapshot {
    /// Joins the collections by date, oldest first.
    ///
    /// Only dates with a workout or nutrition row yield an entry; meals and
    /// body metrics attach to those. Body weight falls back to
    /// `default_weight`, and `updatedAt` is the newer of the workout and
    /// nutrition timestamps.
    pub fn into_entries(self, default_weight: f64) -> Vec<RemoteEntry> {
        let mut dates = BTreeSet::new();
        dates.extend(self.workouts.iter().map(|w| w.date));
        dates.extend(self.nutrition.iter().map(|n| n.date));

        let mut meals: BTreeMap<NaiveDate, Vec<Meal>> = BTreeMap::new();
        for row in self.meals {
            meals.entry(row.date).or_default().push(Meal {
                description: row.meal_name,
                macros: row.nutrition,
                timestamp: row.created_at,
            });
        }

        dates
            .into_iter()
            .map(|date| {
                let workout = self.workouts.iter().find(|w| w.date == date);
                let nutrition = self.nutrition.iter().find(|n| n.date == date);
                let body_weight = self
                    .metrics
                    .iter()
                    .find(|m| m.date == date)
                    .and_then(|m| m.weight)
                    .filter(|w| *w > 0.0);

                let mut entry = DailyLogEntry::new(date, body_weight.unwrap_or(default_weight));

                if let Some(workout) = workout {
                    entry.workout_completed = workout.completed;
                    for log in &workout.exercise_logs {
                        entry.exercise_performance.insert(
                            log.exercise_name.clone(),
                            ExercisePerformance::new(log.set_number, log.reps, log.weight),
                        );
                    }
                }
                if let Some(nutrition) = nutrition {
                    entry.nutrition_consumed = nutrition.macros().clamped();
                    entry.water_intake = nutrition.water_intake;
                }
                // Meals are rewritten with the nutrition row, so none means none
                let day_meals = meals.remove(&date);
                let has_meals = nutrition.is_some() || day_meals.is_some();
                entry.meals = day_meals.unwrap_or_default();

                let newest = [
                    workout.and_then(|w| w.updated_at),
                    nutrition.and_then(|n| n.updated_at),
                ]
                .into_iter()
                .flatten()
                .max();
                if let Some(updated_at) = newest {
                    entry.updated_at = updated_at;
                }

                RemoteEntry {
                    entry,
                    has_workout: workout.is_some(),
                    has_nutrition: nutrition.is_some(),
                    has_meals,
                    has_body_weight: body_weight.is_some(),
                }
            })
            .collect()
    }
}

/// Access to the remote record collections.
///
/// Sub-resources have separate delete and insert calls; replacing a day's
/// records is up to the caller.
#[async_trait]
pub trait RemoteBackend: Send + Sync {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<ProfileRow>, RemoteError>;

    /// Workouts in `range`, with their exercise logs embedded.
    async fn fetch_workouts(
        &self,
        user_id: &str,
        range: DateRange,
    ) -> Result<Vec<WorkoutRow>, RemoteError>;

    async fn fetch_nutrition(
        &self,
        user_id: &str,
        range: DateRange,
    ) -> Result<Vec<NutritionRow>, RemoteError>;

    async fn fetch_body_metrics(
        &self,
        user_id: &str,
        range: DateRange,
    ) -> Result<Vec<BodyMetricRow>, RemoteError>;

    async fn fetch_meals(&self, user_id: &str, range: DateRange)
        -> Result<Vec<MealRow>, RemoteError>;

    /// Upserts on (user_id, date) and returns the stored row with its id.
    async fn upsert_workout(&self, row: &WorkoutRow) -> Result<WorkoutRow, RemoteError>;

    async fn delete_exercise_logs(&self, workout_id: &str) -> Result<(), RemoteError>;

    async fn insert_exercise_logs(&self, rows: &[ExerciseLogRow]) -> Result<(), RemoteError>;

    async fn upsert_nutrition(&self, row: &NutritionRow) -> Result<(), RemoteError>;

    async fn delete_meals(&self, user_id: &str, date: NaiveDate) -> Result<(), RemoteError>;

    async fn insert_meals(&self, rows: &[MealRow]) -> Result<(), RemoteError>;

    async fn upsert_body_metric(&self, row: &BodyMetricRow) -> Result<(), RemoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_workout_row_accepts_numeric_id_and_embedded_logs() {
        let row: WorkoutRow = serde_json::from_str(
            r#"{
                "id": 42,
                "user_id": "u1",
                "date": "2024-01-08",
                "completed": true,
                "updated_at": "2024-01-08T18:00:00+00:00",
                "exercise_logs": [
                    {"workout_id": 42, "exercise_name": "Bench Press", "set_number": 4, "reps": 8, "weight": 135}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(row.id.as_deref(), Some("42"));
        assert_eq!(row.exercise_logs.len(), 1);
        assert_eq!(row.exercise_logs[0].workout_id.as_deref(), Some("42"));

        let json = serde_json::to_value(&row).unwrap();
        assert!(json.get("exercise_logs").is_none());
    }

    #[test]
    fn test_profile_row_overrides_only_present_fields() {
        let row: ProfileRow =
            serde_json::from_str(r#"{"id": "u1", "weight": 180.5, "rest_days": [0, 3]}"#).unwrap();
        let mut profile = UserProfile::default();
        row.apply_to(&mut profile);

        assert_eq!(profile.weight, 180.5);
        assert_eq!(profile.rest_days, vec![0, 3]);
        assert_eq!(profile.age, 31);
        assert_eq!(profile.diet, "pescatarian");
    }

    fn workout_row(d: &str) -> WorkoutRow {
        WorkoutRow {
            id: Some("w1".to_string()),
            user_id: "u1".to_string(),
            date: date(d),
            workout_type: Some("workoutA".to_string()),
            workout_name: None,
            completed: true,
            completed_at: None,
            updated_at: Some(ts("2024-01-08T18:00:00Z")),
            exercise_logs: vec![ExerciseLogRow {
                workout_id: Some("w1".to_string()),
                exercise_name: "Bench Press".to_string(),
                set_number: 4,
                reps: 8,
                weight: Some(135.0),
                created_at: None,
            }],
        }
    }

    fn metric_row(d: &str, weight: f64) -> BodyMetricRow {
        BodyMetricRow {
            user_id: "u1".to_string(),
            date: date(d),
            weight: Some(weight),
            created_at: None,
        }
    }

    fn meal_row(d: &str) -> MealRow {
        MealRow {
            user_id: "u1".to_string(),
            date: date(d),
            meal_name: "Salmon bowl".to_string(),
            nutrition: Macros::new(600.0, 45.0, 50.0, 20.0),
            created_at: None,
        }
    }

    #[test]
    fn test_snapshot_joins_workout_and_nutrition_days() {
        let snapshot = RemoteSnapshot {
            workouts: vec![workout_row("2024-01-08")],
            nutrition: vec![NutritionRow {
                user_id: "u1".to_string(),
                date: date("2024-01-09"),
                calories: 2000.0,
                protein: 150.0,
                carbs: 180.0,
                fat: 60.0,
                water_intake: 6,
                updated_at: Some(ts("2024-01-09T20:00:00Z")),
            }],
            metrics: vec![metric_row("2024-01-08", 176.0)],
            meals: vec![meal_row("2024-01-09")],
        };

        let entries = snapshot.into_entries(175.0);

        assert_eq!(entries.len(), 2);
        let monday = &entries[0];
        assert_eq!(monday.entry.date, date("2024-01-08"));
        assert!(monday.entry.workout_completed);
        assert_eq!(monday.entry.body_weight, 176.0);
        assert_eq!(monday.entry.weight_for("Bench Press"), Some(135.0));
        assert_eq!(monday.entry.updated_at, ts("2024-01-08T18:00:00Z"));
        assert!(monday.has_workout && monday.has_body_weight);
        assert!(!monday.has_nutrition && !monday.has_meals);

        let tuesday = &entries[1];
        assert_eq!(tuesday.entry.date, date("2024-01-09"));
        assert!(!tuesday.has_workout);
        assert!(!tuesday.has_body_weight);
        assert_eq!(tuesday.entry.water_intake, 6);
        assert_eq!(tuesday.entry.meals[0].description, "Salmon bowl");
        assert_eq!(tuesday.entry.updated_at, ts("2024-01-09T20:00:00Z"));
    }

    #[test]
    fn test_metrics_or_meals_alone_do_not_make_an_entry() {
        let snapshot = RemoteSnapshot {
            metrics: vec![metric_row("2024-01-08", 176.0)],
            meals: vec![meal_row("2024-01-09")],
            ..Default::default()
        };
        assert!(snapshot.into_entries(175.0).is_empty());
    }

    #[test]
    fn test_fill_from_keeps_local_parts_not_carried() {
        let snapshot = RemoteSnapshot {
            workouts: vec![workout_row("2024-01-08")],
            ..Default::default()
        };
        let remote = snapshot.into_entries(175.0).remove(0);

        let mut local = DailyLogEntry::new(date("2024-01-08"), 174.0)
            .with_nutrition(Macros::new(1500.0, 100.0, 150.0, 50.0));
        local.water_intake = 5;
        local.meals.push(Meal::new("Oats", Macros::new(400.0, 15.0, 60.0, 8.0)));

        let merged = remote.fill_from(&local);

        assert!(merged.workout_completed);
        assert_eq!(merged.weight_for("Bench Press"), Some(135.0));
        assert_eq!(merged.water_intake, 5);
        assert_eq!(merged.nutrition_consumed.calories, 1500.0);
        assert_eq!(merged.meals.len(), 1);
        assert_eq!(merged.body_weight, 174.0);
    }

    #[test]
    fn test_trailing_range() {
        let range = DateRange::trailing(date("2024-04-01"), 90);
        assert_eq!(range.start, date("2024-01-02"));
        assert!(range.contains(date("2024-04-01")));
        assert!(!range.contains(date("2024-01-01")));
    }
}
