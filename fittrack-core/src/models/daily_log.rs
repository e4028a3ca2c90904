use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Macro-nutrient totals. Absent fields default to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Macros {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Macros {
    pub fn new(calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fat,
        }
    }

    /// Negative inputs are clamped to zero.
    pub fn clamped(self) -> Self {
        Self {
            calories: self.calories.max(0.0),
            protein: self.protein.max(0.0),
            carbs: self.carbs.max(0.0),
            fat: self.fat.max(0.0),
        }
    }
}

impl std::ops::Add for Macros {
    type Output = Macros;

    fn add(self, rhs: Macros) -> Macros {
        Macros {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
        }
    }
}

impl std::ops::AddAssign for Macros {
    fn add_assign(&mut self, rhs: Macros) {
        *self = *self + rhs;
    }
}

impl fmt::Display for Macros {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cal | {}g protein | {}g carbs | {}g fat",
            self.calories, self.protein, self.carbs, self.fat
        )
    }
}

/// Sets, reps and (optional) load recorded for one exercise on one day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExercisePerformance {
    #[serde(default, deserialize_with = "lenient_count")]
    pub sets: u32,
    #[serde(default, deserialize_with = "lenient_count")]
    pub reps: u32,
    #[serde(default)]
    pub weight: Option<f64>,
}

impl ExercisePerformance {
    pub fn new(sets: u32, reps: u32, weight: Option<f64>) -> Self {
        Self { sets, reps, weight }
    }

    /// The recorded load, if it is a positive number.
    pub fn weighted(&self) -> Option<f64> {
        self.weight.filter(|w| *w > 0.0)
    }
}

/// Older records stored counts as free text ("10", "8-10"); keep the leading number.
fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0) as u32,
        serde_json::Value::String(s) => s
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect::<String>()
            .parse()
            .unwrap_or(0),
        _ => 0,
    })
}

/// A meal logged during the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    #[serde(alias = "name")]
    pub description: String,
    #[serde(flatten)]
    pub macros: Macros,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Meal {
    pub fn new(description: impl Into<String>, macros: Macros) -> Self {
        Self {
            description: description.into(),
            macros: macros.clamped(),
            timestamp: Some(Utc::now()),
        }
    }
}

/// One calendar day of activity: workout, nutrition, water, weight and meals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogEntry {
    pub date: NaiveDate,
    #[serde(default)]
    pub workout_completed: bool,
    #[serde(default)]
    pub nutrition_consumed: Macros,
    #[serde(default)]
    pub water_intake: u32,
    #[serde(default)]
    pub body_weight: f64,
    #[serde(default)]
    pub exercise_logs: BTreeSet<usize>,
    #[serde(default)]
    pub exercise_performance: BTreeMap<String, ExercisePerformance>,
    #[serde(default)]
    pub meals: Vec<Meal>,
    pub updated_at: DateTime<Utc>,
}

impl DailyLogEntry {
    /// A zero-valued entry for `date`.
    pub fn new(date: NaiveDate, body_weight: f64) -> Self {
        Self {
            date,
            workout_completed: false,
            nutrition_consumed: Macros::default(),
            water_intake: 0,
            body_weight,
            exercise_logs: BTreeSet::new(),
            exercise_performance: BTreeMap::new(),
            meals: Vec::new(),
            updated_at: start_of_day(date),
        }
    }

    pub fn with_workout_completed(mut self, completed: bool) -> Self {
        self.workout_completed = completed;
        self
    }

    pub fn with_nutrition(mut self, nutrition: Macros) -> Self {
        self.nutrition_consumed = nutrition.clamped();
        self
    }

    pub fn with_performance(mut self, exercise: impl Into<String>, perf: ExercisePerformance) -> Self {
        self.exercise_performance.insert(exercise.into(), perf);
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    /// Marks the entry as modified at `now`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    /// Weighted load recorded for `exercise` on this day.
    pub fn weight_for(&self, exercise: &str) -> Option<f64> {
        self.exercise_performance
            .get(exercise)
            .and_then(ExercisePerformance::weighted)
    }
}

impl fmt::Display for DailyLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Daily Log: {}", self.date)?;
        writeln!(f, "{}", "=".repeat(30))?;
        writeln!(
            f,
            "Workout: {}",
            if self.workout_completed {
                "completed"
            } else {
                "pending"
            }
        )?;
        writeln!(f, "Nutrition: {}", self.nutrition_consumed)?;
        writeln!(f, "Water: {} glasses", self.water_intake)?;
        writeln!(f, "Body weight: {} lbs", self.body_weight)?;

        if !self.exercise_performance.is_empty() {
            writeln!(f, "Performance:")?;
            for (name, perf) in &self.exercise_performance {
                match perf.weighted() {
                    Some(w) => writeln!(f, "  - {}: {}x{} @ {} lbs", name, perf.sets, perf.reps, w)?,
                    None => writeln!(f, "  - {}: {}x{}", name, perf.sets, perf.reps)?,
                }
            }
        }

        if !self.meals.is_empty() {
            writeln!(f, "Meals:")?;
            for meal in &self.meals {
                writeln!(f, "  - {} ({})", meal.description, meal.macros)?;
            }
        }

        Ok(())
    }
}

/// Midnight UTC at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}
