//! Weekly workout schedule and the static exercise library.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Weight increment used when an exercise has no specific one.
pub const DEFAULT_INCREMENT: f64 = 5.0;

/// A single movement in a workout.
#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub name: &'static str,
    pub sets: u32,
    pub reps: &'static str,
    pub weighted: bool,
    pub notes: &'static str,
    /// Progression step in lbs; 0 for bodyweight-only movements
    pub increment: f64,
}

const fn exercise(
    name: &'static str,
    sets: u32,
    reps: &'static str,
    weighted: bool,
    notes: &'static str,
    increment: f64,
) -> Exercise {
    Exercise {
        name,
        sets,
        reps,
        weighted,
        notes,
        increment,
    }
}

static WORKOUT_A: [Exercise; 5] = [
    exercise("Barbell Squat", 4, "8-10", true, "Full depth, controlled tempo", 10.0),
    exercise("Bench Press", 4, "8-10", true, "Touch chest, full lockout", 5.0),
    exercise("Cable Row", 3, "10-12", true, "Pull to sternum, squeeze", 5.0),
    exercise("Dumbbell Lunges", 3, "10 each leg", true, "Step forward, knee to 90 degrees", 5.0),
    exercise("Triceps Pushdown", 3, "12-15", true, "Full extension, control", 2.5),
];

static WORKOUT_B: [Exercise; 5] = [
    exercise("Pull-ups", 4, "6-10", true, "Wide grip, full range", 5.0),
    exercise("Romanian Deadlift", 4, "8-10", true, "Hinge at hips, tight back", 10.0),
    exercise("Incline Press", 3, "10-12", true, "30-45 degree angle", 5.0),
    exercise("Overhead Press", 3, "8-10", true, "Strict form, no leg drive", 5.0),
    exercise("Bicep Curl", 3, "12-15", true, "No swinging, controlled", 2.5),
];

static WORKOUT_C: [Exercise; 5] = [
    exercise("Leg Press", 4, "12-15", true, "Full range, push through heels", 10.0),
    exercise("Deadlifts", 4, "6-8", true, "Conventional or sumo, neutral spine", 10.0),
    exercise("Chest Fly", 3, "12-15", true, "Dumbbell or cable variation", 2.5),
    exercise("Lateral Raise", 3, "12-15", true, "Control tempo, slight bend", 2.5),
    exercise("Leg Extension", 3, "15-20", true, "Squeeze at top, slow negative", 2.5),
];

static CARDIO_DAY: [Exercise; 5] = [
    exercise("Cardio", 1, "30-40 min", false, "Running, cycling, or rowing at moderate intensity", 0.0),
    exercise("Leg Raises", 3, "15-20", false, "Hanging or lying variation", 0.0),
    exercise("Cable Crunches", 3, "15-20", true, "Pull down with abs, not arms", 5.0),
    exercise("Plank", 3, "60 sec", false, "Hold tight core, straight line", 0.0),
    exercise("Arm Finisher", 3, "21s", true, "7 bottom half + 7 top half + 7 full range curls", 2.5),
];

/// Identifies a workout in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkoutKey {
    #[serde(rename = "workoutA")]
    WorkoutA,
    #[serde(rename = "workoutB")]
    WorkoutB,
    #[serde(rename = "workoutC")]
    WorkoutC,
    #[serde(rename = "cardioDay")]
    CardioDay,
}

impl WorkoutKey {
    pub const ALL: [WorkoutKey; 4] = [
        WorkoutKey::WorkoutA,
        WorkoutKey::WorkoutB,
        WorkoutKey::WorkoutC,
        WorkoutKey::CardioDay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutKey::WorkoutA => "workoutA",
            WorkoutKey::WorkoutB => "workoutB",
            WorkoutKey::WorkoutC => "workoutC",
            WorkoutKey::CardioDay => "cardioDay",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WorkoutKey::WorkoutA => "Workout A - Legs & Chest",
            WorkoutKey::WorkoutB => "Workout B - Back & Press",
            WorkoutKey::WorkoutC => "Workout C - Legs & Chest",
            WorkoutKey::CardioDay => "Cardio Day",
        }
    }

    pub fn exercises(&self) -> &'static [Exercise] {
        match self {
            WorkoutKey::WorkoutA => &WORKOUT_A,
            WorkoutKey::WorkoutB => &WORKOUT_B,
            WorkoutKey::WorkoutC => &WORKOUT_C,
            WorkoutKey::CardioDay => &CARDIO_DAY,
        }
    }
}

impl fmt::Display for WorkoutKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WorkoutKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorkoutKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown workout: {}", s))
    }
}

/// What is planned for one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleDay {
    Rest,
    Workout(WorkoutKey),
}

impl ScheduleDay {
    pub fn is_rest(&self) -> bool {
        matches!(self, ScheduleDay::Rest)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScheduleDay::Rest => "Rest Day",
            ScheduleDay::Workout(key) => key.name(),
        }
    }

    pub fn workout_key(&self) -> Option<WorkoutKey> {
        match self {
            ScheduleDay::Rest => None,
            ScheduleDay::Workout(key) => Some(*key),
        }
    }

    pub fn exercises(&self) -> &'static [Exercise] {
        match self {
            ScheduleDay::Rest => &[],
            ScheduleDay::Workout(key) => key.exercises(),
        }
    }
}

/// The next planned workout after a given day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextWorkout {
    pub name: &'static str,
    pub weekday: Weekday,
    pub date: NaiveDate,
    pub days_until: i64,
}

/// Workouts by weekday, index 0 = Sunday.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklySchedule {
    days: [ScheduleDay; 7],
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        Self {
            days: [
                ScheduleDay::Rest,
                ScheduleDay::Workout(WorkoutKey::WorkoutA),
                ScheduleDay::Workout(WorkoutKey::CardioDay),
                ScheduleDay::Workout(WorkoutKey::WorkoutB),
                ScheduleDay::Rest,
                ScheduleDay::Workout(WorkoutKey::WorkoutC),
                ScheduleDay::Workout(WorkoutKey::CardioDay),
            ],
        }
    }
}

impl WeeklySchedule {
    pub fn new(days: [ScheduleDay; 7]) -> Self {
        Self { days }
    }

    pub fn for_date(&self, date: NaiveDate) -> ScheduleDay {
        self.days[date.weekday().num_days_from_sunday() as usize]
    }

    /// Rest weekdays in this schedule, 0 = Sunday.
    pub fn rest_days(&self) -> Vec<u32> {
        (0..7u32)
            .filter(|d| self.days[*d as usize].is_rest())
            .collect()
    }

    /// First workout day strictly after `from`, looking at most a week ahead.
    pub fn next_workout(&self, from: NaiveDate) -> Option<NextWorkout> {
        (1..=7).find_map(|offset| {
            let date = from + Duration::days(offset);
            match self.for_date(date) {
                ScheduleDay::Workout(key) => Some(NextWorkout {
                    name: key.name(),
                    weekday: date.weekday(),
                    date,
                    days_until: offset,
                }),
                ScheduleDay::Rest => None,
            }
        })
    }
}

/// Looks up an exercise by name across the whole library.
pub fn find_exercise(name: &str) -> Option<&'static Exercise> {
    WorkoutKey::ALL
        .iter()
        .flat_map(|k| k.exercises().iter())
        .find(|e| e.name.eq_ignore_ascii_case(name))
}

/// Progression step for `name`, falling back to [`DEFAULT_INCREMENT`].
pub fn exercise_increment(name: &str) -> f64 {
    find_exercise(name)
        .map(|e| e.increment)
        .unwrap_or(DEFAULT_INCREMENT)
}
