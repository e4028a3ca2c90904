mod daily_log;
mod profile;
mod recovery;
mod schedule;
mod timer;
mod weights;

pub use daily_log::{start_of_day, DailyLogEntry, ExercisePerformance, Macros, Meal};
pub use profile::{NutritionGoals, UserProfile};
pub use recovery::{PerfectRecoveryDays, RecoveryChecklist, CHECKLIST_ITEMS};
pub use schedule::{
    exercise_increment, find_exercise, Exercise, NextWorkout, ScheduleDay, WeeklySchedule,
    WorkoutKey, DEFAULT_INCREMENT,
};
pub use timer::RestTimer;
pub use weights::{
    FeedbackBook, FeedbackEntry, FeedbackRecord, FeedbackType, WeightBook, WeightPoint,
    WeightRecord, MAX_FEEDBACK_ENTRIES,
};
