//! Progressive-overload weight suggestions.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::{exercise_increment, DailyLogEntry, FeedbackRecord, WeightRecord};

/// Multiplier applied to last week's load.
pub const OVERLOAD_FACTOR: f64 = 1.025;

/// Suggested load for an exercise based on logged history.
///
/// Without weighted history `has_history` is false and every number is
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightSuggestion {
    pub has_history: bool,
    pub suggested: Option<f64>,
    pub last: Option<f64>,
    pub increase: Option<f64>,
    pub last_sets: Option<u32>,
    pub last_reps: Option<u32>,
}

impl WeightSuggestion {
    fn from_last(last: f64, suggested: f64) -> Self {
        Self {
            has_history: true,
            suggested: Some(suggested),
            last: Some(last),
            increase: Some(suggested - last),
            last_sets: None,
            last_reps: None,
        }
    }
}

/// Suggestion derived from explicit feedback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackSuggestion {
    pub weight: f64,
    pub increment: f64,
    pub message: String,
}

/// Rounds half away from zero after snapping off float noise, so that
/// `100.0 * 1.025` rounds to 103.
pub fn round_half_up(value: f64) -> f64 {
    ((value * 1e6).round() / 1e6).round()
}

/// Suggests a load for `exercise` as of `today`.
///
/// If the same exercise was done with weight exactly a week ago, the
/// suggestion is that load plus 2.5%, rounded. Otherwise the most recent
/// weighted entry is repeated.
pub fn suggest_weight(exercise: &str, logs: &[DailyLogEntry], today: NaiveDate) -> WeightSuggestion {
    let last_week = today - Duration::days(7);

    if let Some(last) = logs
        .iter()
        .find(|e| e.date == last_week)
        .and_then(|e| e.weight_for(exercise))
    {
        return WeightSuggestion::from_last(last, round_half_up(last * OVERLOAD_FACTOR));
    }

    logs.iter()
        .filter(|e| e.weight_for(exercise).is_some())
        .max_by_key(|e| e.date)
        .and_then(|e| e.exercise_performance.get(exercise))
        .and_then(|perf| {
            let last = perf.weighted()?;
            Some(WeightSuggestion {
                last_sets: Some(perf.sets),
                last_reps: Some(perf.reps),
                ..WeightSuggestion::from_last(last, last)
            })
        })
        .unwrap_or_default()
}

/// Suggests the next load from the latest feedback on `exercise`.
///
/// The base is the stored working weight, else the weight of the latest
/// feedback. Too heavy holds, just right adds one increment, too light adds
/// two.
pub fn suggest_weight_from_feedback(
    exercise: &str,
    weight: Option<&WeightRecord>,
    feedback: Option<&FeedbackRecord>,
) -> Option<FeedbackSuggestion> {
    let latest = feedback?.latest()?;
    let base = weight.map(|w| w.current_weight).unwrap_or(latest.weight);
    let increment = exercise_increment(exercise);
    let next = base + f64::from(latest.kind.steps()) * increment;

    Some(FeedbackSuggestion {
        weight: next,
        increment,
        message: format!("Try {} lbs", next),
    })
}

/// Whether `weight` beats every weighted entry for `exercise` on other dates.
///
/// The first weighted entry for an exercise is always a record.
pub fn is_personal_record(
    exercise: &str,
    weight: f64,
    logs: &[DailyLogEntry],
    exclude_date: NaiveDate,
) -> bool {
    if weight <= 0.0 {
        return false;
    }
    logs.iter()
        .filter(|e| e.date != exclude_date)
        .filter_map(|e| e.weight_for(exercise))
        .reduce(f64::max)
        .map_or(true, |best| weight > best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExercisePerformance, FeedbackEntry, FeedbackType};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn lifted(day: &str, exercise: &str, weight: f64) -> DailyLogEntry {
        DailyLogEntry::new(date(day), 175.0)
            .with_performance(exercise, ExercisePerformance::new(4, 8, Some(weight)))
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(102.5), 103.0);
        assert_eq!(round_half_up(100.0 * 1.025), 103.0);
        assert_eq!(round_half_up(102.4), 102.0);
    }

    #[test]
    fn test_suggest_from_exactly_one_week_ago() {
        let logs = vec![lifted("2024-01-01", "Bench Press", 100.0)];
        let suggestion = suggest_weight("Bench Press", &logs, date("2024-01-08"));

        assert!(suggestion.has_history);
        assert_eq!(suggestion.suggested, Some(103.0));
        assert_eq!(suggestion.last, Some(100.0));
        assert_eq!(suggestion.increase, Some(3.0));
    }

    #[test]
    fn test_suggest_falls_back_to_most_recent() {
        let logs = vec![
            lifted("2024-01-02", "Bench Press", 95.0),
            lifted("2024-01-04", "Bench Press", 100.0),
            lifted("2024-01-03", "Bench Press", 90.0),
        ];
        let suggestion = suggest_weight("Bench Press", &logs, date("2024-01-20"));

        assert_eq!(suggestion.suggested, Some(100.0));
        assert_eq!(suggestion.increase, Some(0.0));
        assert_eq!(suggestion.last_sets, Some(4));
        assert_eq!(suggestion.last_reps, Some(8));
    }

    #[test]
    fn test_suggest_without_history() {
        let logs = vec![lifted("2024-01-01", "Squat", 100.0)];
        let suggestion = suggest_weight("Bench Press", &logs, date("2024-01-08"));
        assert!(!suggestion.has_history);
        assert_eq!(suggestion.suggested, None);

        let bodyweight = vec![DailyLogEntry::new(date("2024-01-01"), 175.0)
            .with_performance("Plank", ExercisePerformance::new(3, 60, None))];
        assert!(!suggest_weight("Plank", &bodyweight, date("2024-01-08")).has_history);
    }

    #[test]
    fn test_suggestion_json_always_has_history_flag() {
        let none = serde_json::to_value(suggest_weight("Squat", &[], date("2024-01-08"))).unwrap();
        assert_eq!(none["hasHistory"], false);
        assert!(none["suggested"].is_null());

        let logs = vec![lifted("2024-01-01", "Squat", 200.0)];
        let some = serde_json::to_value(suggest_weight("Squat", &logs, date("2024-01-08"))).unwrap();
        assert_eq!(some["hasHistory"], true);
        assert_eq!(some["suggested"], 205.0);
    }

    #[test]
    fn test_feedback_too_light_adds_two_increments() {
        let mut feedback = FeedbackRecord::default();
        feedback.push(FeedbackEntry {
            kind: FeedbackType::TooLight,
            weight: 50.0,
            date: date("2024-01-08"),
        });

        let suggestion =
            suggest_weight_from_feedback("Cable Row", None, Some(&feedback)).unwrap();
        assert_eq!(suggestion.weight, 60.0);
        assert_eq!(suggestion.message, "Try 60 lbs");
    }

    #[test]
    fn test_feedback_uses_working_weight_and_exercise_increment() {
        let mut feedback = FeedbackRecord::default();
        feedback.push(FeedbackEntry {
            kind: FeedbackType::JustRight,
            weight: 20.0,
            date: date("2024-01-08"),
        });
        let record = WeightRecord::new(25.0, date("2024-01-08"));

        let suggestion =
            suggest_weight_from_feedback("Lateral Raise", Some(&record), Some(&feedback)).unwrap();
        assert_eq!(suggestion.weight, 27.5);
        assert_eq!(suggestion.message, "Try 27.5 lbs");
    }

    #[test]
    fn test_feedback_too_heavy_holds() {
        let mut feedback = FeedbackRecord::default();
        feedback.push(FeedbackEntry {
            kind: FeedbackType::TooHeavy,
            weight: 225.0,
            date: date("2024-01-08"),
        });

        let suggestion =
            suggest_weight_from_feedback("Barbell Squat", None, Some(&feedback)).unwrap();
        assert_eq!(suggestion.weight, 225.0);
    }

    #[test]
    fn test_feedback_without_entries() {
        assert!(suggest_weight_from_feedback("Bench Press", None, None).is_none());
        let empty = FeedbackRecord::default();
        assert!(suggest_weight_from_feedback("Bench Press", None, Some(&empty)).is_none());
    }

    #[test]
    fn test_personal_record() {
        let logs = vec![
            lifted("2024-01-01", "Bench Press", 100.0),
            lifted("2024-01-03", "Bench Press", 110.0),
            lifted("2024-01-08", "Bench Press", 120.0),
        ];
        let today = date("2024-01-08");

        assert!(is_personal_record("Bench Press", 115.0, &logs, today));
        assert!(!is_personal_record("Bench Press", 110.0, &logs, today));
        assert!(is_personal_record("Squat", 135.0, &logs, today));
        assert!(!is_personal_record("Squat", 0.0, &logs, today));
    }
}
