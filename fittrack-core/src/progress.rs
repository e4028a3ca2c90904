//! Read-only progress views over the daily log store.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::fmt;

use crate::models::{DailyLogEntry, WeeklySchedule};
use crate::store::FitnessStore;
use crate::suggest::week_start;

/// Completed entries on or after the most recent Sunday.
pub fn workouts_this_week(logs: &[DailyLogEntry], today: NaiveDate) -> usize {
    let start = week_start(today);
    logs.iter()
        .filter(|e| e.workout_completed && e.date >= start)
        .count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Completed,
    Rest,
    Missed,
    Future,
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayStatus::Completed => write!(f, "completed"),
            DayStatus::Rest => write!(f, "rest"),
            DayStatus::Missed => write!(f, "missed"),
            DayStatus::Future => write!(f, "future"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridDay {
    pub date: NaiveDate,
    pub status: DayStatus,
}

/// Status of each of the `days` days ending at `today`, oldest first.
pub fn progress_grid(
    store: &FitnessStore,
    schedule: &WeeklySchedule,
    today: NaiveDate,
    days: u32,
) -> Vec<GridDay> {
    (0..i64::from(days))
        .rev()
        .map(|back| {
            let date = today - Duration::days(back);
            let completed = store
                .find_by_date(date)
                .is_some_and(|e| e.workout_completed);

            // Today stays open until it is completed
            let status = if schedule.for_date(date).is_rest() {
                DayStatus::Rest
            } else if completed {
                DayStatus::Completed
            } else if date == today {
                DayStatus::Future
            } else {
                DayStatus::Missed
            };

            GridDay { date, status }
        })
        .collect()
}

/// The last `n` entries, most recently inserted first.
pub fn recent_history(store: &FitnessStore, n: usize) -> Vec<&DailyLogEntry> {
    store.logs().iter().rev().take(n).collect()
}

/// Logged body weights in date order.
pub fn weight_series(store: &FitnessStore) -> Vec<(NaiveDate, f64)> {
    let mut series: Vec<(NaiveDate, f64)> = store
        .logs()
        .iter()
        .filter(|e| e.body_weight > 0.0)
        .map(|e| (e.date, e.body_weight))
        .collect();
    series.sort_by_key(|(date, _)| *date);
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn store_with(entries: Vec<DailyLogEntry>) -> FitnessStore {
        let mut store = FitnessStore::new(Utc::now());
        for entry in entries {
            store.save(entry);
        }
        store
    }

    #[test]
    fn test_workouts_this_week() {
        let logs = vec![
            DailyLogEntry::new(date("2024-01-06"), 175.0).with_workout_completed(true),
            DailyLogEntry::new(date("2024-01-08"), 175.0).with_workout_completed(true),
            DailyLogEntry::new(date("2024-01-09"), 175.0),
            DailyLogEntry::new(date("2024-01-10"), 175.0).with_workout_completed(true),
        ];
        assert_eq!(workouts_this_week(&logs, date("2024-01-10")), 2);
    }

    #[test]
    fn test_progress_grid_statuses() {
        let store = store_with(vec![
            DailyLogEntry::new(date("2024-01-08"), 175.0).with_workout_completed(true),
            DailyLogEntry::new(date("2024-01-11"), 175.0).with_workout_completed(true),
        ]);
        let grid = progress_grid(&store, &WeeklySchedule::default(), date("2024-01-12"), 6);

        let statuses: Vec<DayStatus> = grid.iter().map(|d| d.status).collect();
        assert_eq!(grid[0].date, date("2024-01-07"));
        assert_eq!(
            statuses,
            vec![
                DayStatus::Rest,      // Sun
                DayStatus::Completed, // Mon
                DayStatus::Missed,    // Tue
                DayStatus::Missed,    // Wed
                DayStatus::Rest,      // Thu, rest wins
                DayStatus::Future,    // Fri, today and not done yet
            ]
        );
    }

    #[test]
    fn test_recent_history_is_reverse_insertion_order() {
        let store = store_with(vec![
            DailyLogEntry::new(date("2024-01-08"), 175.0),
            DailyLogEntry::new(date("2024-01-06"), 175.0),
            DailyLogEntry::new(date("2024-01-09"), 175.0),
        ]);
        let recent: Vec<NaiveDate> = recent_history(&store, 2).iter().map(|e| e.date).collect();
        assert_eq!(recent, vec![date("2024-01-09"), date("2024-01-06")]);
    }

    #[test]
    fn test_weight_series_sorted_by_date() {
        let store = store_with(vec![
            DailyLogEntry::new(date("2024-01-08"), 176.0),
            DailyLogEntry::new(date("2024-01-06"), 177.0),
            DailyLogEntry::new(date("2024-01-07"), 0.0),
        ]);
        assert_eq!(
            weight_series(&store),
            vec![(date("2024-01-06"), 177.0), (date("2024-01-08"), 176.0)]
        );
    }
}
