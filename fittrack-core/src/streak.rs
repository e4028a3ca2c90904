//! Rest-day-aware workout streak.

use chrono::{Duration, NaiveDate};

use crate::models::DailyLogEntry;

/// Longest gap, in days, that rest days may bridge between two workouts.
pub const MAX_STREAK_GAP: i64 = 7;

/// Counts consecutive completed days ending at the most recent completed day.
///
/// Days for which `is_rest_day` returns true are skipped: they neither break
/// the streak nor need an entry.
pub fn compute_streak<F>(logs: &[DailyLogEntry], is_rest_day: F) -> u32
where
    F: Fn(NaiveDate) -> bool,
{
    let mut dates: Vec<NaiveDate> = logs
        .iter()
        .filter(|e| e.workout_completed)
        .map(|e| e.date)
        .collect();
    dates.sort_unstable_by(|a, b| b.cmp(a));
    dates.dedup();

    let Some((&first, rest)) = dates.split_first() else {
        return 0;
    };

    let mut streak = 1;
    let mut anchor = first;

    for &candidate in rest {
        let expected = previous_workout_day(anchor, &is_rest_day);

        if candidate == expected || bridged_by_rest(candidate, anchor, &is_rest_day) {
            streak += 1;
            anchor = candidate;
        } else {
            break;
        }
    }

    streak
}

/// The closest earlier day that is not a rest day, at most a week back.
fn previous_workout_day<F>(anchor: NaiveDate, is_rest_day: &F) -> NaiveDate
where
    F: Fn(NaiveDate) -> bool,
{
    let mut date = anchor - Duration::days(1);
    for _ in 0..MAX_STREAK_GAP {
        if !is_rest_day(date) {
            break;
        }
        date -= Duration::days(1);
    }
    date
}

/// True when every day strictly between `earlier` and `later` is a rest day
/// and the gap is within [`MAX_STREAK_GAP`].
fn bridged_by_rest<F>(earlier: NaiveDate, later: NaiveDate, is_rest_day: &F) -> bool
where
    F: Fn(NaiveDate) -> bool,
{
    let gap = (later - earlier).num_days();
    if gap < 1 || gap > MAX_STREAK_GAP {
        return false;
    }
    (1..gap).all(|offset| is_rest_day(earlier + Duration::days(offset)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserProfile;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn completed(dates: &[&str]) -> Vec<DailyLogEntry> {
        dates
            .iter()
            .map(|d| DailyLogEntry::new(date(d), 175.0).with_workout_completed(true))
            .collect()
    }

    fn no_rest(_: NaiveDate) -> bool {
        false
    }

    #[test]
    fn test_empty_history_is_zero() {
        assert_eq!(compute_streak(&[], no_rest), 0);

        let pending = vec![DailyLogEntry::new(date("2024-01-08"), 175.0)];
        assert_eq!(compute_streak(&pending, no_rest), 0);
    }

    #[test]
    fn test_single_completed_entry_is_one() {
        assert_eq!(compute_streak(&completed(&["2024-01-08"]), no_rest), 1);
    }

    #[test]
    fn test_consecutive_days_count() {
        let logs = completed(&["2024-01-08", "2024-01-09", "2024-01-10"]);
        assert_eq!(compute_streak(&logs, no_rest), 3);
    }

    #[test]
    fn test_missed_workout_day_breaks_streak() {
        // Mon, Wed, Thu with no rest days configured
        let logs = completed(&["2024-01-08", "2024-01-10", "2024-01-11"]);
        assert_eq!(compute_streak(&logs, no_rest), 2);
    }

    #[test]
    fn test_rest_days_do_not_break_streak() {
        let profile = UserProfile::default();
        // Wed 10th, (Thu rest), Fri 12th, Sat 13th, (Sun rest), Mon 15th
        let logs = completed(&["2024-01-10", "2024-01-12", "2024-01-13", "2024-01-15"]);
        assert_eq!(compute_streak(&logs, |d| profile.is_rest_day(d)), 4);
    }

    #[test]
    fn test_full_weeks_are_counted_across_week_boundaries() {
        let profile = UserProfile::default();
        let start = date("2024-01-01");
        let logs: Vec<DailyLogEntry> = (0..21)
            .map(|n| start + Duration::days(n))
            .filter(|d| !profile.is_rest_day(*d))
            .map(|d| DailyLogEntry::new(d, 175.0).with_workout_completed(true))
            .collect();

        assert_eq!(logs.len(), 15);
        assert_eq!(compute_streak(&logs, |d| profile.is_rest_day(d)), 15);
    }

    #[test]
    fn test_completed_rest_day_counts_too() {
        let profile = UserProfile::default();
        // Wed, Thu (rest but logged), Fri
        let logs = completed(&["2024-01-10", "2024-01-11", "2024-01-12"]);
        assert_eq!(compute_streak(&logs, |d| profile.is_rest_day(d)), 3);
    }

    #[test]
    fn test_missed_day_between_rest_days_breaks_streak() {
        let profile = UserProfile::default();
        // Mon 8th, then nothing until Fri 12th: Tue and Wed were missed
        let logs = completed(&["2024-01-08", "2024-01-12"]);
        assert_eq!(compute_streak(&logs, |d| profile.is_rest_day(d)), 1);
    }

    #[test]
    fn test_duplicate_dates_count_once() {
        let mut logs = completed(&["2024-01-08", "2024-01-09"]);
        logs.extend(completed(&["2024-01-09"]));
        assert_eq!(compute_streak(&logs, no_rest), 2);
    }

    #[test]
    fn test_order_of_logs_does_not_matter() {
        let logs = completed(&["2024-01-10", "2024-01-08", "2024-01-09"]);
        assert_eq!(compute_streak(&logs, no_rest), 3);
    }

    #[test]
    fn test_all_rest_week_is_bounded() {
        // Rest every day: gaps longer than a week still break
        let logs = completed(&["2024-01-01", "2024-01-20"]);
        assert_eq!(compute_streak(&logs, |_| true), 1);
    }
}
