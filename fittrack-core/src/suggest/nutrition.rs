//! Macro aggregation over the daily logs.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::fmt;

use crate::models::{DailyLogEntry, Macros, NutritionGoals};

/// Calories within this distance of the goal count as on target.
pub const CALORIE_TOLERANCE: f64 = 200.0;
/// Share of the protein goal that counts as met.
pub const PROTEIN_THRESHOLD: f64 = 0.9;

/// Share of calories from each macro, in whole percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroPercentages {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub total_cals: f64,
}

/// Protein and carbs yield 4 kcal/g, fat 9 kcal/g.
pub fn macro_percentages(consumed: &Macros) -> MacroPercentages {
    let protein = consumed.protein * 4.0;
    let carbs = consumed.carbs * 4.0;
    let fat = consumed.fat * 9.0;
    let total = protein + carbs + fat;

    if total <= 0.0 {
        return MacroPercentages::default();
    }

    MacroPercentages {
        protein: (protein / total * 100.0).round(),
        carbs: (carbs / total * 100.0).round(),
        fat: (fat / total * 100.0).round(),
        total_cals: total.round(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MacroStatus {
    OnTrack,
    Warning,
    Over,
}

impl MacroStatus {
    fn classify(remaining: f64, warn_below: f64) -> Self {
        if remaining < 0.0 {
            MacroStatus::Over
        } else if remaining < warn_below {
            MacroStatus::Warning
        } else {
            MacroStatus::OnTrack
        }
    }
}

impl fmt::Display for MacroStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacroStatus::OnTrack => write!(f, "on-track"),
            MacroStatus::Warning => write!(f, "warning"),
            MacroStatus::Over => write!(f, "over"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Remaining {
    pub amount: f64,
    pub status: MacroStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RemainingMacros {
    pub calories: Remaining,
    pub protein: Remaining,
    pub carbs: Remaining,
    pub fat: Remaining,
}

/// What is left of the day's goals, flagged when close to or past the goal.
pub fn remaining_macros(goals: &NutritionGoals, consumed: &Macros) -> RemainingMacros {
    let remaining = |goal: f64, eaten: f64, warn_below: f64| {
        let amount = goal - eaten;
        Remaining {
            amount,
            status: MacroStatus::classify(amount, warn_below),
        }
    };

    RemainingMacros {
        calories: remaining(goals.calories, consumed.calories, 300.0),
        protein: remaining(goals.protein, consumed.protein, 30.0),
        carbs: remaining(goals.carbs, consumed.carbs, 40.0),
        fat: remaining(goals.fat, consumed.fat, 15.0),
    }
}

/// Direction of an average relative to its goal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Same,
}

impl Trend {
    fn compare(value: f64, goal: f64) -> Self {
        if value > goal {
            Trend::Up
        } else if value < goal {
            Trend::Down
        } else {
            Trend::Same
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Up => "↑",
            Trend::Down => "↓",
            Trend::Same => "→",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MacroTrends {
    pub calories: Trend,
    pub protein: Trend,
    pub carbs: Trend,
    pub fat: Trend,
}

/// Averages for the current Sunday-start week.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyNutrition {
    pub averages: Macros,
    /// Fraction of logged days on target, 0.0 to 1.0
    pub adherence: f64,
    pub days_logged: usize,
    pub trends: MacroTrends,
}

/// The Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// Averages the entries logged in `today`'s week.
///
/// A day is on target when calories are strictly within 200 of the goal and
/// protein reaches 90% of the goal.
pub fn weekly_nutrition_averages(
    logs: &[DailyLogEntry],
    goals: &NutritionGoals,
    today: NaiveDate,
) -> WeeklyNutrition {
    let start = week_start(today);
    let end = start + Duration::days(7);

    let week: Vec<&DailyLogEntry> = logs
        .iter()
        .filter(|e| e.date >= start && e.date < end)
        .collect();

    if week.is_empty() {
        return WeeklyNutrition::default();
    }

    let days = week.len() as f64;
    let totals = week
        .iter()
        .fold(Macros::default(), |acc, e| acc + e.nutrition_consumed);
    let averages = Macros::new(
        (totals.calories / days).round(),
        (totals.protein / days).round(),
        (totals.carbs / days).round(),
        (totals.fat / days).round(),
    );

    let on_target = week
        .iter()
        .filter(|e| {
            let n = &e.nutrition_consumed;
            (n.calories - goals.calories).abs() < CALORIE_TOLERANCE
                && n.protein >= goals.protein * PROTEIN_THRESHOLD
        })
        .count();

    WeeklyNutrition {
        averages,
        adherence: on_target as f64 / days,
        days_logged: week.len(),
        trends: MacroTrends {
            calories: Trend::compare(averages.calories, goals.calories),
            protein: Trend::compare(averages.protein, goals.protein),
            carbs: Trend::compare(averages.carbs, goals.carbs),
            fat: Trend::compare(averages.fat, goals.fat),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn ate(day: &str, calories: f64, protein: f64) -> DailyLogEntry {
        DailyLogEntry::new(date(day), 175.0)
            .with_nutrition(Macros::new(calories, protein, 200.0, 70.0))
    }

    #[test]
    fn test_macro_percentages() {
        let p = macro_percentages(&Macros::new(0.0, 100.0, 100.0, 0.0));
        assert_eq!(p.protein, 50.0);
        assert_eq!(p.carbs, 50.0);
        assert_eq!(p.fat, 0.0);
        assert_eq!(p.total_cals, 800.0);

        assert_eq!(macro_percentages(&Macros::default()), MacroPercentages::default());
    }

    #[test]
    fn test_remaining_macros_status() {
        let goals = NutritionGoals::default();
        let remaining = remaining_macros(&goals, &Macros::new(1900.0, 100.0, 210.0, 20.0));

        assert_eq!(remaining.calories.amount, 200.0);
        assert_eq!(remaining.calories.status, MacroStatus::Warning);
        assert_eq!(remaining.protein.status, MacroStatus::OnTrack);
        assert_eq!(remaining.carbs.status, MacroStatus::Over);
        assert_eq!(remaining.fat.status, MacroStatus::OnTrack);
    }

    #[test]
    fn test_week_start_is_sunday() {
        assert_eq!(week_start(date("2024-01-10")), date("2024-01-07"));
        assert_eq!(week_start(date("2024-01-07")), date("2024-01-07"));
    }

    #[test]
    fn test_empty_week() {
        let logs = vec![ate("2024-01-01", 2100.0, 160.0)];
        let weekly = weekly_nutrition_averages(&logs, &NutritionGoals::default(), date("2024-01-10"));

        assert_eq!(weekly.averages, Macros::default());
        assert_eq!(weekly.adherence, 0.0);
        assert_eq!(weekly.days_logged, 0);
        assert_eq!(weekly.trends.calories, Trend::Same);
    }

    #[test]
    fn test_weekly_averages_and_adherence() {
        let logs = vec![
            ate("2024-01-06", 3000.0, 200.0), // previous week
            ate("2024-01-07", 2100.0, 160.0),
            ate("2024-01-08", 2299.0, 144.0),
            ate("2024-01-09", 2300.0, 160.0), // exactly 200 over is not on target
            ate("2024-01-10", 1500.0, 100.0),
        ];
        let weekly = weekly_nutrition_averages(&logs, &NutritionGoals::default(), date("2024-01-10"));

        assert_eq!(weekly.days_logged, 4);
        assert_eq!(weekly.averages.calories, 2050.0);
        assert_eq!(weekly.averages.protein, 141.0);
        assert_eq!(weekly.adherence, 0.5);
        assert_eq!(weekly.trends.calories, Trend::Down);
        assert_eq!(weekly.trends.carbs, Trend::Same);
        assert_eq!(weekly.trends.calories.arrow(), "↓");
    }
}
