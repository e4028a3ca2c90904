use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Daily nutrition and hydration targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionGoals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    /// Glasses of water per day
    pub water: u32,
}

impl Default for NutritionGoals {
    fn default() -> Self {
        Self {
            calories: 2100.0,
            protein: 160.0,
            carbs: 200.0,
            fat: 70.0,
            water: 8,
        }
    }
}

/// The athlete's profile. Body weight is in lbs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub age: u32,
    pub height_inches: u32,
    pub weight: f64,
    pub goals: NutritionGoals,
    pub diet: String,
    /// Rest weekdays, 0 = Sunday .. 6 = Saturday
    pub rest_days: Vec<u32>,
    /// Program length in months
    pub program_duration: u32,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            age: 31,
            height_inches: 73,
            weight: 175.0,
            goals: NutritionGoals::default(),
            diet: "pescatarian".to_string(),
            rest_days: vec![0, 4],
            program_duration: 7,
        }
    }
}

impl UserProfile {
    /// Whether `date` falls on one of the profile's rest weekdays.
    pub fn is_rest_day(&self, date: NaiveDate) -> bool {
        self.rest_days
            .contains(&date.weekday().num_days_from_sunday())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rest_days_are_sunday_and_thursday() {
        let profile = UserProfile::default();
        // 2024-01-07 is a Sunday, 2024-01-11 a Thursday
        assert!(profile.is_rest_day(NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()));
        assert!(profile.is_rest_day(NaiveDate::from_ymd_opt(2024, 1, 11).unwrap()));
        assert!(!profile.is_rest_day(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()));
    }

    #[test]
    fn test_partial_profile_uses_defaults() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"weight": 182.5, "rest_days": [0]}"#).unwrap();
        assert_eq!(profile.weight, 182.5);
        assert_eq!(profile.rest_days, vec![0]);
        assert_eq!(profile.goals.calories, 2100.0);
        assert_eq!(profile.diet, "pescatarian");
    }
}
