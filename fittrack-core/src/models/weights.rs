use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::str::FromStr;

/// Most feedback entries kept per exercise.
pub const MAX_FEEDBACK_ENTRIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightPoint {
    pub weight: f64,
    pub date: NaiveDate,
}

/// Working weight for one exercise, independent of the daily logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightRecord {
    pub current_weight: f64,
    #[serde(default)]
    pub history: Vec<WeightPoint>,
    pub last_update: NaiveDate,
}

impl WeightRecord {
    pub fn new(weight: f64, date: NaiveDate) -> Self {
        Self {
            current_weight: weight,
            history: vec![WeightPoint { weight, date }],
            last_update: date,
        }
    }

    pub fn update(&mut self, weight: f64, date: NaiveDate) {
        self.current_weight = weight;
        self.history.push(WeightPoint { weight, date });
        self.last_update = date;
    }
}

/// Persisted under `userWeights`, keyed by exercise name.
pub type WeightBook = BTreeMap<String, WeightRecord>;

/// How a set felt at the prescribed weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackType {
    TooHeavy,
    JustRight,
    TooLight,
}

impl FeedbackType {
    /// Number of increments to add to the current weight.
    pub fn steps(&self) -> u32 {
        match self {
            FeedbackType::TooHeavy => 0,
            FeedbackType::JustRight => 1,
            FeedbackType::TooLight => 2,
        }
    }
}

impl fmt::Display for FeedbackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackType::TooHeavy => write!(f, "too-heavy"),
            FeedbackType::JustRight => write!(f, "just-right"),
            FeedbackType::TooLight => write!(f, "too-light"),
        }
    }
}

impl FromStr for FeedbackType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "too-heavy" | "heavy" => Ok(FeedbackType::TooHeavy),
            "just-right" | "right" => Ok(FeedbackType::JustRight),
            "too-light" | "light" => Ok(FeedbackType::TooLight),
            _ => Err(format!(
                "Invalid feedback '{}'. Valid values: too-heavy, just-right, too-light",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    #[serde(rename = "type")]
    pub kind: FeedbackType,
    pub weight: f64,
    pub date: NaiveDate,
}

/// Recent feedback for one exercise, oldest first, capped at
/// [`MAX_FEEDBACK_ENTRIES`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackRecord {
    entries: VecDeque<FeedbackEntry>,
}

impl FeedbackRecord {
    pub fn push(&mut self, entry: FeedbackEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > MAX_FEEDBACK_ENTRIES {
            self.entries.pop_front();
        }
    }

    pub fn latest(&self) -> Option<&FeedbackEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeedbackEntry> {
        self.entries.iter()
    }
}

/// Persisted under `exerciseFeedback`, keyed by exercise name.
pub type FeedbackBook = BTreeMap<String, FeedbackRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, n).unwrap()
    }

    #[test]
    fn test_feedback_record_evicts_oldest() {
        let mut record = FeedbackRecord::default();
        for n in 1..=12 {
            record.push(FeedbackEntry {
                kind: FeedbackType::JustRight,
                weight: n as f64,
                date: day(n),
            });
        }

        assert_eq!(record.len(), MAX_FEEDBACK_ENTRIES);
        assert_eq!(record.iter().next().unwrap().date, day(3));
        assert_eq!(record.latest().unwrap().date, day(12));
    }

    #[test]
    fn test_feedback_type_serializes_kebab_case() {
        let entry = FeedbackEntry {
            kind: FeedbackType::TooLight,
            weight: 50.0,
            date: day(1),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "too-light");
    }

    #[test]
    fn test_feedback_type_parse() {
        assert_eq!("too-heavy".parse::<FeedbackType>().unwrap(), FeedbackType::TooHeavy);
        assert_eq!("just_right".parse::<FeedbackType>().unwrap(), FeedbackType::JustRight);
        assert!("meh".parse::<FeedbackType>().is_err());
    }

    #[test]
    fn test_weight_record_update_appends_history() {
        let mut record = WeightRecord::new(100.0, day(1));
        record.update(105.0, day(8));

        assert_eq!(record.current_weight, 105.0);
        assert_eq!(record.history.len(), 2);
        assert_eq!(record.last_update, day(8));
    }
}
