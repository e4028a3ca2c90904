use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of items on the rest-day recovery checklist.
pub const CHECKLIST_ITEMS: usize = 6;

/// Rest-day recovery checklist for a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryChecklist {
    pub date: NaiveDate,
    pub checklist: [bool; CHECKLIST_ITEMS],
}

impl RecoveryChecklist {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            checklist: [false; CHECKLIST_ITEMS],
        }
    }

    pub fn is_perfect(&self) -> bool {
        self.checklist.iter().all(|done| *done)
    }

    pub fn completed(&self) -> usize {
        self.checklist.iter().filter(|done| **done).count()
    }

    /// Resets the list when `today` is a new day.
    ///
    /// Returns the previous date if that day's list was fully checked.
    pub fn roll_over(&mut self, today: NaiveDate) -> Option<NaiveDate> {
        if self.date == today {
            return None;
        }
        let perfect = self.is_perfect().then_some(self.date);
        *self = RecoveryChecklist::new(today);
        perfect
    }
}

/// Dates on which every checklist item was completed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PerfectRecoveryDays(Vec<NaiveDate>);

impl PerfectRecoveryDays {
    /// Records `date` once.
    pub fn record(&mut self, date: NaiveDate) -> bool {
        if self.0.contains(&date) {
            return false;
        }
        self.0.push(date);
        true
    }

    /// Perfect days in `today`'s month, plus one for today.
    pub fn count_this_month(&self, today: NaiveDate) -> usize {
        self.0
            .iter()
            .filter(|d| d.month() == today.month() && d.year() == today.year())
            .count()
            + 1
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.0
    }
}
