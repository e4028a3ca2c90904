mod config_cmd;
mod feedback;
mod meal;
mod progress;
mod recovery;
mod suggest;
mod sync_cmd;
mod timer;
mod today;
mod water;
mod weight;
mod workout;

pub use config_cmd::ConfigCommand;
pub use feedback::FeedbackCommand;
pub use meal::{MealCommand, MealSubcommand};
pub use progress::ProgressCommand;
pub use recovery::RecoveryCommand;
pub use suggest::SuggestCommand;
pub use sync_cmd::SyncCommand;
pub use timer::TimerCommand;
pub use today::TodayCommand;
pub use water::WaterCommand;
pub use weight::WeightCommand;
pub use workout::WorkoutCommand;

use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use fittrack_core::models::find_exercise;
use fittrack_core::Macros;

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Macro totals entered by hand.
#[derive(Debug, Clone, Args)]
pub struct MacroArgs {
    /// Calories (kcal)
    #[arg(long)]
    pub calories: Option<f64>,

    /// Protein (g)
    #[arg(long)]
    pub protein: Option<f64>,

    /// Carbohydrates (g)
    #[arg(long)]
    pub carbs: Option<f64>,

    /// Fat (g)
    #[arg(long)]
    pub fat: Option<f64>,
}

impl MacroArgs {
    /// `None` when no macro was given; missing ones count as zero.
    pub fn to_macros(&self) -> Option<Macros> {
        if self.calories.is_none()
            && self.protein.is_none()
            && self.carbs.is_none()
            && self.fat.is_none()
        {
            return None;
        }
        Some(Macros::new(
            self.calories.unwrap_or(0.0),
            self.protein.unwrap_or(0.0),
            self.carbs.unwrap_or(0.0),
            self.fat.unwrap_or(0.0),
        ))
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses `--date`, defaulting to today.
pub fn parse_date(date: &Option<String>) -> Result<NaiveDate, String> {
    match date {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map_err(|_| format!("Invalid date format '{}'. Use YYYY-MM-DD.", d)),
        None => Ok(today()),
    }
}

/// The library spelling of `name` when it matches a known exercise.
pub fn canonical_exercise(name: &str) -> &str {
    find_exercise(name.trim()).map_or(name, |e| e.name)
}

/// Prints a sync outcome after a write, if one happened.
pub fn report_sync(result: Option<fittrack_core::SyncResult>) {
    if let Some(result) = result {
        if !result.success {
            println!(
                "Saved locally. Cloud sync pending: {}",
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}
