use clap::Args;
use fittrack_core::models::FeedbackType;
use fittrack_core::FitnessApp;

use super::{canonical_exercise, today};

/// Record how a working weight felt
#[derive(Args)]
pub struct FeedbackCommand {
    exercise: String,

    /// too-heavy, just-right or too-light
    feedback: FeedbackType,

    /// Weight used, in lbs
    weight: f64,

    /// Also set this as the exercise's working weight
    #[arg(long)]
    set_current: bool,
}

impl FeedbackCommand {
    pub fn run(&self, app: &FitnessApp) -> Result<(), Box<dyn std::error::Error>> {
        let exercise = canonical_exercise(&self.exercise);
        let date = today();

        if self.set_current {
            let record = app.record_weight(exercise, self.weight, date)?;
            tracing::debug!(
                exercise,
                weight = record.current_weight,
                history = record.history.len(),
                "Working weight updated"
            );
        }

        let suggestion = app.record_feedback(exercise, self.feedback, self.weight, date)?;
        println!(
            "Recorded '{}' for {} at {} lbs",
            self.feedback, exercise, self.weight
        );
        if let Some(s) = suggestion {
            println!("Next time: {}", s.message);
        }
        Ok(())
    }
}
