use clap::Args;
use fittrack_core::FitnessApp;

use super::{canonical_exercise, today, OutputFormat};

/// Suggest the next working weight for an exercise
#[derive(Args)]
pub struct SuggestCommand {
    exercise: String,

    /// Base the suggestion on recorded feedback instead of logged sets
    #[arg(long)]
    feedback: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl SuggestCommand {
    pub fn run(&self, app: &FitnessApp) -> Result<(), Box<dyn std::error::Error>> {
        let exercise = canonical_exercise(&self.exercise);

        if self.feedback {
            let suggestion = app.feedback_suggestion(exercise)?;
            match (self.format, suggestion) {
                (OutputFormat::Json, s) => println!("{}", serde_json::to_string_pretty(&s)?),
                (OutputFormat::Text, Some(s)) => {
                    println!("{}: {} (increment {} lbs)", exercise, s.message, s.increment)
                }
                (OutputFormat::Text, None) => {
                    println!("No feedback recorded for {}", exercise)
                }
            }
            return Ok(());
        }

        let suggestion = app.suggest_weight(exercise, today());
        if let OutputFormat::Json = self.format {
            println!("{}", serde_json::to_string_pretty(&suggestion)?);
            return Ok(());
        }

        let (Some(suggested), Some(last), Some(increase)) =
            (suggestion.suggested, suggestion.last, suggestion.increase)
        else {
            println!("No weighted sets logged for {}", exercise);
            return Ok(());
        };
        println!("{}: try {} lbs", exercise, suggested);
        print!("  Last: {} lbs", last);
        if let (Some(sets), Some(reps)) = (suggestion.last_sets, suggestion.last_reps) {
            print!(" ({}x{})", sets, reps);
        }
        println!();
        println!("  Increase: +{} lbs", increase);
        Ok(())
    }
}
