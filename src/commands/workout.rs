use clap::{Args, Subcommand};
use fittrack_core::{Completion, FitnessApp};

use super::{canonical_exercise, parse_date, report_sync, MacroArgs};

#[derive(Args)]
pub struct WorkoutCommand {
    #[command(subcommand)]
    pub command: WorkoutSubcommand,
}

#[derive(Subcommand)]
pub enum WorkoutSubcommand {
    /// Check off an exercise (1-based, as listed by `fit today`)
    Toggle {
        number: usize,

        /// Uncheck instead
        #[arg(long)]
        undo: bool,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Record sets, reps and weight for an exercise
    Perf {
        exercise: String,

        #[arg(long)]
        sets: u32,

        #[arg(long)]
        reps: u32,

        /// Weight in lbs; omit for bodyweight exercises
        #[arg(long, short)]
        weight: Option<f64>,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Mark the day's workout as completed
    Complete {
        #[command(flatten)]
        nutrition: MacroArgs,

        /// Body weight in lbs, defaults to the profile weight
        #[arg(long)]
        body_weight: Option<f64>,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Log a scheduled rest day
    Rest {
        #[command(flatten)]
        nutrition: MacroArgs,

        /// Body weight in lbs, defaults to the profile weight
        #[arg(long)]
        body_weight: Option<f64>,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },
}

impl WorkoutCommand {
    pub async fn run(&self, app: &mut FitnessApp) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            WorkoutSubcommand::Toggle { number, undo, date } => {
                let date = parse_date(date)?;
                if *number == 0 {
                    return Err("Exercise numbers start at 1".into());
                }
                let index = number - 1;
                let sync = app.toggle_exercise(date, index, !undo).await?;

                let day = app.schedule_for(date);
                let name = day.exercises().get(index).map_or("exercise", |e| e.name);
                println!("{} {}", if *undo { "Unchecked" } else { "Checked" }, name);
                report_sync(sync);
            }
            WorkoutSubcommand::Perf {
                exercise,
                sets,
                reps,
                weight,
                date,
            } => {
                let date = parse_date(date)?;
                let exercise = canonical_exercise(exercise);
                let is_record = weight
                    .map(|w| app.is_personal_record(exercise, w, date))
                    .unwrap_or(false);
                let sync = app
                    .log_performance(date, exercise, *sets, *reps, *weight)
                    .await?;

                match weight.filter(|w| *w > 0.0) {
                    Some(w) => println!("Logged {}: {}x{} @ {} lbs", exercise, sets, reps, w),
                    None => println!("Logged {}: {}x{}", exercise, sets, reps),
                }
                if is_record {
                    println!("New personal record!");
                }
                report_sync(sync);
            }
            WorkoutSubcommand::Complete {
                nutrition,
                body_weight,
                date,
            } => {
                let date = parse_date(date)?;
                let completion = app
                    .complete_workout(date, nutrition.to_macros(), *body_weight)
                    .await?;
                println!("Workout completed for {}.", date);
                print_completion(completion);
            }
            WorkoutSubcommand::Rest {
                nutrition,
                body_weight,
                date,
            } => {
                let date = parse_date(date)?;
                let completion = app
                    .log_rest_day(date, nutrition.to_macros(), *body_weight)
                    .await?;
                println!("Rest day logged for {}.", date);
                print_completion(completion);
            }
        }
        Ok(())
    }
}

fn print_completion(completion: Completion) {
    if completion.streak > completion.previous_streak {
        println!("Streak: {} day(s), keep it going!", completion.streak);
    } else if completion.streak < completion.previous_streak {
        println!(
            "Streak reset to {} (was {}). Start a new one today.",
            completion.streak, completion.previous_streak
        );
    } else {
        println!("Streak: {} day(s)", completion.streak);
    }
    report_sync(completion.sync);
}
