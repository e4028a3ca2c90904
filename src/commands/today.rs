use clap::Args;
use fittrack_core::suggest::{remaining_macros, Remaining};
use fittrack_core::{FitnessApp, ScheduleDay};

use super::{parse_date, OutputFormat};

/// Show the day's workout, nutrition and water
#[derive(Args)]
pub struct TodayCommand {
    /// Date (YYYY-MM-DD), defaults to today
    #[arg(long, short)]
    date: Option<String>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl TodayCommand {
    pub fn run(&self, app: &FitnessApp) -> Result<(), Box<dyn std::error::Error>> {
        let date = parse_date(&self.date)?;
        let entry = app.entry(date);
        let day = app.schedule_for(date);
        let goals = &app.profile().goals;
        let remaining = remaining_macros(goals, &entry.nutrition_consumed);

        if let OutputFormat::Json = self.format {
            let value = serde_json::json!({
                "date": date,
                "workout": day.workout_key().map(|k| k.as_str()),
                "workoutName": day.name(),
                "entry": entry,
                "remaining": remaining,
                "streak": app.store().streak(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
            return Ok(());
        }

        println!("{} - {}", date.format("%A, %B %-d"), day.name());
        println!("{}", "=".repeat(40));

        match day {
            ScheduleDay::Workout(key) => {
                for (i, exercise) in key.exercises().iter().enumerate() {
                    let mark = if entry.exercise_logs.contains(&i) {
                        "x"
                    } else {
                        " "
                    };
                    let mut line = format!(
                        "  [{}] {}. {} - {} x {}",
                        mark,
                        i + 1,
                        exercise.name,
                        exercise.sets,
                        exercise.reps
                    );
                    if let Some(perf) = entry.exercise_performance.get(exercise.name) {
                        line.push_str(&format!(" (logged {}x{}", perf.sets, perf.reps));
                        if let Some(w) = perf.weighted() {
                            line.push_str(&format!(" @ {} lbs", w));
                        }
                        line.push(')');
                    }
                    println!("{}", line);
                }
            }
            ScheduleDay::Rest => {
                println!("  Rest and recover.");
                if let Some(next) = app.next_workout(date) {
                    println!(
                        "  Next: {} on {} (in {} day{})",
                        next.name,
                        next.weekday,
                        next.days_until,
                        if next.days_until == 1 { "" } else { "s" }
                    );
                }
            }
        }
        println!();

        println!(
            "Workout:  {}",
            if entry.workout_completed {
                "completed"
            } else {
                "pending"
            }
        );
        println!("Streak:   {} day(s)", app.store().streak());
        println!("Water:    {}/{} glasses", entry.water_intake, goals.water);
        println!("Weight:   {} lbs", entry.body_weight);
        println!();

        println!("Nutrition: {}", entry.nutrition_consumed);
        println!("Remaining:");
        print_remaining("Calories", &remaining.calories, "");
        print_remaining("Protein", &remaining.protein, "g");
        print_remaining("Carbs", &remaining.carbs, "g");
        print_remaining("Fat", &remaining.fat, "g");

        Ok(())
    }
}

fn print_remaining(label: &str, remaining: &Remaining, unit: &str) {
    println!(
        "  {:9} {:>6.0}{:1} [{}]",
        label, remaining.amount, unit, remaining.status
    );
}
