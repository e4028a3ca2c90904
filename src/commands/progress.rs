use clap::{Args, Subcommand};
use fittrack_core::progress::{
    progress_grid, recent_history, weight_series, workouts_this_week, DayStatus,
};
use fittrack_core::suggest::weekly_nutrition_averages;
use fittrack_core::FitnessApp;

use super::{today, OutputFormat};

#[derive(Args)]
pub struct ProgressCommand {
    #[command(subcommand)]
    pub command: ProgressSubcommand,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text", global = true)]
    format: OutputFormat,
}

#[derive(Subcommand)]
pub enum ProgressSubcommand {
    /// Show the current streak
    Streak,

    /// Workouts completed this week
    Week,

    /// Day-by-day status for the last N days
    Grid {
        #[arg(long, default_value = "28")]
        days: u32,
    },

    /// Most recent daily logs
    History {
        #[arg(long, short = 'n', default_value = "7")]
        limit: usize,
    },

    /// This week's nutrition averages and adherence
    Nutrition,

    /// Body weight over time
    Weight,
}

impl ProgressCommand {
    pub fn run(&self, app: &FitnessApp) -> Result<(), Box<dyn std::error::Error>> {
        let today = today();
        let store = app.store();
        let json = matches!(self.format, OutputFormat::Json);

        match &self.command {
            ProgressSubcommand::Streak => {
                let streak = store.streak();
                if json {
                    println!("{}", serde_json::json!({ "streak": streak }));
                } else {
                    println!("Current streak: {} day{}", streak, plural(streak as usize));
                }
            }
            ProgressSubcommand::Week => {
                let count = workouts_this_week(store.logs(), today);
                if json {
                    println!("{}", serde_json::json!({ "workoutsThisWeek": count }));
                } else {
                    println!("Workouts this week: {}", count);
                }
            }
            ProgressSubcommand::Grid { days } => {
                let grid = progress_grid(store, app.schedule(), today, *days);
                if json {
                    println!("{}", serde_json::to_string_pretty(&grid)?);
                    return Ok(());
                }
                for day in &grid {
                    let symbol = match day.status {
                        DayStatus::Completed => "#",
                        DayStatus::Rest => "-",
                        DayStatus::Missed => ".",
                        DayStatus::Future => " ",
                    };
                    println!("  {} {}  {}", day.date, day.date.format("%a"), symbol);
                }
                println!("\n  # completed  - rest  . missed");
            }
            ProgressSubcommand::History { limit } => {
                let entries = recent_history(store, *limit);
                if json {
                    println!("{}", serde_json::to_string_pretty(&entries)?);
                    return Ok(());
                }
                if entries.is_empty() {
                    println!("No history yet.");
                    return Ok(());
                }
                for entry in entries {
                    println!("{}", entry);
                }
            }
            ProgressSubcommand::Nutrition => {
                let week = weekly_nutrition_averages(store.logs(), &app.profile().goals, today);
                if json {
                    println!("{}", serde_json::to_string_pretty(&week)?);
                    return Ok(());
                }
                if week.days_logged == 0 {
                    println!("No nutrition logged this week.");
                    return Ok(());
                }
                let avg = &week.averages;
                let trends = &week.trends;
                println!(
                    "Weekly averages ({} day{} logged)",
                    week.days_logged,
                    plural(week.days_logged)
                );
                println!("  Calories: {} {}", avg.calories, trends.calories.arrow());
                println!("  Protein:  {}g {}", avg.protein, trends.protein.arrow());
                println!("  Carbs:    {}g {}", avg.carbs, trends.carbs.arrow());
                println!("  Fat:      {}g {}", avg.fat, trends.fat.arrow());
                println!("  Adherence: {:.0}%", week.adherence * 100.0);
            }
            ProgressSubcommand::Weight => {
                let series = weight_series(store);
                if json {
                    println!("{}", serde_json::to_string_pretty(&series)?);
                    return Ok(());
                }
                if series.is_empty() {
                    println!("No body weight logged yet.");
                    return Ok(());
                }
                for (date, weight) in &series {
                    println!("  {}  {:.1} lbs", date, weight);
                }
                if let (Some(first), Some(last)) = (series.first(), series.last()) {
                    println!("\n  Change: {:+.1} lbs", last.1 - first.1);
                }
            }
        }
        Ok(())
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
