use clap::{Args, Subcommand};
use fittrack_core::lookup::NutritionLookup;
use fittrack_core::suggest::macro_percentages;
use fittrack_core::FitnessApp;

use super::{parse_date, report_sync, MacroArgs, OutputFormat};

#[derive(Args)]
pub struct MealCommand {
    #[command(subcommand)]
    pub command: MealSubcommand,
}

#[derive(Subcommand)]
pub enum MealSubcommand {
    /// Log a meal with known macros
    Add {
        description: String,

        #[command(flatten)]
        macros: MacroArgs,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Estimate a meal's macros from its description and log it
    Lookup {
        description: String,

        /// Only show the estimate, don't log it
        #[arg(long)]
        dry_run: bool,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Remove all meals for a day
    Clear {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// List a day's meals
    List {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl MealCommand {
    pub async fn run(
        &self,
        app: &mut FitnessApp,
        lookup: Option<&dyn NutritionLookup>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            MealSubcommand::Add {
                description,
                macros,
                date,
            } => {
                let date = parse_date(date)?;
                let macros = macros.to_macros().unwrap_or_default();
                let sync = app.add_meal(date, description, macros).await?;
                println!("Logged {}: {}", description, macros.clamped());
                print_day_total(app, date);
                report_sync(sync);
            }
            MealSubcommand::Lookup {
                description,
                dry_run,
                date,
            } => {
                let date = parse_date(date)?;
                let lookup = lookup.ok_or(
                    "Nutrition lookup is not configured. Set nutrition_api.api_key or nutrition_api.use_mock.",
                )?;
                let macros = lookup.lookup(description).await?;
                println!("Estimate for '{}': {}", description, macros);

                if !dry_run {
                    let sync = app.add_meal(date, description, macros).await?;
                    print_day_total(app, date);
                    report_sync(sync);
                }
            }
            MealSubcommand::Clear { date } => {
                let date = parse_date(date)?;
                let sync = app.clear_meals(date).await?;
                println!("Cleared meals for {}.", date);
                report_sync(sync);
            }
            MealSubcommand::List { date, format } => {
                let date = parse_date(date)?;
                let entry = app.entry(date);

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&entry.meals)?);
                    }
                    OutputFormat::Text => {
                        if entry.meals.is_empty() {
                            println!("No meals logged for {}", date);
                            return Ok(());
                        }
                        println!("{}", date);
                        println!("{}", "-".repeat(60));
                        for meal in &entry.meals {
                            let time = meal
                                .timestamp
                                .map(|t| t.with_timezone(&chrono::Local).format("%H:%M").to_string())
                                .unwrap_or_else(|| "--:--".to_string());
                            println!("  {}  {}", time, meal.description);
                            println!("         {}", meal.macros);
                        }
                        println!("  {}", "-".repeat(56));
                        println!("  Daily Total: {}", entry.nutrition_consumed);

                        let pct = macro_percentages(&entry.nutrition_consumed);
                        println!(
                            "  Split: {}% protein | {}% carbs | {}% fat",
                            pct.protein, pct.carbs, pct.fat
                        );
                        println!("\nTotal: {} meal(s)", entry.meals.len());
                    }
                }
            }
        }
        Ok(())
    }
}

fn print_day_total(app: &FitnessApp, date: chrono::NaiveDate) {
    let entry = app.entry(date);
    let goals = &app.profile().goals;
    println!(
        "Day total: {:.0}/{:.0} cal | {:.0}/{:.0}g protein",
        entry.nutrition_consumed.calories,
        goals.calories,
        entry.nutrition_consumed.protein,
        goals.protein
    );
}
