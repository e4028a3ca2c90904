use clap::{Args, Subcommand};
use fittrack_core::{FitnessApp, WaterUpdate};

use super::{parse_date, report_sync};

#[derive(Args)]
pub struct WaterCommand {
    #[command(subcommand)]
    pub command: WaterSubcommand,

    /// Date (YYYY-MM-DD), defaults to today
    #[arg(long, short, global = true)]
    date: Option<String>,
}

#[derive(Subcommand)]
pub enum WaterSubcommand {
    /// Add a glass of water
    Add,

    /// Remove a glass of water
    Remove,
}

impl WaterCommand {
    pub async fn run(&self, app: &mut FitnessApp) -> Result<(), Box<dyn std::error::Error>> {
        let date = parse_date(&self.date)?;
        let update = match self.command {
            WaterSubcommand::Add => app.increment_water(date).await?,
            WaterSubcommand::Remove => app.decrement_water(date).await?,
        };
        print_update(update);
        Ok(())
    }
}

fn print_update(update: WaterUpdate) {
    println!("Water: {}/{} glasses", update.glasses, update.goal);
    if update.goal_reached {
        println!("Hydration goal reached!");
    }
    report_sync(update.sync);
}
