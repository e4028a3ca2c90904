use clap::{Args, Subcommand};
use fittrack_core::models::RecoveryChecklist;
use fittrack_core::FitnessApp;

use super::{today, OutputFormat};

const ITEM_LABELS: [&str; 6] = [
    "Drink 8+ glasses of water",
    "Stretch or foam roll for 10 minutes",
    "Walk 20-30 minutes",
    "Eat protein at every meal",
    "Sleep 7-9 hours",
    "Take a few minutes to relax",
];

#[derive(Args)]
pub struct RecoveryCommand {
    #[command(subcommand)]
    pub command: RecoverySubcommand,
}

#[derive(Subcommand)]
pub enum RecoverySubcommand {
    /// Show today's recovery checklist
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Check an item (1-6)
    Check {
        item: usize,

        /// Uncheck instead
        #[arg(long)]
        undo: bool,
    },
}

impl RecoveryCommand {
    pub fn run(&self, app: &FitnessApp) -> Result<(), Box<dyn std::error::Error>> {
        let today = today();
        match &self.command {
            RecoverySubcommand::Show { format } => {
                let checklist = app.recovery_checklist(today)?;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&checklist)?);
                    }
                    OutputFormat::Text => print_checklist(&checklist),
                }
            }
            RecoverySubcommand::Check { item, undo } => {
                if *item == 0 {
                    return Err("Checklist items start at 1".into());
                }
                let checklist = app.set_recovery_item(today, item - 1, !undo)?;
                print_checklist(&checklist);
                if checklist.is_perfect() {
                    let count = app.perfect_recovery_count(today)?;
                    println!("\nPerfect recovery day! {} this month.", count);
                }
            }
        }
        Ok(())
    }
}

fn print_checklist(checklist: &RecoveryChecklist) {
    println!(
        "Recovery checklist for {} ({}/{})",
        checklist.date,
        checklist.completed(),
        ITEM_LABELS.len()
    );
    for (i, (label, done)) in ITEM_LABELS.iter().zip(checklist.checklist).enumerate() {
        println!("  [{}] {}. {}", if done { "x" } else { " " }, i + 1, label);
    }
}
