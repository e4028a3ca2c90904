use clap::Args;
use fittrack_core::{FitnessApp, WeightUnit};

use super::{parse_date, report_sync};

/// Log body weight
#[derive(Args)]
pub struct WeightCommand {
    value: f64,

    /// Unit (lbs or kg)
    #[arg(long, short, default_value = "lbs")]
    unit: WeightUnit,

    /// Date (YYYY-MM-DD), defaults to today
    #[arg(long, short)]
    date: Option<String>,
}

impl WeightCommand {
    pub async fn run(&self, app: &mut FitnessApp) -> Result<(), Box<dyn std::error::Error>> {
        let date = parse_date(&self.date)?;
        let sync = app.log_body_weight(date, self.value, self.unit).await?;

        let logged = app.entry(date).body_weight;
        match self.unit {
            WeightUnit::Lbs => println!("Logged {:.1} lbs for {}", logged, date),
            WeightUnit::Kg => println!(
                "Logged {:.1} lbs ({} kg) for {}",
                logged, self.value, date
            ),
        }
        report_sync(sync);
        Ok(())
    }
}
