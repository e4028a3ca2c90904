use clap::Args;
use fittrack_core::models::RestTimer;
use fittrack_core::FitnessApp;

/// Show or set the rest timer between sets
#[derive(Args)]
pub struct TimerCommand {
    /// Rest duration in seconds (60, 75 or 120)
    seconds: Option<u32>,
}

impl TimerCommand {
    pub fn run(&self, app: &FitnessApp) -> Result<(), Box<dyn std::error::Error>> {
        match self.seconds {
            Some(secs) => {
                let timer = RestTimer::try_from(secs)?;
                app.set_timer_duration(timer)?;
                println!("Rest timer set to {}", timer);
            }
            None => {
                let timer = app.timer_duration()?;
                println!("Rest timer: {} ({}s)", timer, timer.seconds());
            }
        }
        Ok(())
    }
}
