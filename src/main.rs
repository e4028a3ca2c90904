use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod context;

use commands::{
    ConfigCommand, FeedbackCommand, MealCommand, MealSubcommand, ProgressCommand,
    RecoveryCommand, SuggestCommand, SyncCommand, TimerCommand, TodayCommand, WaterCommand,
    WeightCommand, WorkoutCommand,
};
use config::Config;
use context::{nutrition_lookup, open_app, try_auto_drain, try_auto_pull};

#[derive(Parser)]
#[command(name = "fit")]
#[command(version)]
#[command(about = "A fitness tracking CLI application", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's workout, nutrition and water
    Today(TodayCommand),

    /// Check off exercises and complete workouts
    Workout(WorkoutCommand),

    /// Log meals and nutrition
    Meal(MealCommand),

    /// Track water intake
    Water(WaterCommand),

    /// Log body weight
    Weight(WeightCommand),

    /// Suggest the next working weight for an exercise
    Suggest(SuggestCommand),

    /// Record how a weight felt
    Feedback(FeedbackCommand),

    /// Streaks, weekly stats and history
    Progress(ProgressCommand),

    /// Rest-day recovery checklist
    Recovery(RecoveryCommand),

    /// Show or set the rest timer
    Timer(TimerCommand),

    /// Sync with the remote backend
    Sync(SyncCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Save config path for config init
    let cli_config_path = cli.config.clone();

    let config = Config::load(cli.config)?;

    let command = match cli.command {
        Some(Commands::Config(cmd)) => return cmd.run(&config, cli_config_path),
        Some(command) => command,
        None => {
            println!("Use --help to see available commands");
            return Ok(());
        }
    };

    let mut app = open_app(&config)?;

    // Auto-sync BEFORE read commands
    if is_read_command(&command) {
        try_auto_pull(&mut app, &config).await;
    }

    let result = execute_command(&command, &mut app, &config).await;

    // Auto-sync AFTER write commands (only if command succeeded)
    if result.is_ok() && is_write_command(&command) {
        try_auto_drain(&mut app, &config).await;
    }

    result
}

async fn execute_command(
    command: &Commands,
    app: &mut fittrack_core::FitnessApp,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Today(cmd) => cmd.run(app),
        Commands::Workout(cmd) => cmd.run(app).await,
        Commands::Meal(cmd) => {
            let lookup = nutrition_lookup(config);
            cmd.run(app, lookup.as_deref()).await
        }
        Commands::Water(cmd) => cmd.run(app).await,
        Commands::Weight(cmd) => cmd.run(app).await,
        Commands::Suggest(cmd) => cmd.run(app),
        Commands::Feedback(cmd) => cmd.run(app),
        Commands::Progress(cmd) => cmd.run(app),
        Commands::Recovery(cmd) => cmd.run(app),
        Commands::Timer(cmd) => cmd.run(app),
        Commands::Sync(cmd) => cmd.run(app, config).await,
        Commands::Config(cmd) => cmd.run(config, None),
    }
}

/// Returns true if the command reads daily logs and should pull first.
fn is_read_command(cmd: &Commands) -> bool {
    matches!(
        cmd,
        Commands::Today(_) | Commands::Suggest(_) | Commands::Progress(_)
    ) || matches!(
        cmd,
        Commands::Meal(m) if matches!(m.command, MealSubcommand::List { .. })
    )
}

/// Returns true if the command writes daily logs and should flush the queue after.
fn is_write_command(cmd: &Commands) -> bool {
    matches!(
        cmd,
        Commands::Workout(_) | Commands::Water(_) | Commands::Weight(_)
    ) || matches!(
        cmd,
        Commands::Meal(m) if !matches!(m.command, MealSubcommand::List { .. })
    )
}
