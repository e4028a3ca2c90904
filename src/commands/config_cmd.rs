use clap::{Args, Subcommand};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use super::OutputFormat;
use crate::config::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

const DEFAULT_CONFIG: &str = r#"# fit configuration

# Directory for local data (default: platform data dir + /fit)
# data_dir: ~/.local/share/fit

# profile:
#   weight: 175
#   rest_days: [0, 4]   # 0 = Sunday
#   goals:
#     calories: 2100
#     protein: 160
#     carbs: 200
#     fat: 70
#     water: 8

# sync:
#   server_url: https://your-project.supabase.co
#   api_key: your-anon-key
#   user_id: your-user-id
#   auto_sync: false

# nutrition_api:
#   api_key: your-calorieninjas-key
#   use_mock: false
"#;

impl ConfigCommand {
    pub fn run(
        &self,
        config: &Config,
        cli_config_path: Option<PathBuf>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => print_config(config),
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = cli_config_path.unwrap_or_else(Config::default_config_path);

                if config_path.exists() {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'fit config show' to view current configuration.");
                    return Ok(());
                }

                if let Some(parent) = config_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                let mut file = fs::File::create(&config_path)?;
                file.write_all(DEFAULT_CONFIG.as_bytes())?;

                println!("Created config file: {}", config_path.display());
                println!("\nEdit this file to customize your settings.");
                Ok(())
            }
        }
    }
}

fn print_config(config: &Config) {
    println!("Configuration");
    println!("=============\n");

    if let Some(path) = &config.config_file {
        println!("Config file: {}", path.display());
    } else {
        println!(
            "Config file: {} (not found)",
            Config::default_config_path().display()
        );
    }
    println!();

    println!("data_dir: {}", config.data_dir.value.display());
    println!("  source: {}", config.data_dir.source);
    println!();

    let profile = &config.profile.value;
    println!("profile:");
    println!("  weight: {} lbs", profile.weight);
    println!(
        "  goals: {} cal | {}g protein | {}g carbs | {}g fat | {} glasses",
        profile.goals.calories,
        profile.goals.protein,
        profile.goals.carbs,
        profile.goals.fat,
        profile.goals.water
    );
    println!("  rest_days: {:?}", profile.rest_days);
    println!("  source: {}", config.profile.source);
    println!();

    println!("sync:");
    match &config.sync.server_url {
        Some(url) => println!("  server_url: {}", url),
        None => println!("  server_url: (not set)"),
    }
    println!(
        "  user_id: {}",
        config.sync.user_id.as_deref().unwrap_or("(not set)")
    );
    println!("  auto_sync: {}", config.sync.auto_sync);
    println!();

    println!("nutrition_api:");
    println!(
        "  api_key: {}",
        if config.nutrition_api.api_key.is_some() {
            "(set)"
        } else {
            "(not set)"
        }
    );
    println!("  use_mock: {}", config.nutrition_api.use_mock);
}
