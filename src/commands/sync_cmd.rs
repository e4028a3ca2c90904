//! Sync CLI commands for moving daily logs to and from the backend.

use clap::{Args, Subcommand};
use fittrack_core::{FitnessApp, SyncResult};

use super::{today, OutputFormat};
use crate::config::Config;

/// Sync with the remote backend
#[derive(Args)]
pub struct SyncCommand {
    #[command(subcommand)]
    command: Option<SyncSubcommand>,
}

#[derive(Subcommand)]
enum SyncSubcommand {
    /// Fetch the last 90 days from the backend and merge them locally
    Pull,

    /// Upload every local entry
    Push,

    /// Replay changes queued while offline
    Drain,

    /// Show sync configuration and queue status
    Status {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl SyncCommand {
    pub async fn run(
        &self,
        app: &mut FitnessApp,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            Some(SyncSubcommand::Status { format }) => return status(app, config, *format),
            _ if app.sync().is_none() => return Err(not_configured().into()),
            None => {
                println!("Syncing with server...");
                println!();
                report("drain", app.drain_queue().await);
                report("pull", app.pull(today()).await);
            }
            Some(SyncSubcommand::Pull) => report("pull", app.pull(today()).await),
            Some(SyncSubcommand::Push) => report("push", app.push_all().await),
            Some(SyncSubcommand::Drain) => report("drain", app.drain_queue().await),
        }
        Ok(())
    }
}

fn report(step: &str, result: Option<SyncResult>) {
    match result {
        Some(r) if r.success => println!("  ✓ {} ({} updated)", step, r.updated),
        Some(r) => println!(
            "  ✗ {} - {}",
            step,
            r.error.as_deref().unwrap_or("unknown error")
        ),
        None => println!("  - {} skipped", step),
    }
}

fn not_configured() -> &'static str {
    "Sync is not configured. Set sync.server_url, sync.api_key and sync.user_id \
     (or FIT_SYNC_URL, FIT_SYNC_API_KEY and FIT_USER_ID)."
}

fn status(
    app: &FitnessApp,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = app.sync();

    if let OutputFormat::Json = format {
        let value = serde_json::json!({
            "configured": config.sync.is_configured(),
            "serverUrl": config.sync.server_url,
            "autoSync": config.sync.auto_sync,
            "authenticated": engine.is_some_and(|e| e.is_authenticated()),
            "status": engine.map(|e| e.status()),
            "queued": engine.map_or(0, |e| e.queue().len()),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Sync Configuration");
    println!("==================");
    println!();

    let Some(engine) = engine else {
        println!("Status: Not configured");
        println!();
        println!("{}", not_configured());
        return Ok(());
    };

    if let Some(url) = &config.sync.server_url {
        println!("Server:    {}", url);
    }
    println!(
        "Auto-sync: {}",
        if config.sync.auto_sync {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!(
        "Signed in: {}",
        if engine.is_authenticated() { "yes" } else { "no" }
    );
    println!("Status:    {}", engine.status());
    println!("Queued:    {} change(s)", engine.queue().len());
    Ok(())
}
