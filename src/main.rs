use anyhow::{bail, Result};
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use buddy_cli::{analyze_once, display_banner, BuddyApp, BuddyConfig};

#[derive(Parser, Debug)]
#[command(name = "buddybot")]
#[command(about = "A coding buddy that watches your Python files and reacts to them", long_about = None)]
struct Cli {
    /// File to watch; the first one becomes the active document
    #[arg(short, long = "file", value_name = "PATH")]
    files: Vec<PathBuf>,

    /// Analyze the files once and exit
    #[arg(long)]
    once: bool,

    /// Print results as JSON (with --once)
    #[arg(long, requires = "once")]
    json: bool,

    /// Minutes between hydration reminders, 0 disables them
    #[arg(long, value_name = "MINUTES")]
    reminder_minutes: Option<u64>,

    /// File polling interval in milliseconds
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    poll_ms: Option<u64>,

    /// Show the panel whenever the emotion changes, even if hidden
    #[arg(long)]
    reveal_on_update: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_config(cli: &Cli) -> Result<BuddyConfig> {
    let mut config = BuddyConfig::from_env()?;

    if let Some(minutes) = cli.reminder_minutes {
        config = config.with_reminder_minutes(minutes)?;
    }
    if let Some(ms) = cli.poll_ms {
        config = config.with_poll_interval(Duration::from_millis(ms));
    }
    if cli.reveal_on_update {
        config = config.with_reveal_on_update(true);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.files.is_empty() {
        bail!("no files to watch; pass one or more with --file");
    }

    if cli.once {
        analyze_once(&cli.files, cli.json).await?;
        return Ok(());
    }

    let config = build_config(&cli)?;
    tracing::debug!(?config, "starting buddybot");

    display_banner();
    println!(
        "{} Watching {} file(s). Type 'help' for commands.\n",
        "👀".cyan(),
        cli.files.len()
    );

    BuddyApp::new(config, cli.files).run().await?;
    Ok(())
}
