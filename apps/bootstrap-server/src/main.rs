mod config;
mod registered_modules;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use modkit::runtime::{RunOptions, ShutdownOptions, run};

use crate::config::AppConfig;

/// Bootstrap Server - brings storage scopes and the security model into a usable state
#[derive(Parser)]
#[command(name = "bootstrap-server")]
#[command(about = "Bootstrap Server - storage scopes and first administrator bootstrap")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Initialize all modules and wait for a shutdown signal
    Run,
    /// Initialize all modules and exit
    Init,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config
        && !path.is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    // 1) defaults -> 2) YAML (if provided) -> 3) env (APP__*)
    let config = AppConfig::load(cli.config.as_deref())?;

    if cli.print_config {
        println!("{}", config.to_pretty()?);
        return Ok(());
    }

    modkit::init_logging(&config.logging, cli.verbose)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Bootstrap Server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_modules(config, ShutdownOptions::Signals).await,
        Commands::Init => run_modules(config, ShutdownOptions::AfterInit).await,
        Commands::Check => check_config(&config),
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    config.validate_modules()?;
    println!("Configuration is valid");
    println!("{}", config.to_pretty()?);
    Ok(())
}

async fn run_modules(config: AppConfig, shutdown: ShutdownOptions) -> Result<()> {
    tracing::info!("Initializing modules...");
    run(RunOptions {
        modules_cfg: Arc::new(config),
        modules: registered_modules::all(),
        shutdown,
    })
    .await?;
    tracing::info!("Bootstrap Server stopped");
    Ok(())
}
