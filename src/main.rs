use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use herald::config::Config;
use herald::monitor::{GameMonitor, StatusMonitor};

#[derive(Parser)]
#[command(
    name = "herald",
    version,
    about = "Release-feed and status-page notification bot for chat channels",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML config file (environment variables used otherwise)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run both monitors until interrupted
    Run,

    /// Run a single game-feed cycle and exit
    CheckGames,

    /// Run a single status-page cycle and exit
    CheckStatus,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(&cli.log_format, cli.verbose)?;

    let config = match &cli.config {
        Some(path) => Config::from_file(std::path::Path::new(path))?,
        None => Config::from_env()?,
    };
    config.validate()?;

    tracing::info!("herald starting");

    match cli.command {
        Commands::Run => run(config).await?,
        Commands::CheckGames => {
            let monitor = GameMonitor::from_config(&config)?;
            monitor.run_cycle().await?;
            tracing::info!("game-feed cycle complete");
        }
        Commands::CheckStatus => {
            let monitor = StatusMonitor::from_config(&config)?;
            monitor.run_cycle().await;
            tracing::info!("status cycle complete");
        }
    }

    Ok(())
}

/// Run both domain monitors as independent tasks until ctrl-c
async fn run(config: Config) -> Result<()> {
    let games = GameMonitor::from_config(&config)?;
    let status = StatusMonitor::from_config(&config)?;

    let games_task = tokio::spawn(async move { games.run().await });
    let status_task = tokio::spawn(async move { status.run().await });

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown requested");

    // In-flight cycles and countdowns are abandoned, not drained; the next
    // start re-reads durable state.
    games_task.abort();
    status_task.abort();

    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("herald=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("herald=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
