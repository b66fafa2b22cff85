//! # storycast CLI
//!
//! Crossposts newly published stories from a content feed to a chat.
//!
//! Usage:
//!   storycast init                     # Write a starter config
//!   storycast check                    # Verify credentials and fetch once
//!   storycast run                      # Poll and crosspost until Ctrl-C
//!   storycast config show              # Show configuration (secrets masked)

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use storycast_core::StorycastConfig;
use storycast_core::traits::{Sink, Source};
use storycast_orchestrator::{Orchestrator, Tracker};
use storycast_scheduler::{CancellationToken, Scheduler};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "storycast",
    version,
    about = "Crosspost new stories from a feed to a chat, once per story"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the source and deliver new stories until interrupted
    Run,

    /// Connect to the source and sink, fetch once, deliver nothing
    Check,

    /// Write a starter configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Print the config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "storycast=debug,storycast_core=debug,storycast_orchestrator=debug,storycast_scheduler=debug,storycast_sources=debug,storycast_channels=debug"
    } else {
        "storycast=info,storycast_orchestrator=info,storycast_scheduler=info,storycast_sources=info,storycast_channels=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let config_path = config_path(cli.config.as_deref());

    match cli.command {
        Commands::Run => run(&config_path).await,
        Commands::Check => check(&config_path).await,
        Commands::Init { force } => init(&config_path, force),
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let config = StorycastConfig::load_from(&config_path)?;
                println!("# {}", config_path.display());
                print!("{}", config.masked().to_toml_string()?);
                Ok(())
            }
            ConfigAction::Path => {
                println!("{}", config_path.display());
                Ok(())
            }
        },
    }
}

fn config_path(arg: Option<&str>) -> PathBuf {
    match arg {
        Some(p) => PathBuf::from(shellexpand::tilde(p).to_string()),
        None => StorycastConfig::default_path(),
    }
}

/// Build both collaborators and authenticate them. Either failing is fatal.
async fn connect(config: &StorycastConfig) -> Result<(Box<dyn Source>, Box<dyn Sink>)> {
    let mut source = storycast_sources::create_source(&config.source)?;
    let name = source.name().to_string();
    source
        .connect()
        .await
        .with_context(|| format!("Cannot connect to {name} source"))?;

    let mut sink = storycast_channels::create_sink(&config.sink)?;
    let name = sink.name().to_string();
    sink
        .connect()
        .await
        .with_context(|| format!("Cannot connect to {name} sink"))?;

    Ok((source, sink))
}

async fn run(config_path: &std::path::Path) -> Result<()> {
    let config = StorycastConfig::load_from(config_path)?;
    let (source, sink) = connect(&config).await?;

    let mut orchestrator = Orchestrator::new(source, sink, Tracker::new())
        .with_backlog_suppression(config.skip_backlog);
    let scheduler = Scheduler::new(config.poll_interval())?;

    let shutdown = CancellationToken::new();
    let token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl-C received; stopping after the current cycle");
            token.cancel();
        }
    });

    scheduler.run(&mut orchestrator, shutdown).await;

    let stats = orchestrator.stats();
    tracing::info!(
        "Done: {} cycles, {} delivered, {} failed, {} skipped as backlog",
        stats.cycles,
        stats.delivered,
        stats.failed,
        stats.suppressed
    );
    Ok(())
}

async fn check(config_path: &std::path::Path) -> Result<()> {
    let config = StorycastConfig::load_from(config_path)?;
    let (source, sink) = connect(&config).await?;

    let items = source.fetch_candidates().await?;
    println!("✅ {} source and {} sink connected", source.name(), sink.name());
    println!("   {} stories currently visible", items.len());
    for item in &items {
        println!("   - {} ({})", item.id, item.payload.kind);
    }
    Ok(())
}

fn init(config_path: &std::path::Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(config_path, StorycastConfig::template())?;
    println!("Wrote {}", config_path.display());
    println!("Edit the [source] and [sink] sections, then run `storycast check`.");
    Ok(())
}
