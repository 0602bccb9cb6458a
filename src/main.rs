//! stackstrap - bootstrap a local microservices development stack
//!
//! Forks the service repositories into your account, clones or updates them
//! under `services/`, builds a development image per service and starts the
//! Docker Compose stack.

mod cli;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use stackstrap::{AppConfig, Bootstrapper, ConfigLoader, Credentials, RunReport};

/// stackstrap - bootstrap a local microservices development stack
#[derive(Parser, Debug)]
#[command(name = "stackstrap")]
#[command(about = "Fork, clone, build and launch a local microservices development stack", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    /// Settings file (defaults to $STACKSTRAP_CONFIG or the user config directory)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Fork, clone or pull, and build every service, then start the stack (default)
    Up,
    /// Merge upstream changes into every fork and push them
    Sync,
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: cli::ConfigSubcommand,
    },
    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let command = args.command.unwrap_or(Command::Up);
    if matches!(command, Command::Version) {
        cli::display_version();
        return Ok(());
    }

    let log_file = cli::init_logging(args.debug)?;
    if let Some(ref log_path) = log_file {
        eprintln!(
            "Debug logging enabled. Logs written to: {}",
            log_path.display()
        );
    }

    // Settings overrides and credentials may come from ./.env
    cli::load_env_file(Path::new("."));

    let command = match command {
        Command::Config { subcommand } => {
            return cli::handle_config_command(subcommand, args.config.as_deref());
        }
        command => command,
    };

    let settings =
        ConfigLoader::load(args.config.as_deref()).context("Failed to load configuration")?;
    let credentials = Credentials::from_env().context("Failed to load credentials")?;
    let app = AppConfig::new(settings, credentials);

    tracing::debug!(
        account = %app.credentials.account_name,
        upstream_owner = %app.settings.upstream_owner,
        services = app.settings.services.len(),
        "Configuration loaded"
    );

    let bootstrapper =
        Bootstrapper::from_config(&app).context("Failed to create hosting API client")?;

    let report = if matches!(command, Command::Sync) {
        bootstrapper.sync().await
    } else {
        bootstrapper.up().await?
    };

    finish(report)
}

/// Print the run summary and turn service failures into a non-zero exit
fn finish(report: RunReport) -> Result<()> {
    eprintln!("\n{}", report.render());
    tracing::debug!(
        duration_ms = report.duration().num_milliseconds(),
        "{} finished",
        report.kind.as_str()
    );

    if report.is_success() {
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "{} of {} services failed",
            report.failure_count(),
            report.outcomes.len()
        ))
    }
}
