//! CLI command handlers

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::Path;

use stackstrap::config::{ConfigLoader, paths};

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Print the effective configuration as YAML
    Show,
    /// Show configuration file path
    Path,
    /// Validate configuration
    Validate,
    /// Write the default configuration to the configuration file path
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Handle configuration subcommands
pub fn handle_config_command(cmd: ConfigSubcommand, explicit: Option<&Path>) -> Result<()> {
    match cmd {
        ConfigSubcommand::Show => {
            let config = ConfigLoader::load(explicit).context("Failed to load configuration")?;
            let yaml =
                serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
            print!("{}", yaml);
        }
        ConfigSubcommand::Path => {
            let config_path = paths::resolve_config_path(explicit);
            println!("{}", config_path.display());
        }
        ConfigSubcommand::Validate => match ConfigLoader::load(explicit) {
            Ok(config) => {
                println!(
                    "✓ Configuration is valid ({} services)",
                    config.services.len()
                );
            }
            Err(e) => {
                eprintln!("✗ Configuration validation failed: {}", e);
                std::process::exit(1);
            }
        },
        ConfigSubcommand::Init { force } => {
            let path = paths::resolve_config_path(explicit);
            if path.exists() && !force {
                anyhow::bail!(
                    "Configuration file already exists: {} (use --force to overwrite)",
                    path.display()
                );
            }
            ConfigLoader::save(&ConfigLoader::load_defaults(), &path)
                .context("Failed to save configuration")?;
            println!("Configuration written to {}", path.display());
        }
    }

    Ok(())
}
