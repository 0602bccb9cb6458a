//! CLI command handling module
//!
//! Handles the non-pipeline subcommands, `.env` loading and logging setup.

mod commands;
mod env;
mod logging;
mod version;

pub use commands::{ConfigSubcommand, handle_config_command};
pub use env::load_env_file;
pub use logging::*;
pub use version::display_version;
