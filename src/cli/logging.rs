//! Logging initialization

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging based on debug flag
///
/// Progress goes to stderr. With `debug`, everything at debug level is also
/// written to a temp log file whose path is returned.
pub fn init_logging(debug: bool) -> Result<Option<PathBuf>> {
    let default_level = if debug { "stackstrap=debug" } else { "stackstrap=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .without_time();

    let (file_layer, log_path) = if debug {
        // Named temp file that outlives this process
        let (file, path) = tempfile::Builder::new()
            .prefix("stackstrap-")
            .suffix(".log")
            .tempfile()
            .context("Failed to create debug log file")?
            .keep()
            .context("Failed to persist debug log file")?;

        let layer = fmt::layer()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false) // No ANSI codes in log file
            .with_target(true)
            .with_file(true)
            .with_line_number(true);
        (Some(layer), Some(path))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .init();

    Ok(log_path)
}
