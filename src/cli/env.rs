//! `.env` loading

use std::path::{Path, PathBuf};

/// Load `<dir>/.env` into the process environment.
///
/// Variables already set in the environment win. A missing file is fine;
/// the variables may come from the shell.
pub fn load_env_file(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(".env");
    match dotenvy::from_path(&path) {
        Ok(()) => {
            tracing::debug!("Loaded environment from {}", path.display());
            Some(path)
        }
        Err(e) => {
            tracing::debug!("No .env file loaded: {}", e);
            None
        }
    }
}
