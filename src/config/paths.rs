//! Cross-platform directory path resolution
//!
//! Resolves where the settings file lives.

use std::path::{Path, PathBuf};

/// Environment variable naming an explicit settings file
pub const CONFIG_FILE_ENV: &str = "STACKSTRAP_CONFIG";

/// Directory holding `config.yaml`: `$STACKSTRAP_CONFIG_DIR`, else the
/// platform config directory (`~/.config/stackstrap` on Linux)
pub fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("STACKSTRAP_CONFIG_DIR").filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    directories::ProjectDirs::from("", "", "stackstrap")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".stackstrap"))
}

/// Get the root configuration file path
pub fn root_config_path() -> PathBuf {
    config_dir().join("config.yaml")
}

/// Resolve the settings file to read
///
/// Precedence: explicit path (CLI flag), then `STACKSTRAP_CONFIG`, then the
/// root config path.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    std::env::var(CONFIG_FILE_ENV)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(root_config_path)
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
