//! Configuration loading and validation
//!
//! Handles loading settings from the layered sources and checking them
//! before any external call is made.

use super::{ConfigError, defaults, paths, schema::Config};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers applied
    ///
    /// Precedence order (highest to lowest):
    /// 1. Environment variable overrides
    /// 2. Settings file (`--config`, `STACKSTRAP_CONFIG`, or the root config path)
    /// 3. Built-in defaults
    ///
    /// An explicitly named file must exist; the root config path is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        let path = paths::resolve_config_path(explicit);
        let required = explicit.is_some()
            || std::env::var_os(paths::CONFIG_FILE_ENV).is_some_and(|v| !v.is_empty());

        let config = if path.exists() || required {
            tracing::debug!("Loading settings from {}", path.display());
            Self::load_file(&path)?
        } else {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            Self::load_defaults()
        };

        let config = Self::apply_env_overrides(config);
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<Config, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load default configuration
    pub fn load_defaults() -> Config {
        defaults::default_config()
    }

    /// Check a loaded configuration
    ///
    /// Service names become directory names and image names, so they must be
    /// unique, non-empty, and free of path separators.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.services.is_empty() {
            return Err(ConfigError::Invalid("no services configured".to_string()));
        }

        let mut seen = HashSet::new();
        for service in &config.services {
            let name = service.name.as_str();
            if name.is_empty() {
                return Err(ConfigError::Invalid(
                    "service name must not be empty".to_string(),
                ));
            }
            if name.contains(['/', '\\']) || name == "." || name == ".." {
                return Err(ConfigError::Invalid(format!(
                    "service name '{}' must be a single path component",
                    name
                )));
            }
            if !seen.insert(name) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate service name '{}'",
                    name
                )));
            }
            if service.repository_url.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "service '{}' has no repository URL",
                    name
                )));
            }
        }

        url::Url::parse(&config.api_base_url).map_err(|e| {
            ConfigError::Invalid(format!(
                "apiBaseUrl '{}' is not a valid URL: {}",
                config.api_base_url, e
            ))
        })?;

        if config.image_tag.is_empty() {
            return Err(ConfigError::Invalid("imageTag must not be empty".to_string()));
        }

        Ok(())
    }

    /// Apply environment variable overrides, then point the built-in
    /// service list at the effective owner
    fn apply_env_overrides(config: Config) -> Config {
        Self::apply_overrides(config, |key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(mut config: Config, lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        // STACKSTRAP_UPSTREAM_OWNER override
        if let Some(owner) = lookup("STACKSTRAP_UPSTREAM_OWNER").filter(|v| !v.is_empty()) {
            config.upstream_owner = owner;
        }

        // STACKSTRAP_WORKSPACE_ROOT override
        if let Some(root) = lookup("STACKSTRAP_WORKSPACE_ROOT").filter(|v| !v.is_empty()) {
            config.workspace_root = root.into();
        }

        // STACKSTRAP_MAX_PARALLEL override
        if let Some(max) = lookup("STACKSTRAP_MAX_PARALLEL") {
            match max.parse::<usize>() {
                Ok(val) => config.max_parallel = val,
                Err(_) => tracing::warn!("Ignoring invalid STACKSTRAP_MAX_PARALLEL={}", max),
            }
        }

        // Built-in services follow the effective host and owner
        defaults::rebase_default_services(&mut config);
        config
    }

    /// Save configuration to a file
    pub fn save(config: &Config, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            paths::ensure_dir(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let yaml =
            serde_yaml::to_string(config).context("Failed to serialize configuration to YAML")?;

        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}
