//! Configuration system for stackstrap
//!
//! Settings come from built-in defaults, an optional YAML file and a few
//! environment overrides. Credentials always come from the environment.
//! Both are combined into an [`AppConfig`] once, at process entry, and passed
//! by reference into every component.

mod defaults;
pub mod credentials;
pub mod loader;
pub mod paths;
pub mod schema;

pub use credentials::Credentials;
pub use loader::ConfigLoader;
pub use schema::{Config, ForkPollConfig};

use std::path::PathBuf;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Required environment variable {0} is missing or empty")]
    MissingEnv(&'static str),

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Settings and credentials for one run
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub settings: Config,
    pub credentials: Credentials,
}

impl AppConfig {
    pub fn new(settings: Config, credentials: Credentials) -> Self {
        Self {
            settings,
            credentials,
        }
    }

    /// True when the developer account owns the canonical repositories,
    /// in which case nothing is forked or synced.
    pub fn is_upstream_owner(&self) -> bool {
        self.credentials
            .account_name
            .eq_ignore_ascii_case(&self.settings.upstream_owner)
    }

    /// Clone URL of the developer's fork of `service`
    pub fn fork_url(&self, service: &str) -> String {
        self.settings
            .repository_url(&self.credentials.account_name, service)
    }
}
