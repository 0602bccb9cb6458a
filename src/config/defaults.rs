//! Default configuration values
//!
//! Provides the default configuration and the built-in service list.

use super::schema::{Config, default_git_host, default_upstream_owner, repository_url};
use crate::models::ServiceDescriptor;

/// Services of the stack when the settings file does not list any
const DEFAULT_SERVICE_NAMES: &[&str] = &[
    "api-gateway",
    "email-service",
    "auth-service",
    "user-service",
];

/// Get the default configuration
pub fn default_config() -> Config {
    Config::default()
}

/// Built-in service list, hosted under the default upstream owner
pub fn default_services() -> Vec<ServiceDescriptor> {
    builtin_services(&default_git_host(), &default_upstream_owner())
}

fn builtin_services(git_host: &str, owner: &str) -> Vec<ServiceDescriptor> {
    DEFAULT_SERVICE_NAMES
        .iter()
        .map(|name| ServiceDescriptor::new(*name, repository_url(git_host, owner, name)))
        .collect()
}

/// Point the built-in service list at the configured host and owner.
///
/// A list that differs from the built-in one was configured explicitly and
/// is left alone.
pub fn rebase_default_services(config: &mut Config) {
    if config.services == default_services() {
        config.services = builtin_services(&config.git_host, &config.upstream_owner);
    }
}
