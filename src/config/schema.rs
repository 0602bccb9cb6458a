//! Configuration schema definitions
//!
//! Defines the structure of the settings file using serde for serialization.

use crate::models::ServiceDescriptor;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Account that owns the canonical service repositories
    #[serde(default = "default_upstream_owner")]
    pub upstream_owner: String,

    /// Base URL used to build clone URLs (no trailing slash)
    #[serde(default = "default_git_host")]
    pub git_host: String,

    /// Hosting REST API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Directory holding one working copy per service
    #[serde(default = "default_workspace_root")]
    pub workspace_root: PathBuf,

    /// Compose file passed to `docker compose -f`
    #[serde(default = "default_compose_file")]
    pub compose_file: PathBuf,

    /// Dockerfile used for development images, relative to each working copy
    #[serde(default = "default_dockerfile")]
    pub dockerfile: String,

    /// Tag given to every development image
    #[serde(default = "default_image_tag")]
    pub image_tag: String,

    /// Dependency install command run in each working copy before the build.
    /// Empty disables the step.
    #[serde(default = "default_install_command")]
    pub install_command: Vec<String>,

    /// Maximum number of service pipelines in flight (0 = no limit)
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,

    /// Readiness polling after a fork is requested
    #[serde(default)]
    pub fork_poll: ForkPollConfig,

    /// Services making up the stack, processed and reported in this order
    #[serde(default = "super::defaults::default_services")]
    pub services: Vec<ServiceDescriptor>,
}

/// Fork readiness polling configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForkPollConfig {
    /// Existence checks made after requesting a fork
    #[serde(default = "default_poll_attempts")]
    pub attempts: u32,

    /// Delay before the first check, doubled after each miss
    #[serde(default = "default_poll_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Upper bound for the delay between checks
    #[serde(default = "default_poll_max_delay_ms")]
    pub max_delay_ms: u64,
}

// Default value functions
pub(super) fn default_upstream_owner() -> String {
    "LakshayManglani".to_string()
}

pub(super) fn default_git_host() -> String {
    "https://github.com".to_string()
}

fn default_api_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_workspace_root() -> PathBuf {
    PathBuf::from("services")
}

fn default_compose_file() -> PathBuf {
    PathBuf::from("docker-compose.dev.yml")
}

fn default_dockerfile() -> String {
    "Dockerfile.dev".to_string()
}

fn default_image_tag() -> String {
    "development".to_string()
}

fn default_install_command() -> Vec<String> {
    vec!["npm".to_string(), "install".to_string()]
}

fn default_max_parallel() -> usize {
    4
}

fn default_poll_attempts() -> u32 {
    10
}

fn default_poll_initial_delay_ms() -> u64 {
    1000
}

fn default_poll_max_delay_ms() -> u64 {
    8000
}

/// Clone URL of `repo` under `account` on `git_host`
pub(super) fn repository_url(git_host: &str, account: &str, repo: &str) -> String {
    format!("{}/{}/{}.git", git_host.trim_end_matches('/'), account, repo)
}

impl Config {
    /// Clone URL of `repo` under `account` on the configured host
    pub fn repository_url(&self, account: &str, repo: &str) -> String {
        repository_url(&self.git_host, account, repo)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upstream_owner: default_upstream_owner(),
            git_host: default_git_host(),
            api_base_url: default_api_base_url(),
            workspace_root: default_workspace_root(),
            compose_file: default_compose_file(),
            dockerfile: default_dockerfile(),
            image_tag: default_image_tag(),
            install_command: default_install_command(),
            max_parallel: default_max_parallel(),
            fork_poll: ForkPollConfig::default(),
            services: super::defaults::default_services(),
        }
    }
}

impl Default for ForkPollConfig {
    fn default() -> Self {
        Self {
            attempts: default_poll_attempts(),
            initial_delay_ms: default_poll_initial_delay_ms(),
            max_delay_ms: default_poll_max_delay_ms(),
        }
    }
}
