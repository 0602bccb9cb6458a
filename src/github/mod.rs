//! Hosting API access
//!
//! The fork manager only needs two calls: an existence check and a fork
//! request. They sit behind [`HostingApi`] so pipelines can run against a
//! fake in tests.

mod client;

pub use client::GitHubClient;

use async_trait::async_trait;

/// Hosting API errors
#[derive(Debug, thiserror::Error)]
pub enum HostingError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to fork repository: {service} (status {status})")]
    ForkFailed { service: String, status: u16 },

    #[error("Fork of {service} did not become available after {attempts} checks")]
    ForkNotReady { service: String, attempts: u32 },

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

/// Repository hosting operations used by the fork manager
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HostingApi: Send + Sync {
    /// `GET /repos/{owner}/{repo}`: true on a success status
    async fn repository_exists(&self, owner: &str, repo: &str) -> Result<bool, HostingError>;

    /// `POST /repos/{owner}/{repo}/forks` into the authenticated account
    async fn create_fork(&self, owner: &str, repo: &str) -> Result<(), HostingError>;
}
