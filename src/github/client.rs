//! GitHub REST client

use super::{HostingApi, HostingError};
use crate::config::Credentials;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("stackstrap/", env!("CARGO_PKG_VERSION"));

/// GitHub-compatible REST API client with bearer authentication
pub struct GitHubClient {
    client: reqwest::Client,
    base_url: Url,
    token: SecretString,
}

impl GitHubClient {
    /// Create a client for `api_base_url` (e.g. `https://api.github.com`)
    pub fn new(api_base_url: &str, credentials: &Credentials) -> Result<Self, HostingError> {
        // Url::join drops the last path segment unless the base ends with '/'
        let base = format!("{}/", api_base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&base).map_err(|e| HostingError::InvalidUrl(format!("{}: {}", base, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static("2022-11-28"),
        );

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|source| HostingError::Transport {
                url: base_url.to_string(),
                source,
            })?;

        tracing::debug!("Created hosting API client for: {}", base_url);

        Ok(Self {
            client,
            base_url,
            token: credentials.access_token().clone(),
        })
    }

    /// Build `{base}/repos/{owner}/{repo}[/suffix]`
    pub fn repo_url(&self, owner: &str, repo: &str, suffix: Option<&str>) -> Result<Url, HostingError> {
        let mut path = format!("repos/{}/{}", owner, repo);
        if let Some(suffix) = suffix {
            path.push('/');
            path.push_str(suffix);
        }
        self.base_url
            .join(&path)
            .map_err(|e| HostingError::InvalidUrl(format!("{}: {}", path, e)))
    }
}

#[async_trait]
impl HostingApi for GitHubClient {
    async fn repository_exists(&self, owner: &str, repo: &str) -> Result<bool, HostingError> {
        let url = self.repo_url(owner, repo, None)?;
        tracing::debug!("Checking repository: {}", url);

        let resp = self
            .client
            .get(url.clone())
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .map_err(|source| HostingError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::debug!("Repository {}/{} not available (status: {})", owner, repo, status);
        }
        Ok(status.is_success())
    }

    async fn create_fork(&self, owner: &str, repo: &str) -> Result<(), HostingError> {
        let url = self.repo_url(owner, repo, Some("forks"))?;
        tracing::debug!("Requesting fork: {}", url);

        let resp = self
            .client
            .post(url.clone())
            .bearer_auth(self.token.expose_secret())
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|source| HostingError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!("Fork request for {} rejected: {} {}", repo, status, body);
            return Err(HostingError::ForkFailed {
                service: repo.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}
