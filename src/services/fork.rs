//! Fork manager
//!
//! Makes sure the developer account has a fork of each service repository
//! and that the fork is visible before anything tries to clone it.

use crate::config::{AppConfig, ForkPollConfig};
use crate::github::{HostingApi, HostingError};
use crate::models::ServiceDescriptor;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

pub struct ForkManager {
    api: Arc<dyn HostingApi>,
    app: AppConfig,
}

impl ForkManager {
    pub fn new(api: Arc<dyn HostingApi>, app: &AppConfig) -> Self {
        Self {
            api,
            app: app.clone(),
        }
    }

    fn account(&self) -> &str {
        &self.app.credentials.account_name
    }

    fn poll(&self) -> &ForkPollConfig {
        &self.app.settings.fork_poll
    }

    /// Return the fork URL, requesting the fork first if it does not exist.
    ///
    /// An existing fork is detected with a single existence check and no fork
    /// request is made.
    #[instrument(skip(self, service), fields(service = %service.name))]
    pub async fn ensure_fork(&self, service: &ServiceDescriptor) -> Result<String, HostingError> {
        let fork_url = self.app.fork_url(&service.name);

        info!("➤ Checking if {} repository is already forked...", service.name);
        if self
            .api
            .repository_exists(self.account(), &service.name)
            .await?
        {
            info!("✔ Repository {} is already forked.", service.name);
            return Ok(fork_url);
        }

        info!("➤ Forking {} repository...", service.name);
        self.api
            .create_fork(&self.app.settings.upstream_owner, &service.name)
            .await?;
        self.wait_until_ready(service).await?;

        info!("✔ Successfully forked {} repository.", service.name);
        Ok(fork_url)
    }

    /// Poll the existence check with exponential backoff until the fork shows up.
    /// Forks are created asynchronously by the hosting service.
    async fn wait_until_ready(&self, service: &ServiceDescriptor) -> Result<(), HostingError> {
        let poll = self.poll();
        if poll.attempts == 0 {
            return Ok(());
        }

        let max_delay = Duration::from_millis(poll.max_delay_ms);
        let mut delay = Duration::from_millis(poll.initial_delay_ms).min(max_delay);

        for attempt in 1..=poll.attempts {
            tokio::time::sleep(delay).await;
            if self
                .api
                .repository_exists(self.account(), &service.name)
                .await?
            {
                debug!(attempt, "Fork of {} is available", service.name);
                return Ok(());
            }
            debug!(attempt, "Fork of {} not available yet", service.name);
            delay = (delay * 2).min(max_delay);
        }

        Err(HostingError::ForkNotReady {
            service: service.name.clone(),
            attempts: poll.attempts,
        })
    }
}
