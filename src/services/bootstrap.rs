//! Run orchestration
//!
//! `up` runs one pipeline per service (fork when needed, then clone/pull and
//! build) with at most `maxParallel` in flight, then launches the compose
//! stack. `sync` fans out the sync manager the same way.
//!
//! Failures are isolated per service: a failing pipeline never cancels the
//! others. The stack is only launched when every pipeline succeeded.

use super::{ForkManager, PipelineError, StackLauncher, SyncManager, WorkspaceBuilder};
use crate::config::AppConfig;
use crate::docker::DockerCli;
use crate::exec::{CommandError, CommandRunner, SystemRunner};
use crate::git::{Git, GitAuth};
use crate::github::{GitHubClient, HostingApi, HostingError};
use crate::models::{RunKind, RunReport, ServiceDescriptor, ServiceOutcome};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Run-level errors (per-service failures end up in the report instead)
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Error starting the stack: {0}")]
    Launch(#[source] CommandError),
}

pub struct Bootstrapper {
    services: Vec<ServiceDescriptor>,
    /// `None` when the developer account is the upstream owner
    fork_manager: Option<ForkManager>,
    sync_manager: Option<SyncManager>,
    workspace: WorkspaceBuilder,
    launcher: StackLauncher,
    max_parallel: usize,
}

impl Bootstrapper {
    /// Wire up the pipelines with the given runner and hosting API
    pub fn new(
        app: &AppConfig,
        runner: Arc<dyn CommandRunner>,
        api: Arc<dyn HostingApi>,
    ) -> Self {
        let git = Git::new(runner.clone())
            .with_auth(GitAuth::token(&app.settings.git_host, &app.credentials));
        let docker = DockerCli::new(
            runner.clone(),
            app.settings.dockerfile.clone(),
            app.settings.compose_file.clone(),
        );

        let is_owner = app.is_upstream_owner();
        Self {
            services: app.settings.services.clone(),
            fork_manager: (!is_owner).then(|| ForkManager::new(api, app)),
            sync_manager: (!is_owner).then(|| SyncManager::new(git.clone(), app)),
            workspace: WorkspaceBuilder::new(git, docker.clone(), runner, app),
            launcher: StackLauncher::new(docker),
            max_parallel: app.settings.max_parallel,
        }
    }

    /// Wire up the pipelines against the real git/docker binaries and the hosting API
    pub fn from_config(app: &AppConfig) -> Result<Self, HostingError> {
        let api = GitHubClient::new(&app.settings.api_base_url, &app.credentials)?;
        Ok(Self::new(app, Arc::new(SystemRunner::new()), Arc::new(api)))
    }

    fn concurrency(&self) -> usize {
        match self.max_parallel {
            0 => self.services.len().max(1),
            n => n,
        }
    }

    /// Run `f` for every service, keeping configuration order in the results
    async fn fan_out<'a, F, Fut>(&'a self, f: F) -> Vec<ServiceOutcome>
    where
        F: Fn(&'a ServiceDescriptor) -> Fut,
        Fut: Future<Output = ServiceOutcome> + 'a,
    {
        stream::iter(self.services.iter())
            .map(f)
            .buffered(self.concurrency())
            .collect()
            .await
    }

    /// Fork, clone/pull and build every service, then launch the stack.
    pub async fn up(&self) -> Result<RunReport, BootstrapError> {
        let started_at = Utc::now();
        info!(
            services = self.services.len(),
            max_parallel = self.concurrency(),
            "Starting build process for all services..."
        );

        let outcomes = self.fan_out(|service| self.build_service(service)).await;
        let mut report = RunReport::new(RunKind::Up, started_at, outcomes);

        if report.is_success() {
            self.launcher
                .launch()
                .await
                .map_err(BootstrapError::Launch)?;
            report.stack_launched = true;
        } else {
            warn!(
                failed = report.failure_count(),
                "Not starting the stack because some services failed"
            );
        }

        report.finished_at = Utc::now();
        Ok(report)
    }

    async fn build_service(&self, service: &ServiceDescriptor) -> ServiceOutcome {
        info!("➤ Starting build for service: {}", service.name);
        match self.run_pipeline(service).await {
            Ok(summary) => ServiceOutcome::Succeeded {
                service: service.name.clone(),
                summary,
            },
            Err(e) => {
                error!(service = %service.name, "✖ {}", e);
                ServiceOutcome::Failed {
                    service: service.name.clone(),
                    error: e.to_string(),
                }
            }
        }
    }

    async fn run_pipeline(&self, service: &ServiceDescriptor) -> Result<String, PipelineError> {
        let repository_url = match &self.fork_manager {
            Some(forks) => forks.ensure_fork(service).await?,
            None => service.repository_url.clone(),
        };
        let report = self.workspace.prepare(service, &repository_url).await?;
        Ok(report.summary())
    }

    /// Sync every fork with its upstream. Skipped for the upstream owner.
    pub async fn sync(&self) -> RunReport {
        let started_at = Utc::now();

        let Some(sync) = &self.sync_manager else {
            info!("Account is the upstream owner, nothing to sync");
            let outcomes = self
                .services
                .iter()
                .map(|service| ServiceOutcome::Skipped {
                    service: service.name.clone(),
                    reason: "account is the upstream owner".to_string(),
                })
                .collect();
            return RunReport::new(RunKind::Sync, started_at, outcomes);
        };

        let outcomes = self
            .fan_out(|service| async move {
                match sync.sync(service).await {
                    Ok(report) => ServiceOutcome::Succeeded {
                        service: service.name.clone(),
                        summary: report.summary(),
                    },
                    Err(e) => {
                        error!(service = %service.name, "✖ {}", e);
                        ServiceOutcome::Failed {
                            service: service.name.clone(),
                            error: e.to_string(),
                        }
                    }
                }
            })
            .await;

        RunReport::new(RunKind::Sync, started_at, outcomes)
    }
}
