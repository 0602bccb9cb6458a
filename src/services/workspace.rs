//! Local workspace builder
//!
//! Brings a service's working copy up to date (clone when absent, pull when
//! present) and builds its development image from whatever is on disk.

use super::PipelineError;
use crate::config::AppConfig;
use crate::docker::DockerCli;
use crate::exec::{CommandRunner, CommandSpec, run_checked};
use crate::git::Git;
use crate::models::ServiceDescriptor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// How the working copy was brought up to date
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checkout {
    Cloned,
    Pulled,
    /// Pull failed; the build used the existing working copy
    PullFailed(String),
}

/// Result of preparing one service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceReport {
    pub checkout: Checkout,
    pub image: String,
}

impl WorkspaceReport {
    pub fn summary(&self) -> String {
        let checkout = match &self.checkout {
            Checkout::Cloned => "cloned",
            Checkout::Pulled => "pulled",
            Checkout::PullFailed(_) => "pull failed, used local copy",
        };
        format!("{}, built {}", checkout, self.image)
    }
}

pub struct WorkspaceBuilder {
    git: Git,
    docker: DockerCli,
    runner: Arc<dyn CommandRunner>,
    workspace_root: PathBuf,
    install_command: Vec<String>,
    image_tag: String,
}

impl WorkspaceBuilder {
    pub fn new(git: Git, docker: DockerCli, runner: Arc<dyn CommandRunner>, app: &AppConfig) -> Self {
        Self {
            git,
            docker,
            runner,
            workspace_root: app.settings.workspace_root.clone(),
            install_command: app.settings.install_command.clone(),
            image_tag: app.settings.image_tag.clone(),
        }
    }

    /// Clone or pull `service` from `repository_url`, then install and build.
    #[instrument(skip(self, service, repository_url), fields(service = %service.name))]
    pub async fn prepare(
        &self,
        service: &ServiceDescriptor,
        repository_url: &str,
    ) -> Result<WorkspaceReport, PipelineError> {
        let path = service.local_path(&self.workspace_root);
        let checkout = self.update_checkout(service, repository_url, &path).await?;

        self.install_dependencies(service, &path).await?;

        let image = service.image_ref(&self.image_tag);
        info!("➤ Building Docker image for {}...", service.name);
        self.docker
            .build_image(&path, &image)
            .await
            .map_err(|source| PipelineError::Build {
                service: service.name.clone(),
                source,
            })?;
        info!("✔ Docker image for {} built successfully.", service.name);

        Ok(WorkspaceReport { checkout, image })
    }

    async fn update_checkout(
        &self,
        service: &ServiceDescriptor,
        repository_url: &str,
        path: &Path,
    ) -> Result<Checkout, PipelineError> {
        if !path.exists() {
            tokio::fs::create_dir_all(&self.workspace_root)
                .await
                .map_err(|source| PipelineError::Workspace {
                    path: self.workspace_root.clone(),
                    source,
                })?;

            info!("➤ Cloning {} repository...", service.name);
            self.git
                .clone_repo(repository_url, path, service.branch())
                .await
                .map_err(|source| PipelineError::Clone {
                    service: service.name.clone(),
                    source,
                })?;
            info!("✔ Successfully cloned {} repository.", service.name);
            return Ok(Checkout::Cloned);
        }

        info!("➤ Pulling latest changes for {} repository...", service.name);
        match self.git.pull(path, service.branch()).await {
            Ok(()) => {
                info!("✔ Successfully pulled latest changes for {}.", service.name);
                Ok(Checkout::Pulled)
            }
            Err(e) => {
                warn!("✖ Error in pulling {}: {}", service.name, e);
                Ok(Checkout::PullFailed(e.to_string()))
            }
        }
    }

    async fn install_dependencies(
        &self,
        service: &ServiceDescriptor,
        path: &Path,
    ) -> Result<(), PipelineError> {
        let Some(spec) = CommandSpec::from_argv(&self.install_command) else {
            return Ok(());
        };

        info!("➤ Installing dependencies for {}...", service.name);
        run_checked(self.runner.as_ref(), &spec.current_dir(path))
            .await
            .map_err(|source| PipelineError::Install {
                service: service.name.clone(),
                source,
            })?;
        Ok(())
    }
}
