//! Repository sync manager
//!
//! Reconciles a developer fork with its upstream: make sure an `upstream`
//! remote exists, fetch and merge the tracked branch, then push it to the fork.

use crate::config::AppConfig;
use crate::exec::CommandError;
use crate::git::Git;
use crate::models::ServiceDescriptor;
use std::path::PathBuf;
use tracing::{info, instrument};

const UPSTREAM: &str = "upstream";
const ORIGIN: &str = "origin";

/// Sync errors
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("No working copy for {service} at {}; run `stackstrap up` first", path.display())]
    MissingWorkspace { service: String, path: PathBuf },

    #[error("Error syncing {service} ({step}): {source}")]
    Step {
        service: String,
        step: &'static str,
        #[source]
        source: CommandError,
    },
}

/// What a successful sync did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub added_upstream: bool,
    pub branch: String,
}

impl SyncReport {
    pub fn summary(&self) -> String {
        let mut summary = String::new();
        if self.added_upstream {
            summary.push_str("added upstream, ");
        }
        summary.push_str(&format!(
            "merged upstream/{} and pushed to origin",
            self.branch
        ));
        summary
    }
}

pub struct SyncManager {
    git: Git,
    app: AppConfig,
}

impl SyncManager {
    pub fn new(git: Git, app: &AppConfig) -> Self {
        Self {
            git,
            app: app.clone(),
        }
    }

    #[instrument(skip(self, service), fields(service = %service.name))]
    pub async fn sync(&self, service: &ServiceDescriptor) -> Result<SyncReport, SyncError> {
        let path = service.local_path(&self.app.settings.workspace_root);
        if !path.exists() {
            return Err(SyncError::MissingWorkspace {
                service: service.name.clone(),
                path,
            });
        }

        let branch = service.branch();
        let step = |step: &'static str| {
            let service = service.name.clone();
            move |source| SyncError::Step {
                service,
                step,
                source,
            }
        };

        let remotes = self.git.remotes(&path).await.map_err(step("list remotes"))?;
        let added_upstream = !remotes.iter().any(|r| r == UPSTREAM);
        if added_upstream {
            self.git
                .add_remote(&path, UPSTREAM, &service.repository_url)
                .await
                .map_err(step("add upstream"))?;
            info!("Added '{}' for {}", UPSTREAM, service.name);
        }

        self.git
            .fetch(&path, UPSTREAM, branch)
            .await
            .map_err(step("fetch"))?;
        info!("Fetched latest changes from upstream for {}", service.name);

        self.git
            .checkout(&path, branch)
            .await
            .map_err(step("checkout"))?;
        self.git
            .merge(&path, &format!("{}/{}", UPSTREAM, branch))
            .await
            .map_err(step("merge"))?;
        info!("Merged upstream changes into {}", service.name);

        let fork_url = self.app.fork_url(&service.name);
        self.git
            .set_remote_url(&path, ORIGIN, &fork_url)
            .await
            .map_err(step("set origin"))?;
        self.git
            .push(&path, ORIGIN, branch)
            .await
            .map_err(step("push"))?;
        info!("Pushed changes to forked repository for {}", service.name);

        Ok(SyncReport {
            added_upstream,
            branch: branch.to_string(),
        })
    }
}
