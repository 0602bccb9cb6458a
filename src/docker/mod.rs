//! Docker command-line adapter
//!
//! Builds development images and brings the compose stack up. Both go
//! through the [`CommandRunner`] with argument vectors.

use crate::exec::{CommandError, CommandRunner, CommandSpec, run_checked};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::instrument;

/// Docker CLI operations
#[derive(Clone)]
pub struct DockerCli {
    runner: Arc<dyn CommandRunner>,
    dockerfile: String,
    compose_file: PathBuf,
}

impl DockerCli {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        dockerfile: impl Into<String>,
        compose_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            dockerfile: dockerfile.into(),
            compose_file: compose_file.into(),
        }
    }

    /// `docker build -f <dockerfile> -t <image> .` with `context` as working directory
    #[instrument(skip(self, context), fields(context = %context.display()))]
    pub async fn build_image(&self, context: &Path, image: &str) -> Result<(), CommandError> {
        let spec = CommandSpec::new("docker")
            .args(["build", "-f", self.dockerfile.as_str(), "-t", image, "."])
            .current_dir(context);
        run_checked(self.runner.as_ref(), &spec).await.map(|_| ())
    }

    /// `docker compose -f <compose file> up -d`
    #[instrument(skip(self))]
    pub async fn compose_up(&self) -> Result<(), CommandError> {
        let spec = CommandSpec::new("docker")
            .args(["compose", "-f"])
            .path_arg(&self.compose_file)
            .args(["up", "-d"]);
        run_checked(self.runner.as_ref(), &spec).await.map(|_| ())
    }
}
