//! Stack launcher

use crate::docker::DockerCli;
use crate::exec::CommandError;
use tracing::info;

/// Brings up the compose stack once every image is built
pub struct StackLauncher {
    docker: DockerCli,
}

impl StackLauncher {
    pub fn new(docker: DockerCli) -> Self {
        Self { docker }
    }

    pub async fn launch(&self) -> Result<(), CommandError> {
        info!("Starting Docker containers with docker-compose...");
        self.docker.compose_up().await?;
        info!("✔ All Docker containers started successfully.");
        Ok(())
    }
}
