//! Service pipelines
//!
//! This module holds the per-service work (forking, workspace preparation,
//! upstream sync) and the [`Bootstrapper`] that fans it out over every
//! configured service.

pub mod bootstrap;
pub mod fork;
pub mod launcher;
pub mod sync;
pub mod workspace;

pub use bootstrap::{BootstrapError, Bootstrapper};
pub use fork::ForkManager;
pub use launcher::StackLauncher;
pub use sync::{SyncError, SyncManager, SyncReport};
pub use workspace::{Checkout, WorkspaceBuilder, WorkspaceReport};

use crate::exec::CommandError;
use crate::github::HostingError;
use std::path::PathBuf;

/// Failure of one service's `up` pipeline
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fork(#[from] HostingError),

    #[error("Failed to create workspace directory {}: {source}", path.display())]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to clone {service}: {source}")]
    Clone {
        service: String,
        #[source]
        source: CommandError,
    },

    #[error("Failed to install dependencies for {service}: {source}")]
    Install {
        service: String,
        #[source]
        source: CommandError,
    },

    #[error("Failed to build Docker image for {service}: {source}")]
    Build {
        service: String,
        #[source]
        source: CommandError,
    },
}
