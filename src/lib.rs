//! stackstrap library
//!
//! Forks a fixed set of service repositories into the developer's account,
//! clones or updates each locally, builds a development image per service,
//! and brings up the Docker Compose stack. A separate sync run keeps forks
//! in line with upstream.
//!
//! The binary is a thin CLI over [`services::Bootstrapper`]; everything is
//! usable as a library and testable against fake runners.

pub mod config;
pub mod docker;
pub mod exec;
pub mod git;
pub mod github;
pub mod models;
pub mod services;

// Re-export commonly used types for convenience
pub use config::{AppConfig, Config, ConfigLoader, Credentials};
pub use exec::{CommandError, CommandOutput, CommandRunner, CommandSpec, SystemRunner};
pub use github::{HostingApi, HostingError};
pub use models::{RunKind, RunReport, ServiceDescriptor, ServiceOutcome};
pub use services::{BootstrapError, Bootstrapper};
