//! Core data types
//!
//! - `service.rs` - Service descriptors and their derived paths
//! - `report.rs` - Per-service outcomes and the run summary

pub mod report;
pub mod service;

pub use report::{RunKind, RunReport, ServiceOutcome};
pub use service::{DEFAULT_BRANCH, ServiceDescriptor};
