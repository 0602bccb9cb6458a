//! Run outcomes
//!
//! Every service pipeline ends in a [`ServiceOutcome`]; a run collects them,
//! in configuration order, into a [`RunReport`].

use chrono::{DateTime, Utc};
use std::fmt::Write;

/// Which command produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Up,
    Sync,
}

impl RunKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunKind::Up => "up",
            RunKind::Sync => "sync",
        }
    }
}

/// Result of one service's pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceOutcome {
    Succeeded { service: String, summary: String },
    Skipped { service: String, reason: String },
    Failed { service: String, error: String },
}

impl ServiceOutcome {
    pub fn service(&self) -> &str {
        match self {
            ServiceOutcome::Succeeded { service, .. }
            | ServiceOutcome::Skipped { service, .. }
            | ServiceOutcome::Failed { service, .. } => service,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ServiceOutcome::Failed { .. })
    }
}

/// Summary of a full `up` or `sync` run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub kind: RunKind,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<ServiceOutcome>,
    /// Whether the compose stack was brought up (always false for sync)
    pub stack_launched: bool,
}

impl RunReport {
    pub fn new(kind: RunKind, started_at: DateTime<Utc>, outcomes: Vec<ServiceOutcome>) -> Self {
        Self {
            kind,
            started_at,
            finished_at: Utc::now(),
            outcomes,
            stack_launched: false,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &ServiceOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Human-readable summary, one line per service plus a totals line
    pub fn render(&self) -> String {
        let mut out = String::new();
        for outcome in &self.outcomes {
            let _ = match outcome {
                ServiceOutcome::Succeeded { service, summary } => {
                    writeln!(out, "✔ {}: {}", service, summary)
                }
                ServiceOutcome::Skipped { service, reason } => {
                    writeln!(out, "- {}: skipped ({})", service, reason)
                }
                ServiceOutcome::Failed { service, error } => {
                    writeln!(out, "✖ {}: {}", service, error)
                }
            };
        }

        let failed = self.failure_count();
        let skipped = self
            .outcomes
            .iter()
            .filter(|o| matches!(o, ServiceOutcome::Skipped { .. }))
            .count();
        let succeeded = self.outcomes.len() - failed - skipped;

        let _ = write!(
            out,
            "{}: {} succeeded, {} failed",
            self.kind.as_str(),
            succeeded,
            failed
        );
        if skipped > 0 {
            let _ = write!(out, ", {} skipped", skipped);
        }
        if self.kind == RunKind::Up {
            let stack = if self.stack_launched {
                "stack launched"
            } else {
                "stack not launched"
            };
            let _ = write!(out, ", {}", stack);
        }
        out
    }
}
