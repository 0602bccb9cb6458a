//! Service descriptors

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Branch used when a service does not name one
pub const DEFAULT_BRANCH: &str = "main";

/// A service repository taking part in the development stack.
///
/// Identity is `name`: it names the local working copy, the hosting
/// repository under each account, and the development image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    /// Service name (e.g. "auth-service")
    pub name: String,

    /// Canonical upstream repository URL
    #[serde(alias = "repo")]
    pub repository_url: String,

    /// Tracked branch, `main` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl ServiceDescriptor {
    pub fn new(name: impl Into<String>, repository_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            repository_url: repository_url.into(),
            branch: None,
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// The tracked branch, falling back to `main`
    pub fn branch(&self) -> &str {
        self.branch
            .as_deref()
            .filter(|b| !b.is_empty())
            .unwrap_or(DEFAULT_BRANCH)
    }

    /// Local working copy path under the workspace root
    pub fn local_path(&self, workspace_root: &Path) -> PathBuf {
        workspace_root.join(&self.name)
    }

    /// Image reference for the development build, e.g. `auth-service:development`
    pub fn image_ref(&self, tag: &str) -> String {
        format!("{}:{}", self.name, tag)
    }
}
