//! Git command-line adapter
//!
//! Wraps the git operations the pipelines need. Network operations (clone,
//! pull, fetch, push) authenticate with an `http.<host>/.extraheader` entry
//! passed through `GIT_CONFIG_*` environment variables of the child process,
//! so the token never reaches argv, remote URLs or `.git/config`.

use crate::config::Credentials;
use crate::exec::{CommandError, CommandRunner, CommandSpec, run_checked};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;
use std::sync::Arc;
use tracing::instrument;

/// Out-of-band HTTP authentication for git network operations
#[derive(Clone)]
pub struct GitAuth {
    config_key: String,
    header: SecretString,
}

impl GitAuth {
    /// Token authentication scoped to `git_host` (e.g. `https://github.com`)
    pub fn token(git_host: &str, credentials: &Credentials) -> Self {
        let basic = BASE64.encode(format!("x-access-token:{}", credentials.expose_token()));
        Self {
            config_key: format!("http.{}/.extraheader", git_host.trim_end_matches('/')),
            header: SecretString::from(format!("AUTHORIZATION: basic {}", basic)),
        }
    }

    fn apply(&self, spec: CommandSpec) -> CommandSpec {
        spec.env("GIT_CONFIG_COUNT", "1")
            .env("GIT_CONFIG_KEY_0", self.config_key.as_str())
            .env("GIT_CONFIG_VALUE_0", self.header.expose_secret())
    }
}

impl std::fmt::Debug for GitAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitAuth")
            .field("config_key", &self.config_key)
            .finish_non_exhaustive()
    }
}

/// Git operations on local working copies
#[derive(Clone)]
pub struct Git {
    runner: Arc<dyn CommandRunner>,
    auth: Option<GitAuth>,
}

impl Git {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner, auth: None }
    }

    pub fn with_auth(mut self, auth: GitAuth) -> Self {
        self.auth = Some(auth);
        self
    }

    fn command(&self, repo: Option<&Path>) -> CommandSpec {
        let spec = CommandSpec::new("git").env("GIT_TERMINAL_PROMPT", "0");
        match repo {
            Some(path) => spec.current_dir(path),
            None => spec,
        }
    }

    fn network_command(&self, repo: Option<&Path>) -> CommandSpec {
        let spec = self.command(repo);
        match &self.auth {
            Some(auth) => auth.apply(spec),
            None => spec,
        }
    }

    async fn run(&self, spec: CommandSpec) -> Result<String, CommandError> {
        let output = run_checked(self.runner.as_ref(), &spec).await?;
        Ok(output.stdout)
    }

    /// `git clone --branch <branch> <url> <dest>`
    #[instrument(skip(self, dest), fields(dest = %dest.display()))]
    pub async fn clone_repo(&self, url: &str, dest: &Path, branch: &str) -> Result<(), CommandError> {
        let spec = self
            .network_command(None)
            .args(["clone", "--branch", branch, url])
            .path_arg(dest);
        self.run(spec).await.map(|_| ())
    }

    /// `git pull origin <branch>` inside `repo`
    #[instrument(skip(self, repo), fields(repo = %repo.display()))]
    pub async fn pull(&self, repo: &Path, branch: &str) -> Result<(), CommandError> {
        let spec = self
            .network_command(Some(repo))
            .args(["pull", "origin", branch]);
        self.run(spec).await.map(|_| ())
    }

    /// Names of the configured remotes
    pub async fn remotes(&self, repo: &Path) -> Result<Vec<String>, CommandError> {
        let stdout = self.run(self.command(Some(repo)).arg("remote")).await?;
        Ok(parse_remotes(&stdout))
    }

    pub async fn add_remote(&self, repo: &Path, name: &str, url: &str) -> Result<(), CommandError> {
        let spec = self.command(Some(repo)).args(["remote", "add", name, url]);
        self.run(spec).await.map(|_| ())
    }

    pub async fn set_remote_url(
        &self,
        repo: &Path,
        name: &str,
        url: &str,
    ) -> Result<(), CommandError> {
        let spec = self
            .command(Some(repo))
            .args(["remote", "set-url", name, url]);
        self.run(spec).await.map(|_| ())
    }

    /// `git fetch <remote> <branch>`
    pub async fn fetch(&self, repo: &Path, remote: &str, branch: &str) -> Result<(), CommandError> {
        let spec = self
            .network_command(Some(repo))
            .args(["fetch", remote, branch]);
        self.run(spec).await.map(|_| ())
    }

    pub async fn checkout(&self, repo: &Path, branch: &str) -> Result<(), CommandError> {
        let spec = self.command(Some(repo)).args(["checkout", branch]);
        self.run(spec).await.map(|_| ())
    }

    /// Merge `from` (e.g. `upstream/main`) into the checked-out branch.
    /// Conflicts surface as a failed command.
    pub async fn merge(&self, repo: &Path, from: &str) -> Result<(), CommandError> {
        let spec = self.command(Some(repo)).args(["merge", "--no-edit", from]);
        self.run(spec).await.map(|_| ())
    }

    /// `git push <remote> <branch>`
    pub async fn push(&self, repo: &Path, remote: &str, branch: &str) -> Result<(), CommandError> {
        let spec = self
            .network_command(Some(repo))
            .args(["push", remote, branch]);
        self.run(spec).await.map(|_| ())
    }
}

/// Parse `git remote` output into remote names
pub fn parse_remotes(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
