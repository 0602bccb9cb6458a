//! Shared fakes for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use stackstrap::{
    AppConfig, CommandError, CommandOutput, CommandRunner, CommandSpec, Config, Credentials,
    HostingApi, HostingError, ServiceDescriptor,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

type Override = Box<dyn Fn(&CommandSpec) -> Option<CommandOutput> + Send + Sync>;

/// Records every command and succeeds unless an override says otherwise.
/// `git clone` creates its destination directory like the real thing.
pub struct RecordingRunner {
    calls: Mutex<Vec<CommandSpec>>,
    overrides: Vec<Override>,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            overrides: Vec::new(),
            delay: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Return `output` for commands matching `predicate`
    pub fn respond<P>(mut self, predicate: P, output: CommandOutput) -> Self
    where
        P: Fn(&CommandSpec) -> bool + Send + Sync + 'static,
    {
        self.overrides.push(Box::new(move |spec| {
            predicate(spec).then(|| output.clone())
        }));
        self
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls rendered as command lines, e.g. `git clone --branch main ...`
    pub fn lines(&self) -> Vec<String> {
        self.calls().iter().map(|c| c.to_string()).collect()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.lines().iter().filter(|l| l.starts_with(prefix)).count()
    }

    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.lines().iter().position(|l| l.starts_with(prefix))
    }

    pub fn last_position(&self, prefix: &str) -> Option<usize> {
        self.lines().iter().rposition(|l| l.starts_with(prefix))
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, CommandError> {
        self.calls.lock().unwrap().push(command.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(output) = self.overrides.iter().find_map(|o| o(command)) {
            return Ok(output);
        }

        if command.program == "git" && command.args.first().map(String::as_str) == Some("clone")
        {
            if let Some(dest) = command.args.last() {
                std::fs::create_dir_all(dest).expect("create clone destination");
            }
        }

        Ok(CommandOutput::success(""))
    }
}

/// In-memory hosting API
pub struct FakeHosting {
    existing: Mutex<HashSet<String>>,
    rejected_forks: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeHosting {
    pub fn new() -> Self {
        Self {
            existing: Mutex::new(HashSet::new()),
            rejected_forks: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Mark `owner/repo` as already existing
    pub fn with_repo(self, owner: &str, repo: &str) -> Self {
        self.existing
            .lock()
            .unwrap()
            .insert(format!("{}/{}", owner, repo));
        self
    }

    /// Reject fork requests for `repo`
    pub fn rejecting_fork(mut self, repo: &str) -> Self {
        self.rejected_forks.insert(repo.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostingApi for FakeHosting {
    async fn repository_exists(&self, owner: &str, repo: &str) -> Result<bool, HostingError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("GET {}/{}", owner, repo));
        Ok(self
            .existing
            .lock()
            .unwrap()
            .contains(&format!("{}/{}", owner, repo)))
    }

    async fn create_fork(&self, owner: &str, repo: &str) -> Result<(), HostingError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("POST {}/{}/forks", owner, repo));
        if self.rejected_forks.contains(repo) {
            return Err(HostingError::ForkFailed {
                service: repo.to_string(),
                status: 404,
            });
        }
        // The fake forks into the account "dev"
        self.existing
            .lock()
            .unwrap()
            .insert(format!("dev/{}", repo));
        Ok(())
    }
}

pub fn services(names: &[&str]) -> Vec<ServiceDescriptor> {
    names
        .iter()
        .map(|name| {
            ServiceDescriptor::new(
                *name,
                format!("https://github.com/LakshayManglani/{}.git", name),
            )
        })
        .collect()
}

/// App config rooted in `root`, with fork polling that never sleeps
pub fn app(root: &Path, account: &str, services: Vec<ServiceDescriptor>) -> AppConfig {
    let mut settings = Config {
        workspace_root: root.join("services"),
        services,
        ..Default::default()
    };
    settings.fork_poll.initial_delay_ms = 0;
    settings.fork_poll.max_delay_ms = 0;
    settings.fork_poll.attempts = 2;
    AppConfig::new(settings, Credentials::new(account, "ghp_test_token"))
}

pub fn workspace(root: &Path, name: &str) -> PathBuf {
    root.join("services").join(name)
}
