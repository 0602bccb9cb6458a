//! Integration tests for `sync`: upstream remote, fetch, merge and push
//! against recorded git invocations.

mod common;

use common::{FakeHosting, RecordingRunner, app, services, workspace};
use stackstrap::{
    AppConfig, Bootstrapper, CommandOutput, CommandSpec, ConfigLoader, Credentials, RunKind,
    ServiceOutcome,
};
use std::sync::Arc;

fn is_git(spec: &CommandSpec, args: &[&str]) -> bool {
    spec.program == "git"
        && spec.args.len() >= args.len()
        && spec.args.iter().zip(args).all(|(a, b)| a == b)
}

fn checkouts(root: &std::path::Path, names: &[&str]) {
    for name in names {
        std::fs::create_dir_all(workspace(root, name)).unwrap();
    }
}

#[tokio::test]
async fn test_sync_is_skipped_for_upstream_owner() {
    let tmp = tempfile::tempdir().unwrap();
    checkouts(tmp.path(), &["auth-service", "user-service"]);
    let app = app(
        tmp.path(),
        "lakshaymanglani",
        services(&["auth-service", "user-service"]),
    );
    let runner = Arc::new(RecordingRunner::new());
    let hosting = Arc::new(FakeHosting::new());

    let report = Bootstrapper::new(&app, runner.clone(), hosting.clone())
        .sync()
        .await;

    assert_eq!(report.kind, RunKind::Sync);
    assert!(report.is_success());
    assert!(
        report
            .outcomes
            .iter()
            .all(|o| matches!(o, ServiceOutcome::Skipped { .. }))
    );
    assert!(runner.calls().is_empty());
    assert!(hosting.calls().is_empty());
}

#[tokio::test]
async fn test_sync_adds_upstream_then_merges_and_pushes() {
    let tmp = tempfile::tempdir().unwrap();
    checkouts(tmp.path(), &["auth-service"]);
    let app = app(tmp.path(), "dev", services(&["auth-service"]));
    let runner = Arc::new(RecordingRunner::new().respond(
        |spec| is_git(spec, &["remote"]) && spec.args.len() == 1,
        CommandOutput::success("origin\n"),
    ));

    let report = Bootstrapper::new(&app, runner.clone(), Arc::new(FakeHosting::new()))
        .sync()
        .await;

    assert!(report.is_success());
    assert_eq!(
        runner.lines(),
        vec![
            "git remote",
            "git remote add upstream https://github.com/LakshayManglani/auth-service.git",
            "git fetch upstream main",
            "git checkout main",
            "git merge --no-edit upstream/main",
            "git remote set-url origin https://github.com/dev/auth-service.git",
            "git push origin main",
        ]
    );

    let ws = workspace(tmp.path(), "auth-service");
    assert!(
        runner
            .calls()
            .iter()
            .all(|c| c.cwd.as_deref() == Some(ws.as_path()))
    );
    assert_eq!(
        report.outcomes[0],
        ServiceOutcome::Succeeded {
            service: "auth-service".to_string(),
            summary: "added upstream, merged upstream/main and pushed to origin".to_string(),
        }
    );
}

#[tokio::test]
async fn test_sync_keeps_existing_upstream_remote() {
    let tmp = tempfile::tempdir().unwrap();
    checkouts(tmp.path(), &["post-service"]);
    let app = app(tmp.path(), "dev", services(&["post-service"]));
    let runner = Arc::new(RecordingRunner::new().respond(
        |spec| is_git(spec, &["remote"]) && spec.args.len() == 1,
        CommandOutput::success("origin\nupstream\n"),
    ));

    let report = Bootstrapper::new(&app, runner.clone(), Arc::new(FakeHosting::new()))
        .sync()
        .await;

    assert!(report.is_success());
    assert_eq!(runner.count("git remote add"), 0);
    assert_eq!(runner.count("git push origin main"), 1);
}

#[tokio::test]
async fn test_network_steps_carry_credentials_out_of_band() {
    let tmp = tempfile::tempdir().unwrap();
    checkouts(tmp.path(), &["auth-service"]);
    let app = app(tmp.path(), "dev", services(&["auth-service"]));
    let runner = Arc::new(RecordingRunner::new());

    Bootstrapper::new(&app, runner.clone(), Arc::new(FakeHosting::new()))
        .sync()
        .await;

    for call in runner.calls() {
        assert!(
            call.args.iter().all(|a| !a.contains("ghp_test_token")),
            "token leaked into {}",
            call
        );
        assert!(call.envs.iter().all(|(_, v)| v != "ghp_test_token"));
    }

    let push = runner
        .calls()
        .into_iter()
        .find(|c| is_git(c, &["push"]))
        .unwrap();
    assert!(push.envs.iter().any(|(k, _)| k == "GIT_CONFIG_VALUE_0"));
    assert!(
        push.envs
            .iter()
            .any(|(k, v)| k == "GIT_TERMINAL_PROMPT" && v == "0")
    );
}

#[tokio::test]
async fn test_merge_conflict_stops_before_push() {
    let tmp = tempfile::tempdir().unwrap();
    checkouts(tmp.path(), &["auth-service", "user-service"]);
    let app = app(tmp.path(), "dev", services(&["auth-service", "user-service"]));
    let auth_ws = workspace(tmp.path(), "auth-service");
    let runner = Arc::new(RecordingRunner::new().respond(
        move |spec| is_git(spec, &["merge"]) && spec.cwd.as_deref() == Some(auth_ws.as_path()),
        CommandOutput::failure(1, "CONFLICT (content): Merge conflict in index.js"),
    ));

    let report = Bootstrapper::new(&app, runner.clone(), Arc::new(FakeHosting::new()))
        .sync()
        .await;

    assert_eq!(report.failure_count(), 1);
    let ServiceOutcome::Failed { service, error } = &report.outcomes[0] else {
        panic!("expected a failure, got {:?}", report.outcomes[0]);
    };
    assert_eq!(service, "auth-service");
    assert!(error.starts_with("Error syncing auth-service (merge)"));
    assert!(error.contains("Merge conflict"));

    // Only the healthy service was pushed
    assert_eq!(runner.count("git push"), 1);
    assert!(!report.outcomes[1].is_failure());
}

#[tokio::test]
async fn test_missing_workspace_fails_only_that_service() {
    let tmp = tempfile::tempdir().unwrap();
    checkouts(tmp.path(), &["auth-service"]);
    let app = app(tmp.path(), "dev", services(&["auth-service", "user-service"]));
    let runner = Arc::new(RecordingRunner::new());

    let report = Bootstrapper::new(&app, runner.clone(), Arc::new(FakeHosting::new()))
        .sync()
        .await;

    assert!(!report.outcomes[0].is_failure());
    let ServiceOutcome::Failed { service, error } = &report.outcomes[1] else {
        panic!("expected a failure, got {:?}", report.outcomes[1]);
    };
    assert_eq!(service, "user-service");
    assert!(error.contains("run `stackstrap up` first"));
    assert_eq!(runner.count("git push"), 1);
}

#[tokio::test]
async fn test_sync_never_forks() {
    let tmp = tempfile::tempdir().unwrap();
    checkouts(tmp.path(), &["auth-service"]);
    let app = app(tmp.path(), "dev", services(&["auth-service"]));
    let hosting = Arc::new(FakeHosting::new());

    Bootstrapper::new(&app, Arc::new(RecordingRunner::new()), hosting.clone())
        .sync()
        .await;

    assert!(hosting.calls().is_empty());
}

#[tokio::test]
async fn test_configured_owner_drives_builtin_upstream_remote() {
    let tmp = tempfile::tempdir().unwrap();
    let settings_path = tmp.path().join("stackstrap.yaml");
    std::fs::write(
        &settings_path,
        format!(
            "upstreamOwner: acme\nworkspaceRoot: {}\n",
            tmp.path().join("services").display()
        ),
    )
    .unwrap();
    checkouts(tmp.path(), &["api-gateway", "email-service", "auth-service", "user-service"]);

    let settings = ConfigLoader::load(Some(&settings_path)).unwrap();
    let app = AppConfig::new(settings, Credentials::new("dev", "ghp_test_token"));
    let runner = Arc::new(RecordingRunner::new());
    let hosting = Arc::new(FakeHosting::new());

    let report = Bootstrapper::new(&app, runner.clone(), hosting)
        .sync()
        .await;

    assert!(report.is_success());
    let lines = runner.lines();
    assert!(
        lines.contains(
            &"git remote add upstream https://github.com/acme/auth-service.git".to_string()
        ),
        "{:?}",
        lines
    );
    assert_eq!(runner.count("git remote add upstream https://github.com/LakshayManglani"), 0);
}
