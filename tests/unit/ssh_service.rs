//! SSH hardening stage tests.

#![allow(clippy::expect_used)]

use rampart_cli::application::services::ssh_hardening::harden_ssh;
use rampart_cli::domain::convergence::{Outcome, RestartOutcome};
use rampart_cli::domain::ssh::{render_drop_in, DROP_IN_DIR, DROP_IN_PATH};

use crate::mocks::{InMemoryFiles, NoopReporter, RecordingReporter, RecordingServiceManager};

#[tokio::test]
async fn applied_drop_in_is_a_strict_noop() {
    let files = InMemoryFiles::new()
        .with_dir(DROP_IN_DIR)
        .with_file(DROP_IN_PATH, &render_drop_in());
    let services = RecordingServiceManager::default();

    let report = harden_ssh(&files, &services, &NoopReporter)
        .await
        .expect("stage succeeds");

    assert_eq!(report.drop_in, Outcome::Unchanged);
    assert_eq!(report.restart, RestartOutcome::NotNeeded);
    assert_eq!(files.write_count(), 0);
    assert!(services.calls().is_empty());
}

#[tokio::test]
async fn missing_drop_in_is_written_and_daemon_restarted() {
    let files = InMemoryFiles::new().with_dir(DROP_IN_DIR);
    let services = RecordingServiceManager::default();

    let report = harden_ssh(&files, &services, &NoopReporter)
        .await
        .expect("stage succeeds");

    assert_eq!(report.drop_in, Outcome::Changed);
    assert_eq!(report.restart, RestartOutcome::Restarted("ssh".to_string()));
    assert_eq!(
        files.content(DROP_IN_PATH).expect("drop-in written"),
        render_drop_in()
    );
    assert_eq!(services.calls(), vec!["restart ssh"]);
}

#[tokio::test]
async fn stale_drop_in_without_marker_is_rewritten() {
    let files = InMemoryFiles::new()
        .with_dir(DROP_IN_DIR)
        .with_file(DROP_IN_PATH, "PasswordAuthentication yes\n");
    let services = RecordingServiceManager::default();

    let report = harden_ssh(&files, &services, &NoopReporter)
        .await
        .expect("stage succeeds");

    assert_eq!(report.drop_in, Outcome::Changed);
    assert_eq!(files.write_count(), 1);
    assert!(files
        .content(DROP_IN_PATH)
        .expect("drop-in written")
        .contains("PasswordAuthentication no"));
}

#[tokio::test]
async fn commented_marker_does_not_satisfy_the_guard() {
    let files = InMemoryFiles::new()
        .with_dir(DROP_IN_DIR)
        .with_file(DROP_IN_PATH, "# PasswordAuthentication no\n");
    let services = RecordingServiceManager::default();

    let report = harden_ssh(&files, &services, &NoopReporter)
        .await
        .expect("stage succeeds");

    assert_eq!(report.drop_in, Outcome::Changed);
}

#[tokio::test]
async fn restart_falls_back_to_sshd_unit_name() {
    let files = InMemoryFiles::new().with_dir(DROP_IN_DIR);
    let services = RecordingServiceManager::default().failing_unit("ssh");

    let report = harden_ssh(&files, &services, &NoopReporter)
        .await
        .expect("stage succeeds");

    assert_eq!(report.restart, RestartOutcome::Restarted("sshd".to_string()));
    assert_eq!(services.calls(), vec!["restart ssh", "restart sshd"]);
}

#[tokio::test]
async fn restart_failure_under_all_units_is_tolerated() {
    let files = InMemoryFiles::new().with_dir(DROP_IN_DIR);
    let services = RecordingServiceManager::default()
        .failing_unit("ssh")
        .failing_unit("sshd");
    let reporter = RecordingReporter::default();

    let report = harden_ssh(&files, &services, &reporter)
        .await
        .expect("restart failures never abort");

    assert_eq!(report.drop_in, Outcome::Changed);
    assert_eq!(report.restart, RestartOutcome::Failed);
    assert_eq!(report.warnings.len(), 2);
    assert!(!reporter.warnings.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn missing_drop_in_directory_skips_the_stage() {
    let files = InMemoryFiles::new();
    let services = RecordingServiceManager::default();

    let report = harden_ssh(&files, &services, &NoopReporter)
        .await
        .expect("stage succeeds");

    assert_eq!(report.drop_in, Outcome::Skipped);
    assert_eq!(files.write_count(), 0);
    assert!(services.calls().is_empty());
    assert!(!report.warnings.is_empty());
}

#[tokio::test]
async fn write_failure_skips_the_restart() {
    let files = InMemoryFiles::new().with_dir(DROP_IN_DIR).failing_writes();
    let services = RecordingServiceManager::default();

    let report = harden_ssh(&files, &services, &NoopReporter)
        .await
        .expect("write failures never abort");

    assert_eq!(report.drop_in, Outcome::Skipped);
    assert_eq!(report.restart, RestartOutcome::NotNeeded);
    assert!(services.calls().is_empty());
}
