//! Intrusion-prevention stage tests.
//!
//! Socket-poll tests run under `start_paused` so the 10-second readiness
//! budget elapses in virtual time.

#![allow(clippy::expect_used)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;

use rampart_cli::application::ports::HostFiles;
use rampart_cli::application::services::jail::{converge_jail, wait_for_socket, SOCKET_PATH};
use rampart_cli::domain::convergence::Outcome;
use rampart_cli::domain::jail::{
    JailSpec, DEFAULT_BACKEND_SNIPPET, JAIL_FRAGMENT_PATH, JAIL_LOCAL_PATH,
};

use crate::mocks::{
    InMemoryFiles, NoopReporter, RecordingServiceManager, ScriptedJailClient,
};

fn files_with_socket() -> InMemoryFiles {
    InMemoryFiles::new().with_file(SOCKET_PATH, "")
}

#[tokio::test]
async fn fragment_is_rewritten_every_run() {
    let files = files_with_socket().with_file(JAIL_FRAGMENT_PATH, &JailSpec::sshd().render());
    let services = RecordingServiceManager::default();
    let client = ScriptedJailClient::default();

    let report = converge_jail(&files, &services, &client, &NoopReporter)
        .await
        .expect("stage succeeds");

    // Idempotent by overwrite, not by guard.
    assert_eq!(report.fragment, Outcome::Changed);
    assert_eq!(files.write_count(), 1);
}

#[tokio::test]
async fn fragment_carries_the_full_jail_definition() {
    let files = files_with_socket();
    let services = RecordingServiceManager::default();
    let client = ScriptedJailClient::default();

    converge_jail(&files, &services, &client, &NoopReporter)
        .await
        .expect("stage succeeds");

    let fragment = files.content(JAIL_FRAGMENT_PATH).expect("fragment written");
    assert_eq!(fragment, JailSpec::sshd().render());
    for line in [
        "[sshd]",
        "enabled = true",
        "port = ssh",
        "filter = sshd",
        "backend = systemd",
        "mode = aggressive",
        "maxretry = 3",
        "findtime = 10m",
        "bantime = 24h",
    ] {
        assert!(fragment.contains(line), "fragment missing {line}");
    }
}

#[tokio::test]
async fn backend_directive_present_means_no_append() {
    let files =
        files_with_socket().with_file(JAIL_LOCAL_PATH, "[DEFAULT]\nbackend = systemd\n");
    let services = RecordingServiceManager::default();
    let client = ScriptedJailClient::default();

    let report = converge_jail(&files, &services, &client, &NoopReporter)
        .await
        .expect("stage succeeds");

    assert_eq!(report.backend_append, Outcome::Unchanged);
    assert_eq!(files.append_count(), 0);
}

#[tokio::test]
async fn missing_backend_directive_gets_one_append() {
    let files = files_with_socket().with_file(JAIL_LOCAL_PATH, "[sshd]\nenabled = true\n");
    let services = RecordingServiceManager::default();
    let client = ScriptedJailClient::default();

    let report = converge_jail(&files, &services, &client, &NoopReporter)
        .await
        .expect("stage succeeds");

    assert_eq!(report.backend_append, Outcome::Changed);
    assert_eq!(files.append_count(), 1);
    let content = files.content(JAIL_LOCAL_PATH).expect("jail.local present");
    assert!(content.starts_with("[sshd]\nenabled = true\n"));
    assert!(content.ends_with(DEFAULT_BACKEND_SNIPPET));
}

#[tokio::test]
async fn absent_jail_local_is_created_by_append() {
    let files = files_with_socket();
    let services = RecordingServiceManager::default();
    let client = ScriptedJailClient::default();

    let report = converge_jail(&files, &services, &client, &NoopReporter)
        .await
        .expect("stage succeeds");

    assert_eq!(report.backend_append, Outcome::Changed);
    assert_eq!(
        files.content(JAIL_LOCAL_PATH).as_deref(),
        Some(DEFAULT_BACKEND_SNIPPET)
    );
}

#[tokio::test]
async fn daemon_is_reloaded_enabled_and_restarted() {
    let files = files_with_socket();
    let services = RecordingServiceManager::default();
    let client = ScriptedJailClient::default();

    let report = converge_jail(&files, &services, &client, &NoopReporter)
        .await
        .expect("stage succeeds");

    assert_eq!(
        services.calls(),
        vec!["daemon-reload", "enable fail2ban", "restart fail2ban"]
    );
    assert!(report.enabled);
    assert!(report.restarted);
}

#[tokio::test]
async fn restart_failure_still_runs_diagnostics() {
    let files = files_with_socket();
    let services = RecordingServiceManager::default().failing_unit("fail2ban");
    let client = ScriptedJailClient::default();

    let report = converge_jail(&files, &services, &client, &NoopReporter)
        .await
        .expect("restart failures never abort");

    assert!(!report.enabled);
    assert!(!report.restarted);
    assert!(!report.warnings.is_empty());
    // Diagnostics ran exactly once regardless.
    assert!(client.calls().contains(&"config-test".to_string()));
}

#[tokio::test(start_paused = true)]
async fn socket_never_appearing_yields_not_ready() {
    let files = InMemoryFiles::new();
    let services = RecordingServiceManager::default();
    let client = ScriptedJailClient::default();

    let report = converge_jail(&files, &services, &client, &NoopReporter)
        .await
        .expect("stage succeeds");

    assert!(!report.ready);
    assert!(!report.diagnostics.socket_present);
}

#[tokio::test]
async fn socket_already_present_is_ready_immediately() {
    let files = files_with_socket();
    assert!(wait_for_socket(&files).await);
}

/// Filesystem whose socket appears only after a number of polls.
struct LateSocket {
    polls: AtomicUsize,
    appear_after: usize,
}

impl HostFiles for LateSocket {
    fn exists(&self, path: &Path) -> bool {
        if path != Path::new(SOCKET_PATH) {
            return false;
        }
        self.polls.fetch_add(1, Ordering::SeqCst) >= self.appear_after
    }

    fn read_to_string(&self, _path: &Path) -> Result<String> {
        anyhow::bail!("not a file")
    }

    fn write(&self, _path: &Path, _content: &str) -> Result<()> {
        Ok(())
    }

    fn append(&self, _path: &Path, _content: &str) -> Result<()> {
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn socket_appearing_mid_poll_is_detected() {
    let files = LateSocket {
        polls: AtomicUsize::new(0),
        appear_after: 5,
    };
    assert!(wait_for_socket(&files).await);
    assert_eq!(files.polls.load(Ordering::SeqCst), 6);
}

#[derive(Default)]
struct NeverReady;

impl HostFiles for NeverReady {
    fn exists(&self, _path: &Path) -> bool {
        false
    }

    fn read_to_string(&self, _path: &Path) -> Result<String> {
        anyhow::bail!("not a file")
    }

    fn write(&self, _path: &Path, _content: &str) -> Result<()> {
        Ok(())
    }

    fn append(&self, _path: &Path, _content: &str) -> Result<()> {
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn poll_gives_up_after_the_budget() {
    let start = tokio::time::Instant::now();
    assert!(!wait_for_socket(&NeverReady).await);
    let elapsed = start.elapsed();
    assert!(elapsed >= std::time::Duration::from_secs(10));
    assert!(elapsed < std::time::Duration::from_secs(11));
}
