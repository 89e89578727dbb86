//! Diagnostics pass tests.

#![allow(clippy::expect_used)]

use rampart_cli::application::services::doctor::{run_diagnostics, LOG_PATH, LOG_TAIL_LINES};
use rampart_cli::application::services::jail::SOCKET_PATH;

use crate::mocks::{InMemoryFiles, NoopReporter, RecordingReporter, ScriptedJailClient};

#[tokio::test]
async fn missing_socket_skips_the_jail_query() {
    let files = InMemoryFiles::new();
    let client = ScriptedJailClient::default();

    let report = run_diagnostics(&files, &client, &NoopReporter).await;

    assert!(!report.socket_present);
    assert!(report.jail_status.is_none());
    assert!(!client.calls().iter().any(|c| c.starts_with("status")));
}

#[tokio::test]
async fn present_socket_yields_jail_status() {
    let files = InMemoryFiles::new().with_file(SOCKET_PATH, "");
    let client = ScriptedJailClient::default()
        .with_status_stdout("Status for the jail: sshd\n|- Filter\n");

    let report = run_diagnostics(&files, &client, &NoopReporter).await;

    assert!(report.socket_present);
    assert_eq!(
        report.jail_status.as_deref(),
        Some("Status for the jail: sshd\n|- Filter")
    );
    assert_eq!(client.calls()[0], "status sshd");
}

#[tokio::test]
async fn failed_jail_query_becomes_a_warning() {
    let files = InMemoryFiles::new().with_file(SOCKET_PATH, "");
    let client = ScriptedJailClient::default().failing_status();

    let report = run_diagnostics(&files, &client, &NoopReporter).await;

    assert!(report.jail_status.is_none());
    assert!(!report.warnings.is_empty());
}

#[tokio::test]
async fn absent_log_file_reads_as_no_entries() {
    let files = InMemoryFiles::new();
    let client = ScriptedJailClient::default();

    let report = run_diagnostics(&files, &client, &NoopReporter).await;

    assert!(report.log_tail.is_empty());
}

#[tokio::test]
async fn log_tail_is_capped_at_the_last_lines() {
    let log: String = (1..=30).map(|i| format!("line {i}\n")).collect();
    let files = InMemoryFiles::new().with_file(LOG_PATH, &log);
    let client = ScriptedJailClient::default();

    let report = run_diagnostics(&files, &client, &NoopReporter).await;

    assert_eq!(report.log_tail.len(), LOG_TAIL_LINES);
    assert_eq!(report.log_tail.first().map(String::as_str), Some("line 11"));
    assert_eq!(report.log_tail.last().map(String::as_str), Some("line 30"));
}

#[tokio::test]
async fn short_log_is_carried_whole() {
    let files = InMemoryFiles::new().with_file(LOG_PATH, "only line\n");
    let client = ScriptedJailClient::default();

    let report = run_diagnostics(&files, &client, &NoopReporter).await;

    assert_eq!(report.log_tail, vec!["only line"]);
}

#[tokio::test]
async fn failed_self_test_points_at_the_journal() {
    let files = InMemoryFiles::new();
    let client = ScriptedJailClient::default().failing_config_test();
    let reporter = RecordingReporter::default();

    let report = run_diagnostics(&files, &client, &reporter).await;

    assert_eq!(report.config_test_ok, Some(false));
    assert!(report
        .warnings
        .iter()
        .any(|w| w.contains("system journal")));
}

#[tokio::test]
async fn passing_self_test_is_recorded() {
    let files = InMemoryFiles::new();
    let client = ScriptedJailClient::default();

    let report = run_diagnostics(&files, &client, &NoopReporter).await;

    assert_eq!(report.config_test_ok, Some(true));
}
