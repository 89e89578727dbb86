//! Intrusion-prevention stage: fail2ban jail convergence.
//!
//! The sshd jail fragment is rewritten unconditionally every run — the file
//! is owned outright, so overwrite is the idempotency mechanism. The global
//! `jail.local` is the opposite: it may be owned or extended by other
//! tooling, so it only ever receives a single conditional append.
//!
//! After configuration the daemon is enabled and restarted (both tolerated
//! on failure), readiness is awaited by polling for the control socket up to
//! a bounded timeout, and diagnostics run exactly once regardless of how the
//! restart went.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::{HostFiles, JailClient, ProgressReporter, ServiceManager};
use crate::application::services::doctor::run_diagnostics;
use crate::application::services::failure_detail;
use crate::domain::convergence::{JailReport, Outcome};
use crate::domain::jail::{
    has_backend_directive, JailSpec, DEFAULT_BACKEND_SNIPPET, JAIL_FRAGMENT_PATH, JAIL_LOCAL_PATH,
};

/// Control socket the daemon creates once it is serving.
pub const SOCKET_PATH: &str = "/var/run/fail2ban/fail2ban.sock";

/// Socket poll cadence and budget. The service manager returns before the
/// daemon finishes initializing its socket, so readiness is polled rather
/// than assumed; the bound keeps a wedged daemon from stalling the run.
pub const SOCKET_POLL_INTERVAL: Duration = Duration::from_millis(250);
pub const SOCKET_POLL_TIMEOUT: Duration = Duration::from_secs(10);

const DAEMON_UNIT: &str = "fail2ban";

/// Converge the fail2ban configuration, restart the daemon, await readiness,
/// and run diagnostics.
///
/// # Errors
///
/// Infallible in practice — every failure in this stage is tolerated and
/// carried in the report so diagnostics always run to completion.
pub async fn converge_jail(
    files: &impl HostFiles,
    services: &impl ServiceManager,
    client: &impl JailClient,
    reporter: &impl ProgressReporter,
) -> Result<JailReport> {
    let mut report = JailReport {
        fragment: Outcome::Skipped,
        backend_append: Outcome::Unchanged,
        enabled: false,
        restarted: false,
        ready: false,
        diagnostics: crate::domain::convergence::DiagnosticsReport::default(),
        warnings: Vec::new(),
    };

    reporter.step("writing sshd jail definition");
    match files.write(Path::new(JAIL_FRAGMENT_PATH), &JailSpec::sshd().render()) {
        Ok(()) => report.fragment = Outcome::Changed,
        Err(e) => {
            let msg = format!("cannot write {JAIL_FRAGMENT_PATH}: {e}");
            reporter.warn(&msg);
            report.warnings.push(msg);
        }
    }

    ensure_backend_fallback(files, reporter, &mut report);
    restart_daemon(services, reporter, &mut report).await;

    report.ready = wait_for_socket(files).await;
    if report.ready {
        reporter.success("fail2ban control socket is up");
    } else {
        reporter.warn("fail2ban control socket did not appear within the timeout");
    }

    report.diagnostics = run_diagnostics(files, client, reporter).await;
    Ok(report)
}

/// Append a `[DEFAULT]` backend directive to `jail.local` when none exists.
/// Append, never overwrite — existing content belongs to someone else.
fn ensure_backend_fallback(
    files: &impl HostFiles,
    reporter: &impl ProgressReporter,
    report: &mut JailReport,
) {
    let jail_local = Path::new(JAIL_LOCAL_PATH);
    let has_backend = files.exists(jail_local)
        && files
            .read_to_string(jail_local)
            .is_ok_and(|content| has_backend_directive(&content));
    if has_backend {
        report.backend_append = Outcome::Unchanged;
        return;
    }

    reporter.step("appending default backend to jail.local");
    match files.append(jail_local, DEFAULT_BACKEND_SNIPPET) {
        Ok(()) => report.backend_append = Outcome::Changed,
        Err(e) => {
            let msg = format!("cannot append to {JAIL_LOCAL_PATH}: {e}");
            reporter.warn(&msg);
            report.warnings.push(msg);
            report.backend_append = Outcome::Skipped;
        }
    }
}

async fn restart_daemon(
    services: &impl ServiceManager,
    reporter: &impl ProgressReporter,
    report: &mut JailReport,
) {
    reporter.step("reloading unit definitions");
    if let Err(e) = services.daemon_reload().await {
        let msg = format!("daemon-reload: {e}");
        reporter.warn(&msg);
        report.warnings.push(msg);
    }

    reporter.step("enabling fail2ban");
    match services.enable(DAEMON_UNIT).await {
        Ok(output) if output.status.success() => report.enabled = true,
        Ok(output) => {
            let msg = format!("enable {DAEMON_UNIT}: {}", failure_detail(&output));
            reporter.warn(&msg);
            report.warnings.push(msg);
        }
        Err(e) => {
            let msg = format!("enable {DAEMON_UNIT}: {e}");
            reporter.warn(&msg);
            report.warnings.push(msg);
        }
    }

    reporter.step("restarting fail2ban");
    match services.restart(DAEMON_UNIT).await {
        Ok(output) if output.status.success() => report.restarted = true,
        Ok(output) => {
            let msg = format!("restart {DAEMON_UNIT}: {}", failure_detail(&output));
            reporter.warn(&msg);
            report.warnings.push(msg);
        }
        Err(e) => {
            let msg = format!("restart {DAEMON_UNIT}: {e}");
            reporter.warn(&msg);
            report.warnings.push(msg);
        }
    }
}

/// Poll for the control socket up to [`SOCKET_POLL_TIMEOUT`]. Returns a
/// definite ready / not-ready verdict.
pub async fn wait_for_socket(files: &impl HostFiles) -> bool {
    let socket = Path::new(SOCKET_PATH);
    let deadline = tokio::time::Instant::now() + SOCKET_POLL_TIMEOUT;
    loop {
        if files.exists(socket) {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(SOCKET_POLL_INTERVAL).await;
    }
}
