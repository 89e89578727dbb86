//! SSH hardening stage.
//!
//! Writes a drop-in fragment disabling password authentication, then
//! restarts sshd — but only when something actually changed. A restart can
//! drop the operator's own connection, so a re-run against an already
//! hardened host must be a strict no-op.

use std::path::Path;

use anyhow::Result;

use crate::application::ports::{HostFiles, ProgressReporter, ServiceManager};
use crate::application::services::failure_detail;
use crate::domain::convergence::{Outcome, RestartOutcome, SshReport};
use crate::domain::ssh::{self, DROP_IN_DIR, DROP_IN_PATH, SSHD_UNITS};

/// Ensure the hardening drop-in is applied.
///
/// Guard: write and restart only when the drop-in directory exists AND (the
/// fragment is absent OR it lacks the uncommented marker directive).
///
/// # Errors
///
/// Infallible in practice — failures in this stage (including a restart that
/// fails under every candidate unit name) are surfaced as report warnings.
pub async fn harden_ssh(
    files: &impl HostFiles,
    services: &impl ServiceManager,
    reporter: &impl ProgressReporter,
) -> Result<SshReport> {
    let mut report = SshReport {
        drop_in: Outcome::Skipped,
        restart: RestartOutcome::NotNeeded,
        warnings: Vec::new(),
    };

    if !files.exists(Path::new(DROP_IN_DIR)) {
        let msg = format!("{DROP_IN_DIR} does not exist; sshd has no drop-in support");
        reporter.warn(&msg);
        report.warnings.push(msg);
        return Ok(report);
    }

    let drop_in = Path::new(DROP_IN_PATH);
    let satisfied = files.exists(drop_in)
        && files
            .read_to_string(drop_in)
            .is_ok_and(|content| ssh::is_satisfied_by(&content));

    if satisfied {
        reporter.success("SSH drop-in already applied");
        report.drop_in = Outcome::Unchanged;
        return Ok(report);
    }

    reporter.step("writing SSH hardening drop-in");
    if let Err(e) = files.write(drop_in, &ssh::render_drop_in()) {
        let msg = format!("cannot write {DROP_IN_PATH}: {e}");
        reporter.warn(&msg);
        report.warnings.push(msg);
        return Ok(report);
    }
    report.drop_in = Outcome::Changed;

    report.restart = restart_sshd(services, reporter, &mut report.warnings).await;
    Ok(report)
}

/// Restart sshd under the first unit name that works. Debian calls the unit
/// `ssh`, most other distributions `sshd` — first success wins.
async fn restart_sshd(
    services: &impl ServiceManager,
    reporter: &impl ProgressReporter,
    warnings: &mut Vec<String>,
) -> RestartOutcome {
    reporter.step("restarting SSH daemon");
    for unit in SSHD_UNITS {
        match services.restart(unit).await {
            Ok(output) if output.status.success() => {
                reporter.success(&format!("restarted {unit}"));
                return RestartOutcome::Restarted(unit.to_string());
            }
            Ok(output) => {
                warnings.push(format!("restart {unit}: {}", failure_detail(&output)));
            }
            Err(e) => {
                warnings.push(format!("restart {unit}: {e}"));
            }
        }
    }
    reporter.warn("SSH daemon restart failed under every candidate unit name");
    RestartOutcome::Failed
}
