//! Post-configuration diagnostics.
//!
//! One pass, always completed: socket presence, jail status query, recent
//! log lines, configuration self-test. Nothing here can fail the run — a
//! missing log file is "no entries yet", a failed self-test becomes a hint
//! to inspect the system journal.

use std::path::Path;

use crate::application::ports::{HostFiles, JailClient, ProgressReporter};
use crate::application::services::failure_detail;
use crate::application::services::jail::SOCKET_PATH;
use crate::domain::convergence::DiagnosticsReport;

/// fail2ban's default log file. Hosts running a pure journald setup never
/// create it, which is normal and reported as such.
pub const LOG_PATH: &str = "/var/log/fail2ban.log";

/// How many trailing log lines the report carries.
pub const LOG_TAIL_LINES: usize = 20;

const SSHD_JAIL: &str = "sshd";

/// Run the diagnostics pass.
pub async fn run_diagnostics(
    files: &impl HostFiles,
    client: &impl JailClient,
    reporter: &impl ProgressReporter,
) -> DiagnosticsReport {
    let mut report = DiagnosticsReport::default();

    reporter.step("running diagnostics");
    report.socket_present = files.exists(Path::new(SOCKET_PATH));

    if report.socket_present {
        match client.jail_status(SSHD_JAIL).await {
            Ok(output) if output.status.success() => {
                report.jail_status =
                    Some(String::from_utf8_lossy(&output.stdout).trim().to_string());
            }
            Ok(output) => {
                let msg = format!("jail status query: {}", failure_detail(&output));
                reporter.warn(&msg);
                report.warnings.push(msg);
            }
            Err(e) => {
                let msg = format!("jail status query: {e}");
                reporter.warn(&msg);
                report.warnings.push(msg);
            }
        }
    } else {
        reporter.warn("control socket missing; daemon is not serving");
    }

    match files.read_to_string(Path::new(LOG_PATH)) {
        Ok(content) => {
            let lines: Vec<&str> = content.lines().collect();
            let start = lines.len().saturating_sub(LOG_TAIL_LINES);
            report.log_tail = lines[start..].iter().map(ToString::to_string).collect();
        }
        Err(_) => {
            // Absent log file is expected on journald-backed hosts.
            report.log_tail = Vec::new();
        }
    }

    match client.config_test().await {
        Ok(output) => {
            let ok = output.status.success();
            report.config_test_ok = Some(ok);
            if !ok {
                let msg = format!(
                    "config self-test failed ({}); inspect the system journal",
                    failure_detail(&output)
                );
                reporter.warn(&msg);
                report.warnings.push(msg);
            }
        }
        Err(e) => {
            let msg = format!("config self-test could not run: {e}");
            reporter.warn(&msg);
            report.warnings.push(msg);
        }
    }

    report
}
