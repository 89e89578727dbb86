//! Firewall convergence stage.
//!
//! Desired state: SSH allow rule present, default deny incoming, default
//! allow outgoing, firewall active. Current state is read once as parsed
//! [`FirewallState`]; each mutation is applied only when the parsed state
//! shows a diff. Default policies are the exception — setting a policy to
//! its current value is a no-op, so they are reissued unconditionally.
//!
//! Every failure in this stage is tolerated: the report carries a warning
//! and the run proceeds.

use anyhow::Result;

use crate::application::ports::{FirewallControl, ProgressReporter};
use crate::application::services::failure_detail;
use crate::domain::convergence::{Activation, FirewallReport, Outcome};
use crate::domain::firewall::{Direction, FirewallState, Policy};

/// ufw application profile for SSH; the fallback when the profile lookup
/// fails is an explicit port rule.
pub const SSH_PROFILE: &str = "OpenSSH";
pub const SSH_PORT_RULE: &str = "22/tcp";

/// Converge the firewall toward desired state.
///
/// # Errors
///
/// Infallible in practice — all firewall failures are downgraded to report
/// warnings. The `Result` stays for signature uniformity across stages.
pub async fn converge_firewall(
    firewall: &impl FirewallControl,
    reporter: &impl ProgressReporter,
) -> Result<FirewallReport> {
    let mut report = FirewallReport {
        ssh_rule: Outcome::Skipped,
        defaults_applied: false,
        activation: Activation::Failed("not attempted".to_string()),
        summary: None,
        warnings: Vec::new(),
    };

    reporter.step("reading firewall state");
    let state = match firewall.status_text().await {
        Ok(text) => FirewallState::parse(&text),
        Err(e) => {
            let msg = format!("cannot read firewall state: {e}");
            reporter.warn(&msg);
            report.warnings.push(msg);
            report.activation = Activation::Failed("state unreadable".to_string());
            return Ok(report);
        }
    };

    ensure_ssh_rule(firewall, reporter, &state, &mut report).await;
    apply_default_policies(firewall, reporter, &mut report).await;
    activate(firewall, reporter, &state, &mut report).await;

    // Diagnostic only — the summary is displayed, never re-parsed.
    if let Ok(text) = firewall.status_text().await {
        report.summary = Some(text);
    }

    Ok(report)
}

async fn ensure_ssh_rule(
    firewall: &impl FirewallControl,
    reporter: &impl ProgressReporter,
    state: &FirewallState,
    report: &mut FirewallReport,
) {
    if state.has_ssh_allow() {
        reporter.success("SSH allow rule already present");
        report.ssh_rule = Outcome::Unchanged;
        return;
    }

    reporter.step("allowing SSH traffic");
    match firewall.allow(SSH_PROFILE).await {
        Ok(output) if output.status.success() => {
            report.ssh_rule = Outcome::Changed;
            return;
        }
        Ok(_) | Err(_) => {
            // Profile lookup failed (no /etc/ufw/applications.d entry);
            // fall back to an explicit port rule.
        }
    }

    match firewall.allow(SSH_PORT_RULE).await {
        Ok(output) if output.status.success() => {
            report.ssh_rule = Outcome::Changed;
        }
        Ok(output) => {
            let msg = format!("cannot add SSH allow rule: {}", failure_detail(&output));
            reporter.warn(&msg);
            report.warnings.push(msg);
        }
        Err(e) => {
            let msg = format!("cannot add SSH allow rule: {e}");
            reporter.warn(&msg);
            report.warnings.push(msg);
        }
    }
}

async fn apply_default_policies(
    firewall: &impl FirewallControl,
    reporter: &impl ProgressReporter,
    report: &mut FirewallReport,
) {
    reporter.step("applying default policies");
    let mut all_ok = true;
    for (direction, policy) in [
        (Direction::Incoming, Policy::Deny),
        (Direction::Outgoing, Policy::Allow),
    ] {
        let applied = match firewall.set_default(direction, policy).await {
            Ok(output) if output.status.success() => true,
            Ok(output) => {
                report.warnings.push(format!(
                    "cannot set default {policy} {}: {}",
                    direction.as_ufw_arg(),
                    failure_detail(&output)
                ));
                false
            }
            Err(e) => {
                report.warnings.push(format!(
                    "cannot set default {policy} {}: {e}",
                    direction.as_ufw_arg()
                ));
                false
            }
        };
        if !applied {
            reporter.warn("default policy not applied");
            all_ok = false;
        }
    }
    report.defaults_applied = all_ok;
}

async fn activate(
    firewall: &impl FirewallControl,
    reporter: &impl ProgressReporter,
    state: &FirewallState,
    report: &mut FirewallReport,
) {
    // `enable` would re-prompt on an already-active firewall; reload instead.
    let result = if state.active {
        reporter.step("reloading active firewall");
        firewall.reload().await
    } else {
        reporter.step("enabling firewall");
        firewall.enable().await
    };

    report.activation = match result {
        Ok(output) if output.status.success() => {
            if state.active {
                Activation::Reloaded
            } else {
                Activation::Enabled
            }
        }
        Ok(output) => {
            let detail = failure_detail(&output);
            let msg = format!("firewall activation failed: {detail}");
            reporter.warn(&msg);
            report.warnings.push(msg);
            Activation::Failed(detail)
        }
        Err(e) => {
            let msg = format!("firewall activation failed: {e}");
            reporter.warn(&msg);
            report.warnings.push(msg);
            Activation::Failed(e.to_string())
        }
    };
}
