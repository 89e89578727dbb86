//! `rampart ssh` — converge only the SSH hardening stage.

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::application::services::ssh_hardening::harden_ssh;
use crate::commands::outcome_label;
use crate::domain::convergence::RestartOutcome;
use crate::output::reporter::{SilentReporter, TerminalReporter};

/// Run the SSH hardening stage standalone.
///
/// # Errors
///
/// Returns an error if output serialization fails.
pub async fn run(ctx: &AppContext) -> Result<()> {
    let report = if ctx.is_json() {
        harden_ssh(&ctx.files, &ctx.services, &SilentReporter).await?
    } else {
        ctx.output.header("Hardening SSH");
        harden_ssh(&ctx.files, &ctx.services, &TerminalReporter::new(&ctx.output)).await?
    };

    if ctx.is_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("JSON serialization")?
        );
        return Ok(());
    }

    println!();
    ctx.output.kv("drop-in", outcome_label(report.drop_in));
    let restart = match &report.restart {
        RestartOutcome::Restarted(unit) => format!("restarted {unit}"),
        RestartOutcome::Failed => "failed".to_string(),
        RestartOutcome::NotNeeded => "not needed".to_string(),
    };
    ctx.output.kv("restart", &restart);
    for warning in &report.warnings {
        ctx.output.warn(warning);
    }
    Ok(())
}
