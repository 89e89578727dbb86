//! `rampart jail` — converge only the intrusion-prevention stage.

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::application::services::jail::converge_jail;
use crate::commands::outcome_label;
use crate::output::reporter::{SilentReporter, TerminalReporter};

/// Run the jail stage standalone (includes diagnostics).
///
/// # Errors
///
/// Returns an error if output serialization fails.
pub async fn run(ctx: &AppContext) -> Result<()> {
    let report = if ctx.is_json() {
        converge_jail(&ctx.files, &ctx.services, &ctx.jail, &SilentReporter).await?
    } else {
        ctx.output.header("Converging fail2ban");
        converge_jail(
            &ctx.files,
            &ctx.services,
            &ctx.jail,
            &TerminalReporter::new(&ctx.output),
        )
        .await?
    };

    if ctx.is_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("JSON serialization")?
        );
        return Ok(());
    }

    println!();
    ctx.output.kv("jail fragment ", outcome_label(report.fragment));
    ctx.output
        .kv("backend append", outcome_label(report.backend_append));
    ctx.output.kv(
        "daemon        ",
        if report.ready { "ready" } else { "not ready" },
    );
    if let Some(status) = &report.diagnostics.jail_status {
        println!();
        ctx.output.header("Jail status");
        for line in status.lines() {
            println!("    {line}");
        }
    }
    for warning in report
        .warnings
        .iter()
        .chain(report.diagnostics.warnings.iter())
    {
        ctx.output.warn(warning);
    }
    Ok(())
}
