//! `rampart doctor` — diagnostics without touching configuration.

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::application::services::doctor::run_diagnostics;
use crate::output::reporter::{SilentReporter, TerminalReporter};

/// Run the diagnostics pass standalone.
///
/// # Errors
///
/// Returns an error if output serialization fails; all probe failures are
/// reported, never raised.
pub async fn run(ctx: &AppContext) -> Result<()> {
    let report = if ctx.is_json() {
        run_diagnostics(&ctx.files, &ctx.jail, &SilentReporter).await
    } else {
        ctx.output.header("Rampart diagnostics");
        run_diagnostics(&ctx.files, &ctx.jail, &TerminalReporter::new(&ctx.output)).await
    };

    if ctx.is_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("JSON serialization")?
        );
        return Ok(());
    }

    println!();
    if report.socket_present {
        ctx.output.success("control socket present");
    } else {
        ctx.output.error("control socket missing; daemon not serving");
    }

    if let Some(status) = &report.jail_status {
        ctx.output.header("Jail status");
        for line in status.lines() {
            println!("    {line}");
        }
    }

    ctx.output.header("Recent log entries");
    if report.log_tail.is_empty() {
        ctx.output.info("no entries yet");
    } else {
        for line in &report.log_tail {
            println!("    {line}");
        }
    }

    match report.config_test_ok {
        Some(true) => ctx.output.success("configuration self-test passed"),
        Some(false) => ctx.output.warn("configuration self-test failed"),
        None => ctx.output.warn("configuration self-test could not run"),
    }

    for warning in &report.warnings {
        ctx.output.warn(warning);
    }
    Ok(())
}
