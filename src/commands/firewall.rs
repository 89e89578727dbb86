//! `rampart firewall` — converge only the firewall stage.

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::application::services::firewall::converge_firewall;
use crate::commands::outcome_label;
use crate::domain::convergence::Activation;
use crate::output::reporter::{SilentReporter, TerminalReporter};

/// Run the firewall stage standalone.
///
/// # Errors
///
/// Returns an error if output serialization fails; firewall failures are
/// warnings in the report, not errors.
pub async fn run(ctx: &AppContext) -> Result<()> {
    let report = if ctx.is_json() {
        converge_firewall(&ctx.firewall, &SilentReporter).await?
    } else {
        ctx.output.header("Converging firewall");
        converge_firewall(&ctx.firewall, &TerminalReporter::new(&ctx.output)).await?
    };

    if ctx.is_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("JSON serialization")?
        );
        return Ok(());
    }

    println!();
    ctx.output
        .kv("ssh rule  ", outcome_label(report.ssh_rule));
    let activation = match &report.activation {
        Activation::Enabled => "enabled",
        Activation::Reloaded => "reloaded",
        Activation::Failed(_) => "failed",
    };
    ctx.output.kv("activation", activation);
    for warning in &report.warnings {
        ctx.output.warn(warning);
    }
    Ok(())
}
