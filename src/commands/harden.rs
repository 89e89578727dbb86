//! `rampart harden` — the full four-stage hardening run.

use anyhow::{Context, Result};
use owo_colors::OwoColorize as _;

use crate::app::AppContext;
use crate::application::services::{firewall, jail, packages, ssh_hardening};
use crate::commands::outcome_label;
use crate::domain::convergence::{Activation, RestartOutcome, RunReport};
use crate::output::reporter::{SilentReporter, TerminalReporter};

/// Run all four stages in order: packages → firewall → ssh → jail.
///
/// # Errors
///
/// Returns an error only when required package installation fails — the one
/// fatal condition. Every other failure lands in the report as a warning.
pub async fn run(ctx: &AppContext) -> Result<()> {
    let report = if ctx.is_json() {
        execute(ctx, &SilentReporter).await?
    } else {
        ctx.output.header("Hardening host");
        execute(ctx, &TerminalReporter::new(&ctx.output)).await?
    };

    if ctx.is_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("JSON serialization")?
        );
        return Ok(());
    }

    render_summary(ctx, &report);
    Ok(())
}

async fn execute(
    ctx: &AppContext,
    reporter: &impl crate::application::ports::ProgressReporter,
) -> Result<RunReport> {
    // Stage 1 is the only stage allowed to abort the run.
    let packages = packages::ensure_packages(&ctx.packages, reporter).await?;
    let firewall = firewall::converge_firewall(&ctx.firewall, reporter).await?;
    let ssh = ssh_hardening::harden_ssh(&ctx.files, &ctx.services, reporter).await?;
    let jail = jail::converge_jail(&ctx.files, &ctx.services, &ctx.jail, reporter).await?;
    Ok(RunReport {
        packages,
        firewall,
        ssh,
        jail,
    })
}

fn render_summary(ctx: &AppContext, report: &RunReport) {
    println!();
    ctx.output.header("Summary");

    let installed = if report.packages.installed.is_empty() {
        "none needed".to_string()
    } else {
        report.packages.installed.join(", ")
    };
    ctx.output.kv("packages installed ", &installed);

    let activation = match &report.firewall.activation {
        Activation::Enabled => "enabled".to_string(),
        Activation::Reloaded => "reloaded".to_string(),
        Activation::Failed(detail) => format!("FAILED ({detail})"),
    };
    ctx.output.kv(
        "firewall           ",
        &format!(
            "{activation}; SSH rule {}",
            outcome_label(report.firewall.ssh_rule)
        ),
    );

    let restart = match &report.ssh.restart {
        RestartOutcome::Restarted(unit) => format!("restarted {unit}"),
        RestartOutcome::Failed => "restart FAILED".to_string(),
        RestartOutcome::NotNeeded => "no restart needed".to_string(),
    };
    ctx.output.kv(
        "ssh drop-in        ",
        &format!("{}; {restart}", outcome_label(report.ssh.drop_in)),
    );

    ctx.output.kv(
        "fail2ban           ",
        &format!(
            "jail {}; daemon {}",
            outcome_label(report.jail.fragment),
            if report.jail.ready {
                "ready"
            } else {
                "not ready"
            }
        ),
    );

    if let Some(summary) = &report.firewall.summary {
        println!();
        ctx.output.header("Firewall rules");
        for line in summary.lines() {
            println!("    {}", line.style(ctx.output.styles.dim));
        }
    }

    let warnings = report.collect_warnings();
    println!();
    if warnings.is_empty() {
        ctx.output.success("host converged with no warnings");
    } else {
        ctx.output
            .warn(&format!("completed with {} warning(s):", warnings.len()));
        for warning in &warnings {
            println!("      {} {warning}", "-".style(ctx.output.styles.dim));
        }
    }
}
