//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::AppContext;
use crate::commands;

/// Idempotent one-shot hardening for Linux hosts
#[derive(Parser)]
#[command(
    name = "rampart",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run all hardening stages: packages, firewall, SSH, fail2ban
    Harden,

    /// Converge the firewall only
    Firewall,

    /// Apply the SSH hardening drop-in only
    Ssh,

    /// Converge the fail2ban jail only
    Jail,

    /// Run diagnostics without changing anything
    Doctor,

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error only on fatal conditions (required package install
    /// failure, output serialization failure). Tolerated stage failures are
    /// rendered as warnings and exit zero.
    pub async fn run(self) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            command,
        } = self;

        let ctx = AppContext::new(no_color, quiet, json);
        match command {
            Command::Harden => commands::harden::run(&ctx).await,
            Command::Firewall => commands::firewall::run(&ctx).await,
            Command::Ssh => commands::ssh::run(&ctx).await,
            Command::Jail => commands::jail::run(&ctx).await,
            Command::Doctor => commands::doctor::run(&ctx).await,
            Command::Version => commands::version::run(json),
        }
    }
}
