//! ufw adapter implementing `FirewallControl`.

use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, FirewallControl};
use crate::domain::firewall::{Direction, Policy};
use crate::infra::command_runner::TokioCommandRunner;

/// Firewall control through the `ufw` CLI.
pub struct UfwControl<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> UfwControl<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl UfwControl<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner() -> Self {
        Self::new(TokioCommandRunner::default())
    }
}

impl<R: CommandRunner> FirewallControl for UfwControl<R> {
    async fn status_text(&self) -> Result<String> {
        let output = self
            .runner
            .run("ufw", &["status", "verbose"])
            .await
            .context("failed to run ufw status")?;
        if !output.status.success() {
            anyhow::bail!(
                "ufw status exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn allow(&self, target: &str) -> Result<Output> {
        self.runner
            .run("ufw", &["allow", target])
            .await
            .context("failed to run ufw allow")
    }

    async fn set_default(&self, direction: Direction, policy: Policy) -> Result<Output> {
        self.runner
            .run(
                "ufw",
                &["default", policy.as_ufw_arg(), direction.as_ufw_arg()],
            )
            .await
            .context("failed to run ufw default")
    }

    async fn enable(&self) -> Result<Output> {
        // --force suppresses the interactive "may disrupt ssh" prompt; the
        // caller only enables when the firewall is inactive.
        self.runner
            .run("ufw", &["--force", "enable"])
            .await
            .context("failed to run ufw enable")
    }

    async fn reload(&self) -> Result<Output> {
        self.runner
            .run("ufw", &["reload"])
            .await
            .context("failed to run ufw reload")
    }
}
