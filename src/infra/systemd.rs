//! systemctl adapter implementing `ServiceManager`.

use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ServiceManager};
use crate::infra::command_runner::TokioCommandRunner;

/// Service management through `systemctl`.
pub struct Systemd<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> Systemd<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl Systemd<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner() -> Self {
        Self::new(TokioCommandRunner::default())
    }
}

impl<R: CommandRunner> ServiceManager for Systemd<R> {
    async fn daemon_reload(&self) -> Result<Output> {
        self.runner
            .run("systemctl", &["daemon-reload"])
            .await
            .context("failed to run systemctl daemon-reload")
    }

    async fn enable(&self, unit: &str) -> Result<Output> {
        self.runner
            .run("systemctl", &["enable", unit])
            .await
            .context("failed to run systemctl enable")
    }

    async fn restart(&self, unit: &str) -> Result<Output> {
        self.runner
            .run("systemctl", &["restart", unit])
            .await
            .context("failed to run systemctl restart")
    }
}
