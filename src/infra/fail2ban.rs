//! fail2ban-client adapter implementing `JailClient`.

use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, JailClient};
use crate::infra::command_runner::TokioCommandRunner;

/// Control-client queries through `fail2ban-client`.
pub struct Fail2banClient<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> Fail2banClient<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl Fail2banClient<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner() -> Self {
        Self::new(TokioCommandRunner::default())
    }
}

impl<R: CommandRunner> JailClient for Fail2banClient<R> {
    async fn jail_status(&self, jail: &str) -> Result<Output> {
        self.runner
            .run("fail2ban-client", &["status", jail])
            .await
            .context("failed to run fail2ban-client status")
    }

    async fn config_test(&self) -> Result<Output> {
        self.runner
            .run("fail2ban-client", &["-t"])
            .await
            .context("failed to run fail2ban-client -t")
    }
}
