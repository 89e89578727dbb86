//! apt/dpkg adapter implementing `PackageManager`.

use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, PackageManager};
use crate::infra::command_runner::{TokioCommandRunner, PKG_INSTALL_TIMEOUT};

/// Debian package manager driven through `dpkg-query` and `apt-get`.
///
/// Generic over `R: CommandRunner` so tests can inject a mock runner
/// without spawning real processes.
pub struct AptPackageManager<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> AptPackageManager<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl AptPackageManager<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner() -> Self {
        Self::new(TokioCommandRunner::default())
    }
}

impl<R: CommandRunner> PackageManager for AptPackageManager<R> {
    async fn is_installed(&self, package: &str) -> Result<bool> {
        let output = self
            .runner
            .run("dpkg-query", &["-W", "-f=${Status}", package])
            .await
            .context("failed to run dpkg-query")?;
        // dpkg-query exits non-zero for unknown packages; that simply means
        // "not installed", not an error.
        Ok(output.status.success()
            && String::from_utf8_lossy(&output.stdout).contains("install ok installed"))
    }

    async fn install(&self, packages: &[&str]) -> Result<Output> {
        let mut args = vec!["install", "-y"];
        args.extend_from_slice(packages);
        self.runner
            .run_with_env(
                "apt-get",
                &args,
                &[("DEBIAN_FRONTEND", "noninteractive")],
                PKG_INSTALL_TIMEOUT,
            )
            .await
            .context("failed to run apt-get install")
    }
}
