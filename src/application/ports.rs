//! Port trait definitions for the application layer.
//!
//! Ports are the contracts infrastructure must fulfill. This file imports
//! only from `crate::domain` — never from `crate::infra`, `crate::commands`,
//! or `crate::output`. Production adapters live under `crate::infra`; the
//! unit test suite supplies hand-rolled doubles.

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::firewall::{Direction, Policy};

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output, using the runner's default
    /// timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;

    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds
    /// `timeout`. On timeout, the child process must be killed, not left
    /// orphaned.
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;

    /// Run a program with extra environment variables set, e.g.
    /// `DEBIAN_FRONTEND=noninteractive` for apt.
    async fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        envs: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<Output>;
}

/// System package installation: install-if-missing semantics.
#[allow(async_fn_in_trait)]
pub trait PackageManager {
    /// Whether the package is currently installed.
    async fn is_installed(&self, package: &str) -> Result<bool>;

    /// Install the given packages. The caller inspects the exit status; a
    /// non-zero status is fatal for required packages and tolerated for
    /// optional ones.
    async fn install(&self, packages: &[&str]) -> Result<Output>;
}

/// Firewall control surface.
#[allow(async_fn_in_trait)]
pub trait FirewallControl {
    /// Raw `ufw status verbose` text; parsed by the domain layer.
    async fn status_text(&self) -> Result<String>;

    /// Add an allow rule for a service profile name or `port/proto` target.
    async fn allow(&self, target: &str) -> Result<Output>;

    /// Set a default policy. Naturally idempotent; reissued on every run.
    async fn set_default(&self, direction: Direction, policy: Policy) -> Result<Output>;

    /// Enable the firewall without prompting.
    async fn enable(&self) -> Result<Output>;

    /// Non-destructively reload an already-active firewall.
    async fn reload(&self) -> Result<Output>;
}

/// Service manager (systemd) operations.
#[allow(async_fn_in_trait)]
pub trait ServiceManager {
    /// Reload unit definitions after configuration files changed.
    async fn daemon_reload(&self) -> Result<Output>;

    /// Enable a unit for boot-time start.
    async fn enable(&self, unit: &str) -> Result<Output>;

    /// Restart a unit by name.
    async fn restart(&self, unit: &str) -> Result<Output>;
}

/// Intrusion-prevention control client.
#[allow(async_fn_in_trait)]
pub trait JailClient {
    /// Query the status of one named jail.
    async fn jail_status(&self, jail: &str) -> Result<Output>;

    /// Run the daemon's configuration self-test.
    async fn config_test(&self) -> Result<Output>;
}

/// Host filesystem access for configuration artifacts. Sync trait — the
/// files involved are tiny and the calls are guards, not bulk I/O.
pub trait HostFiles {
    fn exists(&self, path: &Path) -> bool;

    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Overwrite `path` with `content`, creating it if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Append `content` to `path`, creating it if absent. Existing content
    /// must be preserved — the target may be owned by other tooling.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be appended to.
    fn append(&self, path: &Path, content: &str) -> Result<()>;
}

/// Abstracts progress reporting so services can emit step/warn events
/// without depending on the presentation layer. Sync trait — no async
/// needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
