//! Application context — unified state passed to every command handler.
//!
//! `AppContext` bundles the output context and the production adapters so
//! command handlers take one `&AppContext` instead of loose parameters.

use crate::infra::apt::AptPackageManager;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::fail2ban::Fail2banClient;
use crate::infra::files::LocalFiles;
use crate::infra::systemd::Systemd;
use crate::infra::ufw::UfwControl;
use crate::output::OutputContext;

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Package manager adapter.
    pub packages: AptPackageManager<TokioCommandRunner>,
    /// Firewall control adapter.
    pub firewall: UfwControl<TokioCommandRunner>,
    /// Service manager adapter.
    pub services: Systemd<TokioCommandRunner>,
    /// Intrusion-prevention control client adapter.
    pub jail: Fail2banClient<TokioCommandRunner>,
    /// Host filesystem access.
    pub files: LocalFiles,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool, json: bool) -> Self {
        let mode = if json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        Self {
            output: OutputContext::new(no_color, quiet),
            mode,
            packages: AptPackageManager::default_runner(),
            firewall: UfwControl::default_runner(),
            services: Systemd::default_runner(),
            jail: Fail2banClient::default_runner(),
            files: LocalFiles,
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }
}
