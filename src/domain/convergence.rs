//! Convergence outcomes and per-stage reports.
//!
//! Every stage reads the current declared state, computes what differs from
//! the desired state, applies only that diff, and records the result here.
//! Tolerated failures become entries in a `warnings` list — they never abort
//! the run — so the final report carries the full diagnostic picture even in
//! partial-failure states.

use serde::Serialize;

/// What a convergence step did to one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Desired state already held; nothing was mutated.
    Unchanged,
    /// The resource was mutated to reach desired state.
    Changed,
    /// The step could not be attempted (e.g. missing drop-in directory).
    Skipped,
}

/// How the firewall reached (or failed to reach) its active state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// Was inactive; `enable` was issued.
    Enabled,
    /// Was already active; a non-destructive `reload` was issued instead.
    Reloaded,
    /// Neither worked; carries the failure text.
    Failed(String),
}

/// Package-ensure stage report.
#[derive(Debug, Default, Clone, Serialize)]
pub struct PackagesReport {
    /// Required packages that were already present.
    pub already_present: Vec<String>,
    /// Packages installed by this run.
    pub installed: Vec<String>,
    /// Optional packages whose best-effort install failed.
    pub optional_failed: Vec<String>,
    pub warnings: Vec<String>,
}

/// Firewall convergence report.
#[derive(Debug, Clone, Serialize)]
pub struct FirewallReport {
    /// SSH allow rule: `Unchanged` when already present, `Changed` when
    /// added, `Skipped` when state could not be read.
    pub ssh_rule: Outcome,
    /// Whether both default policies were (re)applied successfully.
    pub defaults_applied: bool,
    pub activation: Activation,
    /// Human-readable rule summary captured after convergence.
    pub summary: Option<String>,
    pub warnings: Vec<String>,
}

/// What happened to the sshd restart after a drop-in rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartOutcome {
    /// Restart succeeded under this unit name.
    Restarted(String),
    /// Every candidate unit name failed.
    Failed,
    /// No restart was needed (drop-in already in place).
    NotNeeded,
}

/// SSH hardening stage report.
#[derive(Debug, Clone, Serialize)]
pub struct SshReport {
    pub drop_in: Outcome,
    pub restart: RestartOutcome,
    pub warnings: Vec<String>,
}

/// Post-configuration diagnostics, run exactly once per invocation.
#[derive(Debug, Default, Clone, Serialize)]
pub struct DiagnosticsReport {
    /// Whether the fail2ban control socket exists.
    pub socket_present: bool,
    /// `fail2ban-client status sshd` output when the socket was present and
    /// the query succeeded.
    pub jail_status: Option<String>,
    /// Recent log lines; empty when the log file does not exist yet.
    pub log_tail: Vec<String>,
    /// Configuration self-test verdict; `None` when the client itself could
    /// not be executed.
    pub config_test_ok: Option<bool>,
    pub warnings: Vec<String>,
}

/// Intrusion-prevention stage report.
#[derive(Debug, Clone, Serialize)]
pub struct JailReport {
    /// Always `Changed` when the write succeeded — the fragment is owned
    /// outright and rewritten every run.
    pub fragment: Outcome,
    /// `Changed` when the backend snippet was appended to `jail.local`.
    pub backend_append: Outcome,
    pub enabled: bool,
    pub restarted: bool,
    /// Definite readiness verdict from the bounded socket poll.
    pub ready: bool,
    pub diagnostics: DiagnosticsReport,
    pub warnings: Vec<String>,
}

/// Full four-stage run report.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub packages: PackagesReport,
    pub firewall: FirewallReport,
    pub ssh: SshReport,
    pub jail: JailReport,
}

impl RunReport {
    /// All tolerated-failure warnings across stages, in run order.
    #[must_use]
    pub fn collect_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        warnings.extend_from_slice(&self.packages.warnings);
        warnings.extend_from_slice(&self.firewall.warnings);
        warnings.extend_from_slice(&self.ssh.warnings);
        warnings.extend_from_slice(&self.jail.warnings);
        warnings.extend_from_slice(&self.jail.diagnostics.warnings);
        warnings
    }

    /// Whether the run mutated anything at all. A second run on a converged
    /// host must report `false` here for everything except the jail fragment,
    /// which is idempotent by overwrite rather than by guard.
    #[must_use]
    pub fn mutated_guarded_state(&self) -> bool {
        self.ssh.drop_in == Outcome::Changed
            || self.firewall.ssh_rule == Outcome::Changed
            || self.jail.backend_append == Outcome::Changed
            || !self.packages.installed.is_empty()
    }
}
