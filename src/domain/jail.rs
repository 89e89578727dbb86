//! fail2ban jail definition owned by this tool.
//!
//! The sshd jail fragment is fully owned by rampart and idempotent by
//! overwrite: it is rewritten with the same fixed content on every run.
//! `jail.local` is different — other tooling may own parts of it, so it is
//! only ever appended to, and only when no backend directive exists yet.

/// Fragment path under `jail.d`. The whole file is rewritten every run.
pub const JAIL_FRAGMENT_PATH: &str = "/etc/fail2ban/jail.d/rampart-sshd.local";

/// Global fallback configuration. Never rewritten, only appended to.
pub const JAIL_LOCAL_PATH: &str = "/etc/fail2ban/jail.local";

/// Snippet appended to `jail.local` when it lacks a backend directive.
/// Without a systemd backend default, fail2ban on journald-only hosts fails
/// to start jails whose log files do not exist.
pub const DEFAULT_BACKEND_SNIPPET: &str = "\n[DEFAULT]\nbackend = systemd\n";

/// A fail2ban jail definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JailSpec {
    pub name: &'static str,
    pub enabled: bool,
    pub port: &'static str,
    pub filter: &'static str,
    pub backend: &'static str,
    pub mode: &'static str,
    pub maxretry: u32,
    pub findtime: &'static str,
    pub bantime: &'static str,
}

impl JailSpec {
    /// The sshd jail this tool converges to: 3 failed attempts within a
    /// 10-minute window earn a 24-hour ban, matched aggressively against
    /// the systemd journal.
    #[must_use]
    pub fn sshd() -> Self {
        JailSpec {
            name: "sshd",
            enabled: true,
            port: "ssh",
            filter: "sshd",
            backend: "systemd",
            mode: "aggressive",
            maxretry: 3,
            findtime: "10m",
            bantime: "24h",
        }
    }

    /// Render the jail as an INI fragment.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "[{name}]\n\
             enabled = {enabled}\n\
             port = {port}\n\
             filter = {filter}\n\
             backend = {backend}\n\
             mode = {mode}\n\
             maxretry = {maxretry}\n\
             findtime = {findtime}\n\
             bantime = {bantime}\n",
            name = self.name,
            enabled = self.enabled,
            port = self.port,
            filter = self.filter,
            backend = self.backend,
            mode = self.mode,
            maxretry = self.maxretry,
            findtime = self.findtime,
            bantime = self.bantime,
        )
    }
}

/// Whether existing `jail.local` content already carries a backend directive.
/// Commented-out directives do not count.
#[must_use]
pub fn has_backend_directive(content: &str) -> bool {
    content.lines().any(|line| {
        let line = line.trim();
        !line.starts_with('#')
            && !line.starts_with(';')
            && line
                .split_once('=')
                .is_some_and(|(key, _)| key.trim() == "backend")
    })
}
