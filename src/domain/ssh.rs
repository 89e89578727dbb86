//! The sshd hardening drop-in fragment.

/// Directory sshd reads supplementary config fragments from. If it does not
/// exist the installed OpenSSH is too old for drop-ins and the stage is
/// skipped rather than guessed at.
pub const DROP_IN_DIR: &str = "/etc/ssh/sshd_config.d";

/// Fixed path of the fragment this tool owns.
pub const DROP_IN_PATH: &str = "/etc/ssh/sshd_config.d/99-rampart.conf";

/// The idempotency marker: a fragment containing this directive (uncommented)
/// is considered already applied and sshd is left alone.
pub const MARKER: &str = "PasswordAuthentication no";

/// Candidate sshd unit names, tried in order. Debian/Ubuntu ship the unit as
/// `ssh`; most other distributions use `sshd`.
pub const SSHD_UNITS: [&str; 2] = ["ssh", "sshd"];

/// Render the drop-in fragment content.
#[must_use]
pub fn render_drop_in() -> String {
    "\
# Managed by rampart; rewritten on every run that finds it missing or stale.
PasswordAuthentication no
KbdInteractiveAuthentication no
PermitRootLogin prohibit-password
"
    .to_string()
}

/// Whether existing fragment content already satisfies the hardening intent.
///
/// Only an uncommented, exact `PasswordAuthentication no` line counts; a
/// commented-out copy of the marker must not suppress the rewrite.
#[must_use]
pub fn is_satisfied_by(content: &str) -> bool {
    content.lines().any(|line| {
        let line = line.trim();
        !line.starts_with('#') && line.split_whitespace().collect::<Vec<_>>().join(" ") == MARKER
    })
}
