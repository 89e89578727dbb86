//! Application services — one per hardening stage.
//!
//! Services import only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits, which is what makes the
//! idempotency guards unit-testable without touching a real host.

pub mod doctor;
pub mod firewall;
pub mod jail;
pub mod packages;
pub mod ssh_hardening;

use std::process::Output;

/// Stringify a failed `Output` for a warning message: exit status plus
/// whatever stderr the tool produced.
pub(crate) fn failure_detail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("exit status {}", output.status)
    } else {
        format!("exit status {}: {stderr}", output.status)
    }
}
