//! Command implementations — thin handlers over the application services.

pub mod doctor;
pub mod firewall;
pub mod harden;
pub mod jail;
pub mod ssh;
pub mod version;

use crate::domain::convergence::Outcome;

/// Human label for a convergence outcome.
pub(crate) fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Unchanged => "already converged",
        Outcome::Changed => "updated",
        Outcome::Skipped => "skipped",
    }
}
