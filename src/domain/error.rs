//! Typed domain error enums.
//!
//! Only package-ensure failures are fatal to a run; everything else is
//! downgraded to a warning in the stage report. These types implement
//! `thiserror::Error` and convert to `anyhow::Error` via `?`.

use thiserror::Error;

/// Errors from the mandatory package-ensure stage. These abort the run —
/// without ufw and fail2ban installed the later stages cannot converge.
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("package manager failed installing {packages}: {detail}")]
    InstallFailed { packages: String, detail: String },

    #[error("cannot query package database for '{package}': {detail}")]
    QueryFailed { package: String, detail: String },
}
