//! Dependency-ensure stage: install only what is missing.
//!
//! Required packages are fatal on failure — later stages cannot converge
//! without them. Optional packages are best-effort: a failed install is
//! logged and the run continues.

use anyhow::Result;

use crate::application::ports::{PackageManager, ProgressReporter};
use crate::application::services::failure_detail;
use crate::domain::convergence::PackagesReport;
use crate::domain::error::PackageError;

/// Packages the later stages hard-depend on.
pub const REQUIRED_PACKAGES: [&str; 2] = ["ufw", "fail2ban"];

/// Best-effort packages; a host without them still benefits from the
/// firewall and jail stages.
pub const OPTIONAL_PACKAGES: [&str; 1] = ["openssh-server"];

/// Ensure required and optional packages are present, installing only the
/// missing ones.
///
/// # Errors
///
/// Returns [`PackageError`] when the package database cannot be queried for
/// a required package or when installing required packages fails. This is
/// the only fatal error in the whole run.
pub async fn ensure_packages(
    packages: &impl PackageManager,
    reporter: &impl ProgressReporter,
) -> Result<PackagesReport> {
    let mut report = PackagesReport::default();

    reporter.step("checking required packages");
    let mut missing: Vec<&str> = Vec::new();
    for package in REQUIRED_PACKAGES {
        let installed =
            packages
                .is_installed(package)
                .await
                .map_err(|e| PackageError::QueryFailed {
                    package: package.to_string(),
                    detail: e.to_string(),
                })?;
        if installed {
            report.already_present.push(package.to_string());
        } else {
            missing.push(package);
        }
    }

    if missing.is_empty() {
        reporter.success("required packages already installed");
    } else {
        reporter.step(&format!("installing {}", missing.join(", ")));
        let output = packages
            .install(&missing)
            .await
            .map_err(|e| PackageError::InstallFailed {
                packages: missing.join(", "),
                detail: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(PackageError::InstallFailed {
                packages: missing.join(", "),
                detail: failure_detail(&output),
            }
            .into());
        }
        report.installed.extend(missing.iter().map(ToString::to_string));
        reporter.success("required packages installed");
    }

    for package in OPTIONAL_PACKAGES {
        let installed = packages.is_installed(package).await.unwrap_or(false);
        if installed {
            continue;
        }
        reporter.step(&format!("installing optional package {package}"));
        let ok = match packages.install(&[package]).await {
            Ok(output) if output.status.success() => true,
            Ok(output) => {
                report
                    .warnings
                    .push(format!("optional package {package}: {}", failure_detail(&output)));
                false
            }
            Err(e) => {
                report
                    .warnings
                    .push(format!("optional package {package}: {e}"));
                false
            }
        };
        if ok {
            report.installed.push(package.to_string());
        } else {
            report.optional_failed.push(package.to_string());
            reporter.warn(&format!("optional package {package} not installed"));
        }
    }

    Ok(report)
}
