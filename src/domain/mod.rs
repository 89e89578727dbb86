//! Domain layer — pure types and parsing, no I/O.
//!
//! Nothing in this module imports from `crate::infra`, `crate::commands`,
//! or `crate::output`. All system interaction happens behind the port
//! traits in `crate::application::ports`.

pub mod convergence;
pub mod error;
pub mod firewall;
pub mod jail;
pub mod ssh;
