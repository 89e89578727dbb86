//! Infrastructure adapters — production implementations of the port traits.

pub mod apt;
pub mod command_runner;
pub mod fail2ban;
pub mod files;
pub mod systemd;
pub mod ufw;
