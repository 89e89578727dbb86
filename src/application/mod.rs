//! Application layer — stage services and the port traits they depend on.

pub mod ports;
pub mod services;
