//! Application configuration
//!
//! Runtime settings consumed by the use cases. Built from the file
//! configuration by the infrastructure layer and adjusted by CLI flags.

mod client_config;

pub use client_config::{ClientConfig, DEFAULT_STATUS_INTERVAL};
