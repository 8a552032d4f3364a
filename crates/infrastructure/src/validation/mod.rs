//! Configuration validation module
//!
//! Startup checks for application configuration.

pub mod config;

pub use config::{ALLOW_INSECURE_ENV, ConfigValidator, ConfigWarning, WarningSeverity};
