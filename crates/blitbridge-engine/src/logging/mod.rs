//! Logging setup.
//!
//! Everything logs through the `log` facade; this module installs the
//! `env_logger` backend once, early in `main`.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
