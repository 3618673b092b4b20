//! Logging utilities.
//!
//! The engine logs through the `log` facade only; `init_logging` installs
//! `env_logger` for binaries that want it.

mod init;

pub use init::{LoggingConfig, init_logging};
