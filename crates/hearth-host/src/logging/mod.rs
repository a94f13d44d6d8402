//! Logging setup.
//!
//! The host logs through the `log` facade; module log messages use the
//! `hearth_host::module` target so they can be filtered separately.

mod init;

pub use init::{init_logging, LoggingConfig};
