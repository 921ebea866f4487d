//! Logger setup over the `log` facade.
//!
//! GL error reports are emitted under [`crate::device::LOG_TARGET`].

mod init;

pub use init::{LoggingConfig, init_logging};
