//! Logging setup for hosts and tests.
//!
//! The engine only logs through the `log` facade with bracketed component
//! tags (`[LAYOUT]`, `[ANIMATION]`, `[COMPOSER]`, ...). Hosts that do not
//! install their own logger can call [`init_logging`].

use log::LevelFilter;

/// Install `env_logger`, honouring `RUST_LOG` and defaulting to `info`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Info);
    builder.parse_default_env();
    builder.format_timestamp_millis();

    if builder.try_init().is_ok() {
        log::debug!("[LOGGING] Logger initialized");
    }
}
