//! Public SDK surface for layerfig.
//!
//! This crate re-exports the configuration engine and provides a small
//! initialization helper to keep consumer setup consistent.

/// Re-export for convenience.
pub use layerfig_config as config;
pub use layerfig_config::{
    ConfigError, ReadMode, ResolveOptions, configurable, load, resolve_into,
};

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::builder()
            .format_timestamp_millis()
            .parse_default_env()
            .try_init();
    }
}
