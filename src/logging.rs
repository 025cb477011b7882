//! Logging setup for the provider binary.
//!
//! All logs go to **stderr**: stdout carries the plugin handshake and
//! must stay clean. Filtering follows `RUST_LOG`, e.g.
//! `RUST_LOG=hemmer_provider_radarr=debug`.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subscriber.
///
/// Respects `RUST_LOG`, defaulting to `info`. Panics if a global
/// subscriber has already been set.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .init();
}

/// Try to initialize logging, returning false if already initialized.
///
/// Useful in tests, where multiple cases may race to set the subscriber.
pub fn try_init_logging() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_parsing() {
        assert!(EnvFilter::try_new("info").is_ok());
        assert!(EnvFilter::try_new("hemmer_provider_radarr=debug").is_ok());
        assert!(EnvFilter::try_new("warn,hemmer_provider_radarr=debug").is_ok());
    }
}
