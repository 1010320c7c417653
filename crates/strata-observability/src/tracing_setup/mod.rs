//! Tracing setup: subscriber installation, span macros, structured log events.

pub mod events;
pub mod spans;

use tracing_subscriber::EnvFilter;

use strata_core::config::ObservabilityConfig;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "STRATA_LOG";

/// Install the global subscriber. `STRATA_LOG` wins over the configured
/// level. Calling this twice is harmless: the second install is ignored.
pub fn init_tracing(config: &ObservabilityConfig) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = if config.json_logs {
        builder
            .json()
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .try_init()
    } else {
        builder.try_init()
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Install a subscriber with an explicit filter directive (tests, embedding).
pub fn init_tracing_with_filter(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_test_writer()
        .try_init();
}
