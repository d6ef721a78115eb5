//! Log subscriber setup

use tracing_subscriber::EnvFilter;

use crate::LoggingConfig;

/// Environment variable holding a filter directive that overrides the config
pub const LOG_ENV: &str = "MERIDIAN_LOG";

/// Install the global subscriber.
///
/// Returns false when a subscriber was already installed.
pub fn init(config: &LoggingConfig) -> bool {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.is_ok()
}
