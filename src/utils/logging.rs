//! Logging initialization

use tracing_subscriber::EnvFilter;

/// Log level names accepted on the command line and in config
pub const LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Build the filter for `level`. `RUST_LOG` wins when set.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber, writing to stderr.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(level: &str, json: bool) {
    let level = if LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        level.to_ascii_lowercase()
    } else {
        "info".to_string()
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(&level))
        .with_writer(std::io::stderr);

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
