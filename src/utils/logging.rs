use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Parses a configured level name, falling back to `INFO`.
pub fn parse_level(level: &str) -> Level {
    match level.trim().to_lowercase().as_str() {
        "warning" => Level::WARN,
        other => Level::from_str(other).unwrap_or(Level::INFO),
    }
}

/// Initialize tracing for the relay.
///
/// `RUST_LOG`, when set, takes precedence over `default_level`. Uses
/// `try_init`, so calling this more than once (tests, the client subcommand)
/// is harmless.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(parse_level(default_level).as_str()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
