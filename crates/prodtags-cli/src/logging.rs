//! Log subscriber setup for the `tags` binary.
//!
//! Library crates log through `log`; the fmt subscriber picks those records
//! up through its `tracing-log` bridge. Output goes to stderr so stdout
//! stays parseable.

use tracing_subscriber::EnvFilter;

/// Filter directive from `-v` count and the configured level.
///
/// `RUST_LOG`, when set, takes precedence over both (see [`init`]).
pub fn filter_directive(verbose: u8, config_level: &str) -> String {
    match verbose {
        0 if config_level.trim().is_empty() => "warn".to_string(),
        0 => config_level.trim().to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber.
pub fn init(verbose: u8, config_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbose, config_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
