//! Tracing setup for the gowork binary.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive that overrides `-v`.
pub const LOG_ENV: &str = "GOWORK_LOG";

pub fn filter_for(verbose: u8) -> String {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    format!("gowork={level}")
}

/// Install a stderr subscriber. Safe to call more than once; later calls are
/// ignored.
pub fn init_tracing(verbose: u8) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(filter_for(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .try_init();
}
