//! Diagnostic logging to stderr.

use tracing_subscriber::EnvFilter;

/// Environment variable overriding the CLI verbosity, in `EnvFilter` syntax.
pub const LOG_ENV: &str = "PACKDOC_LOG";

/// Filter directive for a `-v` count.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "packdoc=warn",
        1 => "packdoc=info",
        2 => "packdoc=debug",
        _ => "packdoc=trace",
    }
}

/// Installs the global subscriber. Later calls are ignored.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
