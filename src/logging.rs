//! Logging initialization
//!
//! Log lines go to stderr so stdout stays reserved for the report.

use tracing_subscriber::EnvFilter;

/// Default level when neither `--verbose` nor `--quiet` is given
pub const DEFAULT_LEVEL: &str = "warn";

/// Pick the fallback filter from the verbosity flags
pub fn level_for(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        DEFAULT_LEVEL
    }
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` is used. Calling this twice is
/// harmless.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
