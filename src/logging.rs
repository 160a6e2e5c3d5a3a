//! Logging setup for the mp3-merge binary.
//!
//! Logs go to stderr so stdout stays free for progress lines and JSON reports.
//! The library itself only emits `tracing` events and never installs a
//! subscriber.

use tracing_subscriber::EnvFilter;

/// Returns the filter directive for a `-v` count.
pub fn verbosity_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "mp3_merge=warn",
        1 => "mp3_merge=info",
        2 => "mp3_merge=debug",
        _ => "mp3_merge=trace",
    }
}

/// Picks the filter: `RUST_LOG`, then the configured filter, then verbosity.
pub fn resolve_filter(rust_log: Option<String>, configured: Option<&str>, verbose: u8) -> String {
    rust_log
        .filter(|f| !f.trim().is_empty())
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_else(|| verbosity_filter(verbose).to_string())
}

/// Installs the global stderr subscriber.
///
/// An unparsable filter falls back to the verbosity default. Calling this more
/// than once leaves the first subscriber in place.
pub fn init_logging(configured: Option<&str>, verbose: u8) {
    let directive = resolve_filter(std::env::var("RUST_LOG").ok(), configured, verbose);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("Warning: invalid log filter {:?}: {}", directive, e);
        EnvFilter::new(verbosity_filter(verbose))
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
