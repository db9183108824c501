//! Logging setup for the binary. The library only emits `tracing` events.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize stderr logging. RUST_LOG wins, then --verbose, then the configured level.
pub fn init_logging(verbose: bool, level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
        }
    });

    let fmt_layer = fmt::layer()
        .with_target(verbose)
        .with_writer(std::io::stderr);

    // a subscriber may already be set (tests, embedding applications)
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
