//! Logging configuration
//!
//! Diagnostics go to stderr; stdout belongs to the countdown display.
//! `RUST_LOG` takes precedence over `--verbose`.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Filter used when `RUST_LOG` is not set
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "minimal_timer=debug,timer=debug"
    } else {
        "warn"
    }
}

fn build_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Install the global subscriber
///
/// Calling this twice (as tests may) leaves the first subscriber in place.
pub fn init(verbose: bool) {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_span_events(FmtSpan::NONE);

    let _ = tracing_subscriber::registry()
        .with(build_filter(verbose))
        .with(stderr_layer)
        .try_init();
}
