//! Tracing subscriber setup for the command-line binary.
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is not set.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose { "netspend=debug" } else { "netspend=warn" }
}

/// Install a global subscriber that writes to stderr.
///
/// `RUST_LOG` takes precedence over the `verbose` flag. Calling this more than
/// once is harmless; only the first subscriber is kept.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
