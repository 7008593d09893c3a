//! Tracing subscriber setup for the `contacts` binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str = "contact_book=info,contacts=info,tower_http=info";

/// Install a stderr `fmt` layer. `RUST_LOG` overrides the default filter;
/// `verbose` raises the default to `debug`.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("contact_book=debug,contacts=debug,tower_http=debug")
        } else {
            EnvFilter::new(DEFAULT_LOG_FILTER)
        }
    });

    // a second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .try_init();
}
