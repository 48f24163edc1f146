//! Tracing setup for the `unovadex` binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

// The binary target is `unovadex`, so events from main.rs and its modules
// use that target rather than the package name.
const DEFAULT_LOG_FILTER: &str = "unovadex_core=info,unovadex=info";
const VERBOSE_LOG_FILTER: &str = "unovadex_core=debug,unovadex=debug";

/// Initialize tracing with stderr output.
///
/// `RUST_LOG` wins over the defaults; `verbose` only swaps the default.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filters_parse() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
        assert!(EnvFilter::try_new(VERBOSE_LOG_FILTER).is_ok());
    }
}
