//! Tracing initialization

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding per-crate log levels,
/// e.g. `BRACKET_LOG=bracket_core=debug,tournament=info`
pub const LOG_ENV: &str = "BRACKET_LOG";

pub const DEFAULT_FILTER: &str = "tournament=info,bracket_core=info";

/// Initialize logging to stderr. `verbose` raises the default level to debug.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let fallback = if verbose {
            "tournament=debug,bracket_core=debug"
        } else {
            DEFAULT_FILTER
        };
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}
