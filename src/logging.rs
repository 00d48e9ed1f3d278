//! Tracing subscriber setup
//!
//! Events go to stderr so report tables on stdout stay clean when piped.

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber once per process
///
/// `RUST_LOG` wins when set; otherwise `default_filter` (the settings'
/// `log_filter`) is used, falling back to `info` if it does not parse.
pub fn init_tracing(default_filter: &str) {
    TRACING_INIT.call_once(|| {
        let filter = build_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(), default_filter);

        // A subscriber installed by the embedding application takes precedence
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}

fn build_filter(env_directives: Option<&str>, default_filter: &str) -> EnvFilter {
    env_directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .or_else(|| EnvFilter::try_new(default_filter).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
