use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "finance_tracker_core=info";

/// Install a fmt subscriber filtered by `RUST_LOG`
/// (default `finance_tracker_core=info`).
///
/// Safe to call more than once, and a no-op when the host application has
/// already installed its own global subscriber.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        if fmt().with_env_filter(filter).try_init().is_ok() {
            tracing::info!("finance tracker tracing initialized");
        }
    });
}
