pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod form;
pub mod report;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs the global tracing subscriber once. Logs go to stderr so command
/// output on stdout stays machine-readable; `RUST_LOG` overrides the filter.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fincalc=info"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
