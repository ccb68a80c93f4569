//! Logging setup.
//!
//! Everything goes to stderr so stdout carries only the report. `RUST_LOG`
//! takes precedence over the verbosity flag.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT_ONCE: Once = Once::new();

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "rds_snapshot_info=debug"
    } else {
        "rds_snapshot_info=warn"
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbose: bool) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

        // another subscriber may already be installed by an embedding host
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
