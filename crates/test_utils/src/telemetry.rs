//! Tracing initialization for tests
//!
//! Installs a compact subscriber once per process. Tests call this at the
//! top and get `RUST_LOG`-controlled output without double-init panics.

use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

static TRACING: Lazy<()> = Lazy::new(|| {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .compact()
        .init();
});

/// Initializes the test tracing subscriber exactly once
pub fn init_test_tracing() {
    Lazy::force(&TRACING);
}
