// Log setup on tracing-subscriber. RUST_LOG overrides the default level.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialise logging for the binary. Defaults to `info`,
/// e.g. `RUST_LOG=bioplan=debug` shows formulation detail.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// Debug-level logging routed through the test harness. Safe to call twice.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
