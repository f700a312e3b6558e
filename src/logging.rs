//! Logging setup.
//!
//! The library only emits `tracing` events. Hosts that want them printed
//! call [`init`] once at startup; the filter comes from `GLYPHBOARD_LOG`
//! and defaults to `glyphboard=info`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "GLYPHBOARD_LOG";

const DEFAULT_FILTER: &str = "glyphboard=info";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a formatting subscriber. Calling it again is harmless.
pub fn init() {
    let _ = tracing_subscriber::fmt().with_env_filter(filter()).try_init();
}

/// Subscriber for tests: output goes through the test harness capture.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_test_writer()
        .try_init();
}
