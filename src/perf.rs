//! Performance instrumentation.
//!
//! Contact events arrive at input frame rate, so the handlers carry
//! `profile_scope!` markers. They compile to nothing unless the
//! `profiling` feature is enabled:
//!
//! ```ignore
//! fn handle_contact_move() {
//!     profile_scope!("handle_contact_move");
//!     // ...
//! }
//! ```

use std::time::Instant;
use tracing::{trace, warn};

/// Default warning threshold for a single handler, one 60 FPS frame
pub const TARGET_FRAME_MS: f64 = 16.67;

/// Profile a scope with the given name. Zero-cost when profiling is disabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::new($name, $crate::perf::TARGET_FRAME_MS);
        #[cfg(not(feature = "profiling"))]
        let _ = $name;
    };
    ($name:expr, $threshold_ms:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::new($name, $threshold_ms);
        #[cfg(not(feature = "profiling"))]
        let _ = ($name, $threshold_ms);
    };
}

pub use profile_scope;

/// Times the enclosing scope and logs on drop.
pub struct ScopedTimer {
    name: &'static str,
    start: Instant,
    threshold_ms: f64,
}

impl ScopedTimer {
    pub fn new(name: &'static str, threshold_ms: f64) -> Self {
        Self {
            name,
            start: Instant::now(),
            threshold_ms,
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let elapsed = self.elapsed_ms();
        if elapsed > self.threshold_ms {
            warn!(name = self.name, elapsed_ms = elapsed, "Slow operation");
        } else {
            trace!(name = self.name, elapsed_ms = elapsed, "Timed operation");
        }
    }
}
