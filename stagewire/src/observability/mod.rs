//! Observability utilities.
//!
//! Construction, synthesis and the runner boundary all emit `tracing`
//! events; this module wires up a subscriber for binaries and tests that
//! want to see them.

use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Initializes a global `tracing` subscriber honoring `RUST_LOG`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("stagewire=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Measures wall-clock duration of a construction or synthesis phase.
#[derive(Debug)]
pub struct PhaseTimer {
    phase: &'static str,
    started: Instant,
}

impl PhaseTimer {
    /// Starts timing the given phase.
    #[must_use]
    pub fn start(phase: &'static str) -> Self {
        Self {
            phase,
            started: Instant::now(),
        }
    }

    /// Logs the elapsed time and consumes the timer.
    pub fn finish(self) {
        tracing::debug!(
            phase = self.phase,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "phase complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
    }

    #[test]
    fn test_phase_timer_finishes() {
        let timer = PhaseTimer::start("synth");
        timer.finish();
    }
}
