#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Session clock driving time-based brush uniforms.
#[derive(Debug, Clone)]
pub struct Timer {
    start_time: Instant,
    /// Total elapsed time as of the last tick
    pub elapsed: Duration,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Creates a new timer starting from now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed: Duration::ZERO,
        }
    }

    /// A timer frozen at `elapsed`, for replay and tests.
    #[must_use]
    pub fn at(elapsed: Duration) -> Self {
        Self {
            elapsed,
            ..Self::new()
        }
    }

    /// Advances the clock; call once per frame.
    pub fn tick(&mut self) {
        self.elapsed = self.start_time.elapsed();
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}
