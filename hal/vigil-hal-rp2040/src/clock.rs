//! Monotonic clock on the embassy time driver

use embassy_time::Instant;
use vigil_hal::Monotonic;

/// Milliseconds since the time driver started (i.e. since reset)
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Monotonic for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}
