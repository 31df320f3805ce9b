//! Microsecond clock backed by the embassy time driver.

use embassy_time::Instant;
use slider_core::Clock;

/// [`Clock`] reading the embassy-rp timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    #[inline]
    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }
}
