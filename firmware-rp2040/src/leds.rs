//! LED sink.
//!
//! The reference board has no LED strip, so frames are only logged. A
//! frame is logged when it differs from the previous one.

use defmt::debug;
use slider_core::{LedFrame, LedSink};

/// [`LedSink`] that records the last frame and logs changes.
#[derive(Debug, Default)]
pub struct LogLeds {
    last: LedFrame,
    frames: u32,
}

impl LogLeds {
    /// Create a sink with all LEDs off.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: LedFrame::off(),
            frames: 0,
        }
    }

    /// Most recent frame.
    #[must_use]
    pub fn last(&self) -> &LedFrame {
        &self.last
    }

    /// Frames received so far.
    #[must_use]
    pub fn frames(&self) -> u32 {
        self.frames
    }
}

impl LedSink for LogLeds {
    fn show(&mut self, frame: &LedFrame) {
        self.frames = self.frames.wrapping_add(1);
        if *frame != self.last {
            debug!(
                "LED frame #{}: brightness {} first {}",
                self.frames, frame.brightness, frame.colors[0]
            );
            self.last = *frame;
        }
    }
}
