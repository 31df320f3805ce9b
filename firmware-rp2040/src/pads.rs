//! GPIO touch pads.
//!
//! The reference board replaces the capacitive sensor with sixteen
//! momentary pads, one per pair of protocol keys. A pressed pad (pin pulled
//! low) drives every raw electrode behind its two keys to full pressure, so
//! the board's key map merges them back into the right report slots.
//!
//! # Pins
//!
//! GPIO 0-15, pad `n` covering protocol keys `2n` and `2n + 1`.

use embassy_rp::gpio::Input;
use slider_core::board::RAW_KEY_COUNT;
use slider_core::{SliderDef, TouchSensor};

/// Pads wired to the board.
pub const PAD_COUNT: usize = 16;

/// Pressure reported for a pressed pad.
pub const PRESSED: u8 = 0xFE;

/// [`TouchSensor`] over active-low GPIO pads.
pub struct GpioPads<'d> {
    pads: [Input<'d>; PAD_COUNT],
    def: &'static SliderDef,
}

impl<'d> GpioPads<'d> {
    /// Create the sensor. Pins should be configured with a pull-up.
    #[must_use]
    pub fn new(pads: [Input<'d>; PAD_COUNT], def: &'static SliderDef) -> Self {
        Self { pads, def }
    }

    /// Bitmask of pressed pads, bit `n` for pad `n`.
    #[must_use]
    pub fn pressed_mask(&self) -> u16 {
        self.pads
            .iter()
            .enumerate()
            .filter(|(_, pad)| pad.is_low())
            .fold(0, |mask, (n, _)| mask | (1 << n))
    }
}

impl TouchSensor for GpioPads<'_> {
    fn read(&mut self, raw: &mut [u8; RAW_KEY_COUNT]) {
        raw.fill(0);
        let mask = self.pressed_mask();
        let keys = self.def.key_count as usize;
        for pad in (0..PAD_COUNT).filter(|n| mask & (1 << n) != 0) {
            for key in [2 * pad, 2 * pad + 1].into_iter().filter(|&k| k < keys) {
                for &electrode in &self.def.key_map[key] {
                    if let Some(slot) = raw.get_mut(electrode as usize) {
                        *slot = PRESSED;
                    }
                }
            }
        }
    }
}
