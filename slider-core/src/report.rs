//! Scan report and LED frame payloads.

use crate::board::{SliderDef, MAX_KEYS, MAX_LEDS, RAW_KEY_COUNT};

/// Payload of a [`Command::SCAN_REPORT`](slider_proto::Command::SCAN_REPORT)
/// reply: one pressure byte per protocol key, 0 meaning untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanReport {
    keys: [u8; MAX_KEYS],
    len: u8,
}

impl ScanReport {
    /// Build a report from raw electrode readings using `def`'s key map.
    ///
    /// Each key takes the stronger of its two electrodes.
    #[must_use]
    pub fn from_raw(def: &SliderDef, raw: &[u8; RAW_KEY_COUNT]) -> Self {
        let len = (def.key_count as usize).min(MAX_KEYS);
        let mut keys = [0u8; MAX_KEYS];
        for (key, inputs) in keys.iter_mut().zip(def.key_map.iter()).take(len) {
            *key = inputs
                .iter()
                .map(|&i| raw.get(i as usize).copied().unwrap_or(0))
                .max()
                .unwrap_or(0);
        }
        Self {
            keys,
            len: len as u8,
        }
    }

    /// Payload bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.keys[..self.len as usize]
    }

    /// Whether any key reads as touched.
    #[must_use]
    pub fn any_touched(&self) -> bool {
        self.as_bytes().iter().any(|&k| k != 0)
    }
}

/// One LED colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// LED state decoded from a [`Command::LED`](slider_proto::Command::LED)
/// payload, indexed by hardware LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedFrame {
    /// Global brightness as sent by the host (observed range 0-63).
    pub brightness: u8,
    /// Colour per hardware LED.
    pub colors: [Rgb; MAX_LEDS],
}

impl LedFrame {
    /// All LEDs off.
    #[must_use]
    pub const fn off() -> Self {
        Self {
            brightness: 0,
            colors: [Rgb { r: 0, g: 0, b: 0 }; MAX_LEDS],
        }
    }

    /// Decode an LED payload: a brightness byte followed by BRG triplets.
    ///
    /// Triplets are mapped to hardware LEDs through `def`'s LED map. Missing
    /// triplets leave their LED off and a trailing partial triplet is
    /// ignored. Returns `None` for an empty payload.
    #[must_use]
    pub fn from_payload(def: &SliderDef, data: &[u8]) -> Option<Self> {
        let (&brightness, triplets) = data.split_first()?;
        let mut frame = Self::off();
        frame.brightness = brightness;

        let count = (def.led_count as usize).min(MAX_LEDS);
        for (led, brg) in triplets.chunks_exact(3).take(count).enumerate() {
            let hw = def.led_map[led] as usize;
            if let Some(slot) = frame.colors.get_mut(hw) {
                *slot = Rgb {
                    r: brg[1],
                    g: brg[2],
                    b: brg[0],
                };
            }
        }
        Some(frame)
    }
}

impl Default for LedFrame {
    fn default() -> Self {
        Self::off()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{CHUNI_SLIDER, DIVA_SLIDER};

    #[test]
    fn test_scan_report_idle() {
        let raw = [0u8; RAW_KEY_COUNT];
        let report = ScanReport::from_raw(&DIVA_SLIDER, &raw);
        assert_eq!(report.as_bytes().len(), 32);
        assert!(!report.any_touched());
    }

    #[test]
    fn test_scan_report_takes_max_of_pair() {
        let mut raw = [0u8; RAW_KEY_COUNT];
        raw[11] = 40;
        raw[10] = 200;
        let report = ScanReport::from_raw(&DIVA_SLIDER, &raw);
        // keys 0 and 1 both read electrodes 11 and 10
        assert_eq!(report.as_bytes()[0], 200);
        assert_eq!(report.as_bytes()[1], 200);
        assert_eq!(report.as_bytes()[2], 0);
        assert!(report.any_touched());
    }

    #[test]
    fn test_scan_report_chuni_order() {
        let mut raw = [0u8; RAW_KEY_COUNT];
        raw[36] = 1;
        raw[10] = 2;
        let report = ScanReport::from_raw(&CHUNI_SLIDER, &raw);
        assert_eq!(report.as_bytes()[0], 1);
        assert_eq!(report.as_bytes()[31], 2);
    }

    #[test]
    fn test_led_frame_brg_order() {
        let frame = LedFrame::from_payload(&DIVA_SLIDER, &[63, 1, 2, 3]).unwrap();
        assert_eq!(frame.brightness, 63);
        assert_eq!(frame.colors[0], Rgb { r: 2, g: 3, b: 1 });
        assert_eq!(frame.colors[1], Rgb::default());
    }

    #[test]
    fn test_led_frame_uses_led_map() {
        let mut payload = [0u8; 1 + 3 * 32];
        payload[0] = 10;
        payload[1..4].copy_from_slice(&[9, 8, 7]);
        let frame = LedFrame::from_payload(&CHUNI_SLIDER, &payload).unwrap();
        assert_eq!(frame.colors[30], Rgb { r: 8, g: 7, b: 9 });
        assert_eq!(frame.colors[0], Rgb::default());
    }

    #[test]
    fn test_led_frame_partial_triplet_ignored() {
        let frame = LedFrame::from_payload(&DIVA_SLIDER, &[5, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(frame.colors[0], Rgb { r: 2, g: 3, b: 1 });
        assert_eq!(frame.colors[1], Rgb::default());
    }

    #[test]
    fn test_led_frame_empty_payload() {
        assert_eq!(LedFrame::from_payload(&DIVA_SLIDER, &[]), None);
    }
}
