//! Board definitions for the supported cabinets.
//!
//! The sensing hardware exposes [`RAW_KEY_COUNT`] electrodes, laid out as
//! four banks of twelve. Each protocol key is driven by up to two raw
//! electrodes so rows can be merged.

use slider_proto::BoardInfo;

/// Protocol keys reported in a scan.
pub const MAX_KEYS: usize = 32;

/// Hardware LEDs addressable by an LED frame.
pub const MAX_LEDS: usize = 32;

/// Raw electrode inputs.
pub const RAW_KEY_COUNT: usize = 48;

/// Raw electrodes merged into each protocol key.
pub const INPUTS_PER_KEY: usize = 2;

/// Static description of one slider model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SliderDef {
    /// Keys in each scan report.
    pub key_count: u8,
    /// For each protocol key, the raw electrodes that drive it.
    pub key_map: [[u8; INPUTS_PER_KEY]; MAX_KEYS],
    /// LEDs the host addresses.
    pub led_count: u8,
    /// For each protocol LED, the hardware LED it lands on.
    pub led_map: [u8; MAX_LEDS],
    /// Whether the cabinet also has air sensors.
    pub has_air: bool,
    /// Model number for [`BoardInfo`].
    pub model: [u8; 8],
    /// Chip number for [`BoardInfo`].
    pub chip_number: [u8; 5],
}

impl SliderDef {
    /// Board info reply for this model.
    #[must_use]
    pub const fn board_info(&self) -> BoardInfo {
        BoardInfo::new(self.model, self.chip_number)
    }
}

/// Project DIVA Arcade slider (837-15275).
pub const DIVA_SLIDER: SliderDef = SliderDef {
    key_count: 32,
    key_map: diva_key_map(),
    led_count: 32,
    led_map: identity_led_map(),
    has_air: false,
    model: *b"15275   ",
    chip_number: *b"06687",
};

/// Chunithm slider (837-15330).
pub const CHUNI_SLIDER: SliderDef = SliderDef {
    key_count: 32,
    key_map: chuni_key_map(),
    led_count: 32,
    led_map: chuni_led_map(),
    has_air: true,
    model: *b"15330   ",
    chip_number: *b"06712",
};

/// Supported slider models.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SliderKind {
    /// Project DIVA Arcade.
    #[default]
    Diva,
    /// Chunithm.
    Chuni,
}

impl SliderKind {
    /// Definition for this model.
    #[must_use]
    pub const fn def(self) -> &'static SliderDef {
        match self {
            Self::Diva => &DIVA_SLIDER,
            Self::Chuni => &CHUNI_SLIDER,
        }
    }
}

impl TryFrom<u8> for SliderKind {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Diva),
            1 => Ok(Self::Chuni),
            other => Err(other),
        }
    }
}

/// DIVA: banks in order, each key pair merging two adjacent electrodes.
const fn diva_key_map() -> [[u8; INPUTS_PER_KEY]; MAX_KEYS] {
    const PAIRS: [[u8; 2]; 4] = [[11, 10], [7, 8], [4, 3], [0, 1]];
    let mut map = [[0u8; INPUTS_PER_KEY]; MAX_KEYS];
    let mut key = 0;
    while key < MAX_KEYS {
        let bank = (key / 8) as u8 * 12;
        let pair = PAIRS[(key % 8) / 2];
        map[key] = [bank + pair[0], bank + pair[1]];
        key += 1;
    }
    map
}

/// Chunithm: banks reversed, one electrode per key.
const fn chuni_key_map() -> [[u8; INPUTS_PER_KEY]; MAX_KEYS] {
    const OFFSETS: [u8; 8] = [0, 1, 4, 3, 7, 8, 11, 10];
    let mut map = [[0u8; INPUTS_PER_KEY]; MAX_KEYS];
    let mut key = 0;
    while key < MAX_KEYS {
        let bank = (3 - key / 8) as u8 * 12;
        let raw = bank + OFFSETS[key % 8];
        map[key] = [raw, raw];
        key += 1;
    }
    map
}

const fn identity_led_map() -> [u8; MAX_LEDS] {
    let mut map = [0u8; MAX_LEDS];
    let mut i = 0;
    while i < MAX_LEDS {
        map[i] = i as u8;
        i += 1;
    }
    map
}

/// Chunithm LEDs run right to left; the last one stays put.
const fn chuni_led_map() -> [u8; MAX_LEDS] {
    let mut map = [0u8; MAX_LEDS];
    let mut i = 0;
    while i < MAX_LEDS - 1 {
        map[i] = (MAX_LEDS - 2 - i) as u8;
        i += 1;
    }
    map[MAX_LEDS - 1] = (MAX_LEDS - 1) as u8;
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diva_key_map() {
        let map = DIVA_SLIDER.key_map;
        assert_eq!(map[0], [11, 10]);
        assert_eq!(map[1], [11, 10]);
        assert_eq!(map[2], [7, 8]);
        assert_eq!(map[7], [0, 1]);
        assert_eq!(map[8], [23, 22]);
        assert_eq!(map[31], [36, 37]);
    }

    #[test]
    fn test_chuni_key_map() {
        let map = CHUNI_SLIDER.key_map;
        assert_eq!(map[0], [36, 36]);
        assert_eq!(map[3], [39, 39]);
        assert_eq!(map[8], [24, 24]);
        assert_eq!(map[31], [10, 10]);
    }

    #[test]
    fn test_key_maps_stay_in_range() {
        for def in [&DIVA_SLIDER, &CHUNI_SLIDER] {
            for pair in def.key_map {
                assert!(pair.iter().all(|&raw| (raw as usize) < RAW_KEY_COUNT));
            }
        }
    }

    #[test]
    fn test_led_maps() {
        assert_eq!(DIVA_SLIDER.led_map[5], 5);
        let chuni = CHUNI_SLIDER.led_map;
        assert_eq!(chuni[0], 30);
        assert_eq!(chuni[29], 1);
        assert_eq!(chuni[30], 0);
        assert_eq!(chuni[31], 31);
    }

    #[test]
    fn test_board_info() {
        let info = SliderKind::Diva.def().board_info();
        assert_eq!(info.model_str(), "15275");
        assert_eq!(info.chip_number_str(), "06687");

        let info = SliderKind::Chuni.def().board_info();
        assert_eq!(&info.model, b"15330   ");
        assert_eq!(&info.chip_number, b"06712");
        assert_eq!(info.firmware_version, 0x90);
    }

    #[test]
    fn test_kind_from_raw() {
        assert_eq!(SliderKind::try_from(1), Ok(SliderKind::Chuni));
        assert_eq!(SliderKind::try_from(2), Err(2));
        assert_eq!(SliderKind::default(), SliderKind::Diva);
    }
}
