//! Board info payload returned for [`Command::BOARD_INFO`](crate::Command::BOARD_INFO).

use core::fmt;

/// Device class byte for touch sliders.
pub const DEVICE_CLASS_SLIDER: u8 = 0xA0;

/// Firmware version reported by both the DIVA and Chunithm boards.
pub const DEFAULT_FIRMWARE_VERSION: u8 = 0x90;

/// Board identification record.
///
/// The field layout is the wire layout: 18 single-byte fields, no padding.
///
/// ```text
/// model[8] device_class chip_number[5] reserved_1 firmware_version reserved_2[2]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardInfo {
    /// Board model number (837-XXXXX), ASCII, space padded.
    pub model: [u8; 8],
    /// Device class, [`DEVICE_CLASS_SLIDER`] for sliders.
    pub device_class: u8,
    /// Chip part number, ASCII.
    pub chip_number: [u8; 5],
    /// Unknown, observed as 0xFF.
    pub reserved_1: u8,
    /// Firmware version.
    pub firmware_version: u8,
    /// Unknown, observed as 0x00 0x64.
    pub reserved_2: [u8; 2],
}

/// Error decoding a [`BoardInfo`] payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardInfoError {
    /// Payload was not exactly [`BoardInfo::SIZE`] bytes.
    WrongLength {
        /// Bytes received.
        got: usize,
    },
}

impl fmt::Display for BoardInfoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongLength { got } => {
                write!(f, "board info must be {} bytes, got {}", BoardInfo::SIZE, got)
            }
        }
    }
}

impl BoardInfo {
    /// Wire size in bytes.
    pub const SIZE: usize = 18;

    /// Board info for a slider with the given model and chip numbers.
    #[must_use]
    pub const fn new(model: [u8; 8], chip_number: [u8; 5]) -> Self {
        Self {
            model,
            device_class: DEVICE_CLASS_SLIDER,
            chip_number,
            reserved_1: 0xFF,
            firmware_version: DEFAULT_FIRMWARE_VERSION,
            reserved_2: [0x00, 0x64],
        }
    }

    /// Serialize to the 18-byte wire payload.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[0..8].copy_from_slice(&self.model);
        out[8] = self.device_class;
        out[9..14].copy_from_slice(&self.chip_number);
        out[14] = self.reserved_1;
        out[15] = self.firmware_version;
        out[16..18].copy_from_slice(&self.reserved_2);
        out
    }

    /// Parse an 18-byte wire payload.
    ///
    /// # Errors
    ///
    /// Returns [`BoardInfoError::WrongLength`] unless `data` is exactly 18 bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, BoardInfoError> {
        if data.len() != Self::SIZE {
            return Err(BoardInfoError::WrongLength { got: data.len() });
        }
        let mut model = [0u8; 8];
        model.copy_from_slice(&data[0..8]);
        let mut chip_number = [0u8; 5];
        chip_number.copy_from_slice(&data[9..14]);
        Ok(Self {
            model,
            device_class: data[8],
            chip_number,
            reserved_1: data[14],
            firmware_version: data[15],
            reserved_2: [data[16], data[17]],
        })
    }

    /// Model number as text, trailing padding removed.
    #[must_use]
    pub fn model_str(&self) -> &str {
        trim_ascii(&self.model)
    }

    /// Chip number as text.
    #[must_use]
    pub fn chip_number_str(&self) -> &str {
        trim_ascii(&self.chip_number)
    }
}

impl TryFrom<&[u8]> for BoardInfo {
    type Error = BoardInfoError;

    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(data)
    }
}

/// Trim trailing spaces and NULs; non-UTF-8 yields an empty string.
fn trim_ascii(bytes: &[u8]) -> &str {
    let end = bytes
        .iter()
        .rposition(|&b| b != b' ' && b != 0)
        .map_or(0, |pos| pos + 1);
    core::str::from_utf8(&bytes[..end]).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIVA: BoardInfo = BoardInfo::new(*b"15275   ", *b"06687");

    #[test]
    fn test_diva_literal_layout() {
        assert_eq!(
            DIVA.to_bytes(),
            [
                b'1', b'5', b'2', b'7', b'5', b' ', b' ', b' ', // model
                0xA0, // device class
                b'0', b'6', b'6', b'8', b'7', // chip number
                0xFF, // reserved
                0x90, // firmware version
                0x00, 0x64, // reserved
            ]
        );
    }

    #[test]
    fn test_from_bytes_round_trip() {
        let bytes = DIVA.to_bytes();
        assert_eq!(BoardInfo::from_bytes(&bytes), Ok(DIVA));
    }

    #[test]
    fn test_from_bytes_wrong_length() {
        assert_eq!(
            BoardInfo::from_bytes(&[0u8; 17]),
            Err(BoardInfoError::WrongLength { got: 17 })
        );
    }

    #[test]
    fn test_try_from_slice() {
        let bytes = DIVA.to_bytes();
        assert_eq!(BoardInfo::try_from(&bytes[..]), Ok(DIVA));
        assert_eq!(
            BoardInfo::try_from(&bytes[..4]),
            Err(BoardInfoError::WrongLength { got: 4 })
        );
    }

    #[test]
    fn test_text_accessors() {
        assert_eq!(DIVA.model_str(), "15275");
        assert_eq!(DIVA.chip_number_str(), "06687");
    }
}
