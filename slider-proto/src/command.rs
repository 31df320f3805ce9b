//! Slider protocol command opcodes.

use core::fmt;

/// One-byte command opcode.
///
/// Kept as a newtype rather than a closed enum so vendor opcodes that this
/// crate does not interpret still pass through unmodified. [`Command::NONE`]
/// is reserved to mean "no packet" and is never sent.
///
/// # Example
///
/// ```
/// use slider_proto::Command;
///
/// assert!(Command::BOARD_INFO.is_known());
/// assert!(!Command(0x42).is_known());
/// assert!(Command::NONE.is_none());
/// ```
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command(pub u8);

impl Command {
    /// No packet / incomplete read.
    pub const NONE: Self = Self(0x00);
    /// Scan results, one byte per sensor.
    pub const SCAN_REPORT: Self = Self(0x01);
    /// Set LED colours: brightness byte followed by BRG triplets.
    pub const LED: Self = Self(0x02);
    /// Enable auto scan.
    pub const SCAN_ON: Self = Self(0x03);
    /// Disable auto scan.
    pub const SCAN_OFF: Self = Self(0x04);
    /// Vendor report, looks related to 0x0B.
    pub const REPORT_06: Self = Self(0x06);
    /// Vendor scan command paired with 0x06.
    pub const SCAN_07: Self = Self(0x07);
    /// Vendor parameter write.
    pub const UNKNOWN_09: Self = Self(0x09);
    /// Vendor parameter write.
    pub const UNKNOWN_0A: Self = Self(0x0A);
    /// Vendor report, possibly calibration.
    pub const REPORT_0B: Self = Self(0x0B);
    /// Vendor scan command paired with 0x0B.
    pub const SCAN_0C: Self = Self(0x0C);
    /// Detect / identify (segatools calls this reset).
    pub const DETECT: Self = Self(0x10);
    /// Exception report.
    pub const EXCEPTION: Self = Self(0xEE);
    /// Request board info; the reply payload is a [`BoardInfo`](crate::BoardInfo).
    pub const BOARD_INFO: Self = Self(0xF0);

    /// Raw opcode byte.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Whether this is the reserved "no packet" value.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Whether this opcode is one of the documented protocol commands.
    #[must_use]
    pub const fn is_known(self) -> bool {
        self.name().is_some()
    }

    /// Whether this is a vendor opcode with uninterpreted payload.
    #[must_use]
    pub const fn is_vendor(self) -> bool {
        matches!(self.0, 0x06 | 0x07 | 0x09 | 0x0A | 0x0B | 0x0C)
    }

    /// Symbolic name, if documented.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        Some(match self.0 {
            0x01 => "SCAN_REPORT",
            0x02 => "LED",
            0x03 => "SCAN_ON",
            0x04 => "SCAN_OFF",
            0x06 => "REPORT_06",
            0x07 => "SCAN_07",
            0x09 => "UNKNOWN_09",
            0x0A => "UNKNOWN_0A",
            0x0B => "REPORT_0B",
            0x0C => "SCAN_0C",
            0x10 => "DETECT",
            0xEE => "EXCEPTION",
            0xF0 => "BOARD_INFO",
            _ => return None,
        })
    }
}

impl From<u8> for Command {
    #[inline]
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

impl From<Command> for u8 {
    #[inline]
    fn from(cmd: Command) -> Self {
        cmd.0
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "0x{:02X}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::string::ToString;

    use super::*;

    #[test]
    fn test_none_is_not_known() {
        assert!(Command::NONE.is_none());
        assert!(!Command::NONE.is_known());
    }

    #[test]
    fn test_vendor_opcodes() {
        for raw in [0x06u8, 0x07, 0x09, 0x0A, 0x0B, 0x0C] {
            let cmd = Command(raw);
            assert!(cmd.is_vendor());
            assert!(cmd.is_known());
        }
        assert!(!Command::LED.is_vendor());
    }

    #[test]
    fn test_display() {
        assert_eq!(Command::BOARD_INFO.to_string(), "BOARD_INFO");
        assert_eq!(Command(0x42).to_string(), "0x42");
    }

    #[test]
    fn test_raw_round_trip() {
        let cmd: Command = 0x10.into();
        assert_eq!(cmd, Command::DETECT);
        assert_eq!(u8::from(cmd), 0x10);
    }
}
