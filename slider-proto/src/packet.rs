//! Packet types.

use heapless::Vec;

use crate::command::Command;
use crate::encode::EncodeError;

/// Default staging size for decoded packets (START + command + length + data + checksum).
///
/// The largest packet seen in practice is the LED packet at 100 bytes
/// (4 + 32 * 3).
pub const MAX_PACKET_SIZE: usize = 128;

/// Largest staging size a parser may be configured with.
pub const MAX_STAGING_SIZE: usize = 256;

/// Framing overhead counted in the staging buffer: START, command, length, checksum.
pub const PACKET_OVERHEAD: usize = 4;

/// Largest payload any parser configuration can recover.
pub const MAX_DATA_LEN: usize = MAX_STAGING_SIZE - PACKET_OVERHEAD;

/// A decoded or outgoing slider packet.
///
/// `data` is a view, not a copy. Packets returned by the parser borrow its
/// staging buffer and are overwritten by the next decode call; use
/// [`Packet::to_owned_packet`] to keep one around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub struct Packet<'a> {
    /// Opcode. [`Command::NONE`] means no packet was available.
    pub command: Command,
    /// Payload bytes.
    pub data: &'a [u8],
    /// Payload length as carried on the wire.
    ///
    /// Set by the parser and by the constructors. The encoder ignores it and
    /// always sends `data.len()` as the length byte, so a hand-built packet
    /// can never announce more or fewer bytes than it carries.
    pub data_length: u8,
    /// Whether the transmitted checksum matched.
    ///
    /// For outgoing packets, `false` makes the encoder emit a deliberately
    /// wrong checksum.
    pub is_valid: bool,
}

impl<'a> Packet<'a> {
    /// The "no packet available" value. Never valid.
    pub const fn none() -> Self {
        Self {
            command: Command::NONE,
            data: &[],
            data_length: 0,
            is_valid: false,
        }
    }

    /// Build an outgoing packet. The length byte is taken from `data`.
    pub const fn new(command: Command, data: &'a [u8]) -> Self {
        Self {
            command,
            data,
            data_length: data.len() as u8,
            is_valid: true,
        }
    }

    /// Build an outgoing packet with no payload.
    pub const fn empty(command: Command) -> Self {
        Self::new(command, &[])
    }

    /// Mark this packet so the encoder corrupts its checksum.
    pub const fn with_invalid_checksum(mut self) -> Self {
        self.is_valid = false;
        self
    }

    /// Whether this is the "no packet available" value.
    #[inline]
    #[must_use]
    pub const fn is_none(&self) -> bool {
        self.command.is_none()
    }

    /// Whether a packet (valid or not) was decoded.
    #[inline]
    #[must_use]
    pub const fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Copy this packet out of the parser's staging buffer.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::PayloadTooLarge`] if the payload exceeds
    /// [`MAX_DATA_LEN`].
    pub fn to_owned_packet(&self) -> Result<OwnedPacket, EncodeError> {
        let mut data = Vec::new();
        data.extend_from_slice(self.data)
            .map_err(|_| EncodeError::PayloadTooLarge)?;
        Ok(OwnedPacket {
            command: self.command,
            data,
            is_valid: self.is_valid,
        })
    }
}

impl Default for Packet<'_> {
    fn default() -> Self {
        Self::none()
    }
}

/// A packet that owns its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedPacket {
    /// Opcode.
    pub command: Command,
    /// Payload bytes.
    pub data: Vec<u8, MAX_DATA_LEN>,
    /// Checksum state (see [`Packet::is_valid`]).
    pub is_valid: bool,
}

impl OwnedPacket {
    /// Build a valid packet by copying `data`.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::PayloadTooLarge`] if `data` exceeds [`MAX_DATA_LEN`].
    pub fn new(command: Command, data: &[u8]) -> Result<Self, EncodeError> {
        Packet::new(command, data).to_owned_packet()
    }

    /// Build a valid packet with no payload.
    #[must_use]
    pub fn empty(command: Command) -> Self {
        Self {
            command,
            data: Vec::new(),
            is_valid: true,
        }
    }

    /// Borrow as a [`Packet`] view.
    pub fn as_packet(&self) -> Packet<'_> {
        Packet {
            command: self.command,
            data: &self.data,
            data_length: self.data.len() as u8,
            is_valid: self.is_valid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_never_valid() {
        let p = Packet::none();
        assert!(p.is_none());
        assert!(!p.is_valid);
        assert_eq!(p.data_length, 0);
        assert_eq!(Packet::default(), p);
    }

    #[test]
    fn test_new_takes_length_from_data() {
        let p = Packet::new(Command::LED, &[1, 2, 3]);
        assert_eq!(p.data_length, 3);
        assert!(p.is_valid);
        assert!(p.is_some());
    }

    #[test]
    fn test_invalid_checksum_marker() {
        let p = Packet::empty(Command::DETECT).with_invalid_checksum();
        assert!(!p.is_valid);
        assert_eq!(p.command, Command::DETECT);
    }

    #[test]
    fn test_owned_copy_survives() {
        let mut staging = [7u8, 8, 9];
        let owned = Packet::new(Command::SCAN_REPORT, &staging)
            .to_owned_packet()
            .unwrap();
        staging[0] = 0;
        assert_eq!(&owned.data[..], &[7, 8, 9]);
        assert_eq!(owned.as_packet().data_length, 3);
        assert_eq!(staging[0], 0);
    }

    #[test]
    fn test_owned_rejects_oversized_payload() {
        let big = [0u8; MAX_DATA_LEN + 1];
        assert_eq!(
            OwnedPacket::new(Command::LED, &big),
            Err(EncodeError::PayloadTooLarge)
        );
    }
}
