//! Byte stuffing and checksum for the slider wire format.
//!
//! Two byte values are reserved on the wire: [`FRAME_START`] marks a packet
//! boundary and [`FRAME_ESCAPE`] announces an escaped byte. A raw byte equal to
//! either of them is sent as `ESCAPE, raw - 1`; the receiver adds 1 back.

/// Packet start marker. Only ever sent raw as the first byte of a packet.
pub const FRAME_START: u8 = 0xFF;

/// Escape marker. The following wire byte is the raw value minus one.
pub const FRAME_ESCAPE: u8 = 0xFD;

/// Offset added to the checksum of packets sent with `is_valid == false`.
///
/// Lets test tooling emit a frame that the receiver will reject without
/// disturbing the framing.
pub const INVALID_CHECKSUM_OFFSET: u8 = 39;

/// Returns `true` if `raw` must be escaped on the wire.
#[inline]
#[must_use]
pub const fn needs_escape(raw: u8) -> bool {
    raw == FRAME_START || raw == FRAME_ESCAPE
}

/// One raw byte encoded for the wire: either one or two bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StuffedByte {
    bytes: [u8; 2],
    len: u8,
}

impl StuffedByte {
    /// The wire bytes.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Number of wire bytes (1 or 2).
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Always `false`; present for API symmetry with `len`.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Encode a single raw byte for the wire.
#[inline]
#[must_use]
pub const fn encode_byte(raw: u8) -> StuffedByte {
    if needs_escape(raw) {
        StuffedByte {
            bytes: [FRAME_ESCAPE, raw - 1],
            len: 2,
        }
    } else {
        StuffedByte {
            bytes: [raw, 0],
            len: 1,
        }
    }
}

/// Decode one wire byte given the escape-pending flag.
///
/// Returns `None` when `wire` was an escape marker (the flag is then set and
/// the next call yields the reconstructed byte).
#[inline]
pub fn decode_byte(wire: u8, escape_pending: &mut bool) -> Option<u8> {
    if *escape_pending {
        *escape_pending = false;
        Some(wire.wrapping_add(1))
    } else if wire == FRAME_ESCAPE {
        *escape_pending = true;
        None
    } else {
        Some(wire)
    }
}

/// Streaming unstuffer holding the escape-pending flag between bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Unstuffer {
    escape_pending: bool,
}

impl Unstuffer {
    /// Create an unstuffer with no escape pending.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            escape_pending: false,
        }
    }

    /// Feed one wire byte. Yields the raw byte, or `None` after an escape marker.
    #[inline]
    pub fn push(&mut self, wire: u8) -> Option<u8> {
        decode_byte(wire, &mut self.escape_pending)
    }

    /// Whether the last byte fed was an escape marker.
    #[inline]
    #[must_use]
    pub const fn escape_pending(&self) -> bool {
        self.escape_pending
    }

    /// Drop any pending escape.
    #[inline]
    pub fn reset(&mut self) {
        self.escape_pending = false;
    }
}

/// Running packet checksum.
///
/// Starts at zero and subtracts every unescaped byte of
/// `[START, command, length, data..]` with 8-bit wraparound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Checksum {
    value: u8,
}

impl Checksum {
    /// Create an empty checksum.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { value: 0 }
    }

    /// Fold in one byte.
    #[inline]
    pub fn update(&mut self, byte: u8) {
        self.value = self.value.wrapping_sub(byte);
    }

    /// Fold in a slice of bytes.
    #[inline]
    pub fn update_slice(&mut self, data: &[u8]) {
        for &b in data {
            self.update(b);
        }
    }

    /// The accumulated checksum byte.
    #[inline]
    #[must_use]
    pub const fn finalize(self) -> u8 {
        self.value
    }
}

/// Checksum of a packet with the given command byte and payload.
///
/// The length byte is `data.len()` truncated to 8 bits, as it is on the wire.
#[must_use]
pub fn packet_checksum(command: u8, data: &[u8]) -> u8 {
    let mut sum = Checksum::new();
    sum.update(FRAME_START);
    sum.update(command);
    sum.update(data.len() as u8);
    sum.update_slice(data);
    sum.finalize()
}
