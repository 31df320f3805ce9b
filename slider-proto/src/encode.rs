//! Packet encoding for the slider wire format.
//!
//! # Wire Format
//!
//! ```text
//! START cmd len data[0..len] checksum
//! ```
//!
//! `START` (0xFF) is sent raw. Every byte after it, the checksum included, is
//! stuffed (see [`crate::stuffing`]).
//!
//! # Example
//!
//! ```
//! use slider_proto::{Command, Encode, Packet};
//!
//! let mut buf = [0u8; 16];
//! let len = Packet::empty(Command::BOARD_INFO).encode(&mut buf).unwrap();
//! assert_eq!(&buf[..len], &[0xFF, 0xF0, 0x00, 0x11]);
//! ```

use crate::packet::{OwnedPacket, Packet};
use crate::stuffing::{encode_byte, Checksum, FRAME_START, INVALID_CHECKSUM_OFFSET};

/// Largest payload the one-byte length field can describe.
pub const MAX_WIRE_DATA_LEN: usize = u8::MAX as usize;

/// Worst-case encoded size of a packet carrying `data_len` payload bytes.
///
/// One raw START plus command, length, payload and checksum, each possibly
/// escaped to two bytes.
#[inline]
#[must_use]
pub const fn max_encoded_len(data_len: usize) -> usize {
    1 + 2 * (3 + data_len)
}

/// Worst-case encoded size of any packet.
pub const MAX_ENCODED_SIZE: usize = max_encoded_len(MAX_WIRE_DATA_LEN);

/// Error type for encoding operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// The output buffer is too small to hold the encoded packet.
    BufferTooSmall,
    /// The payload does not fit the length field or the target buffer type.
    PayloadTooLarge,
    /// A write operation failed (for I/O adapters).
    WriteError,
}

impl core::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BufferTooSmall => write!(f, "buffer too small"),
            Self::PayloadTooLarge => write!(f, "payload too large"),
            Self::WriteError => write!(f, "write error"),
        }
    }
}

/// Cursor over an output buffer that stuffs and checksums as it goes.
struct StuffBuf<'a> {
    buf: &'a mut [u8],
    pos: usize,
    sum: Checksum,
}

impl<'a> StuffBuf<'a> {
    #[inline]
    fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            sum: Checksum::new(),
        }
    }

    #[inline]
    fn put(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        let end = self.pos + bytes.len();
        self.buf
            .get_mut(self.pos..end)
            .ok_or(EncodeError::BufferTooSmall)?
            .copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }

    /// START marker: raw, but part of the checksum.
    #[inline]
    fn write_start(&mut self) -> Result<(), EncodeError> {
        self.sum.update(FRAME_START);
        self.put(&[FRAME_START])
    }

    /// One checksummed, stuffed byte.
    #[inline]
    fn write(&mut self, byte: u8) -> Result<(), EncodeError> {
        self.sum.update(byte);
        self.put(encode_byte(byte).as_slice())
    }

    #[inline]
    fn write_slice(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        for &b in bytes {
            self.write(b)?;
        }
        Ok(())
    }

    /// Append the stuffed checksum (plus `offset`) and return the total length.
    #[inline]
    fn finalize(mut self, offset: u8) -> Result<usize, EncodeError> {
        let checksum = self.sum.finalize().wrapping_add(offset);
        let stuffed = encode_byte(checksum);
        self.put(stuffed.as_slice())?;
        Ok(self.pos)
    }
}

/// Extension trait for encoding packets.
///
/// Implemented for [`Packet`] and [`OwnedPacket`]. A packet whose `is_valid`
/// flag is `false` is encoded with its checksum offset by
/// [`INVALID_CHECKSUM_OFFSET`] so the receiver rejects it. The length byte
/// is always `data.len()`; [`Packet::data_length`] is not consulted.
pub trait Encode {
    /// Encode to the provided buffer.
    ///
    /// Returns the number of bytes written on success.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::BufferTooSmall`] if the buffer is not large
    /// enough, or [`EncodeError::PayloadTooLarge`] if the payload exceeds 255
    /// bytes.
    fn encode(&self, buf: &mut [u8]) -> Result<usize, EncodeError>;

    /// Exact number of wire bytes [`encode`](Self::encode) will produce.
    fn encoded_len(&self) -> usize;

    /// Encode to a `heapless::Vec`.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::BufferTooSmall`] if `N` is not large enough.
    fn encode_to_vec<const N: usize>(&self) -> Result<heapless::Vec<u8, N>, EncodeError> {
        let mut vec = heapless::Vec::new();
        vec.resize(N, 0).map_err(|_| EncodeError::BufferTooSmall)?;
        let len = self.encode(&mut vec)?;
        vec.truncate(len);
        Ok(vec)
    }

    /// Encode to an `embedded_io::Write` implementation.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::WriteError`] if the write fails.
    #[cfg(feature = "embedded-io")]
    fn encode_io<W: embedded_io::Write>(&self, writer: &mut W) -> Result<(), EncodeError>;
}

/// Checksum byte as it will appear on the wire (before stuffing).
fn wire_checksum(packet: &Packet<'_>) -> u8 {
    let mut sum = Checksum::new();
    sum.update(FRAME_START);
    sum.update(packet.command.raw());
    sum.update(packet.data.len() as u8);
    sum.update_slice(packet.data);
    let offset = if packet.is_valid {
        0
    } else {
        INVALID_CHECKSUM_OFFSET
    };
    sum.finalize().wrapping_add(offset)
}

impl Encode for Packet<'_> {
    fn encode(&self, buf: &mut [u8]) -> Result<usize, EncodeError> {
        if self.data.len() > MAX_WIRE_DATA_LEN {
            return Err(EncodeError::PayloadTooLarge);
        }

        let mut sb = StuffBuf::new(buf);
        sb.write_start()?;
        sb.write(self.command.raw())?;
        sb.write(self.data.len() as u8)?;
        sb.write_slice(self.data)?;

        let offset = if self.is_valid {
            0
        } else {
            INVALID_CHECKSUM_OFFSET
        };
        sb.finalize(offset)
    }

    fn encoded_len(&self) -> usize {
        let header = [self.command.raw(), self.data.len() as u8];
        1 + header
            .iter()
            .chain(self.data.iter())
            .map(|&b| encode_byte(b).len())
            .sum::<usize>()
            + encode_byte(wire_checksum(self)).len()
    }

    #[cfg(feature = "embedded-io")]
    fn encode_io<W: embedded_io::Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        if self.data.len() > MAX_WIRE_DATA_LEN {
            return Err(EncodeError::PayloadTooLarge);
        }
        let mut put = |bytes: &[u8]| writer.write_all(bytes).map_err(|_| EncodeError::WriteError);

        put(&[FRAME_START])?;
        put(encode_byte(self.command.raw()).as_slice())?;
        put(encode_byte(self.data.len() as u8).as_slice())?;
        for &b in self.data {
            put(encode_byte(b).as_slice())?;
        }
        put(encode_byte(wire_checksum(self)).as_slice())
    }
}

impl Encode for OwnedPacket {
    fn encode(&self, buf: &mut [u8]) -> Result<usize, EncodeError> {
        self.as_packet().encode(buf)
    }

    fn encoded_len(&self) -> usize {
        self.as_packet().encoded_len()
    }

    #[cfg(feature = "embedded-io")]
    fn encode_io<W: embedded_io::Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        self.as_packet().encode_io(writer)
    }
}
