//! Re-entrant packet parser.
//!
//! The parser never owns the receive bytes. Each call looks at a window of
//! pending wire bytes (a [`RingBuffer`] or a plain slice), recovers at most
//! one packet into its staging buffer and reports how many bytes the caller
//! may drop.
//!
//! # Framing recovery
//!
//! A packet runs from a START byte either to the next START (the span is
//! then consumed whatever it contains) or, if no second START has arrived
//! yet, to the end of the window (the span is consumed only once it holds a
//! complete packet with a good checksum). A span closed by a second START
//! must hold exactly one packet: one cut short, one with stray bytes after
//! its checksum, or one carrying the reserved [`Command::NONE`] opcode is
//! corruption. It is dropped, counted in [`ParserStats::resyncs`], and
//! scanning resumes at the new START within the same call. A complete
//! `NONE` packet with no START after it is dropped the same way.
//!
//! A returned packet with a command other than [`Command::NONE`] has always
//! been consumed, so the caller never sees the same packet twice.

use crate::command::Command;
use crate::packet::{Packet, MAX_PACKET_SIZE, MAX_STAGING_SIZE, PACKET_OVERHEAD};
use crate::ring::RingBuffer;
use crate::stuffing::{Checksum, Unstuffer, FRAME_START};

/// Read-only view of pending wire bytes, indexed from the read cursor.
pub trait ByteWindow {
    /// Number of bytes available.
    fn len(&self) -> usize;

    /// Byte at `offset` (must be `< len()`).
    fn get(&self, offset: usize) -> u8;

    /// Whether the window holds no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Offset of the first START at or after `from`.
    fn find_start(&self, from: usize) -> Option<usize> {
        (from..self.len()).find(|&offset| self.get(offset) == FRAME_START)
    }
}

impl ByteWindow for [u8] {
    #[inline]
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    #[inline]
    fn get(&self, offset: usize) -> u8 {
        self[offset]
    }
}

impl<const C: usize> ByteWindow for RingBuffer<C> {
    #[inline]
    fn len(&self) -> usize {
        self.pending()
    }

    #[inline]
    fn get(&self, offset: usize) -> u8 {
        self.read_at(self.tail() + offset)
    }
}

/// Counters kept across calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParserStats {
    /// Packets returned with a matching checksum.
    pub packets: u32,
    /// Packets returned with a checksum mismatch.
    pub checksum_errors: u32,
    /// Malformed spans dropped: truncated by a START, followed by stray
    /// bytes, or carrying the `NONE` opcode.
    pub resyncs: u32,
}

/// Outcome of unstuffing one span into the staging buffer.
#[derive(Clone, Copy)]
enum Span {
    Incomplete,
    Complete {
        command: u8,
        len: u8,
        valid: bool,
        /// Window offset just past the checksum's last wire byte.
        wire_end: usize,
    },
}

/// Header fields of a recovered packet; payload stays in the staging buffer.
#[derive(Clone, Copy)]
struct Found {
    command: u8,
    len: u8,
    valid: bool,
}

/// Stateful slider packet parser.
///
/// `N` is the staging capacity: the largest unescaped packet (START,
/// command, length, payload, checksum) this parser can recover. Longer
/// packets are never reported complete.
///
/// # Example
///
/// ```
/// use slider_proto::{Command, PacketParser, RingBuffer};
///
/// let mut ring = RingBuffer::<32>::new();
/// let mut parser: PacketParser = PacketParser::new();
///
/// ring.write(&[0xFF, 0x01, 0x00]);
/// assert!(parser.parse_ring(&mut ring).is_none());
///
/// ring.write(&[0x00]);
/// let packet = parser.parse_ring(&mut ring);
/// assert_eq!(packet.command, Command::SCAN_REPORT);
/// assert!(packet.is_valid);
/// assert!(ring.is_empty());
/// ```
pub struct PacketParser<const N: usize = MAX_PACKET_SIZE> {
    scratch: [u8; N],
    last: Option<Found>,
    stats: ParserStats,
}

impl<const N: usize> PacketParser<N> {
    const VALID_SIZE: () = assert!(
        N >= PACKET_OVERHEAD && N <= MAX_STAGING_SIZE,
        "staging size must be between 4 and 256"
    );

    /// Create a parser with zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_SIZE;
        Self {
            scratch: [0u8; N],
            last: None,
            stats: ParserStats {
                packets: 0,
                checksum_errors: 0,
                resyncs: 0,
            },
        }
    }

    /// Staging capacity in bytes.
    #[inline]
    #[must_use]
    pub const fn staging_capacity(&self) -> usize {
        N
    }

    /// Counters accumulated since creation or the last reset.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> ParserStats {
        self.stats
    }

    /// Zero the counters.
    pub fn reset_stats(&mut self) {
        self.stats = ParserStats::default();
    }

    /// Decode the next packet from `ring`, advancing its tail past whatever
    /// was consumed.
    ///
    /// Returns [`Packet::none()`] when no complete packet is available.
    pub fn parse_ring<const C: usize>(&mut self, ring: &mut RingBuffer<C>) -> Packet<'_> {
        let (found, consumed) = self.scan(&*ring);
        ring.advance_by(consumed);
        self.last = found;
        self.packet(found)
    }

    /// Decode the next packet from a linear buffer.
    ///
    /// Returns the packet and the number of leading bytes of `bytes` the
    /// caller should drop.
    pub fn parse_linear(&mut self, bytes: &[u8]) -> (Packet<'_>, usize) {
        let (found, consumed) = self.scan(bytes);
        self.last = found;
        (self.packet(found), consumed)
    }

    /// The packet returned by the most recent parse call.
    pub fn last_packet(&self) -> Packet<'_> {
        self.packet(self.last)
    }

    fn packet(&self, found: Option<Found>) -> Packet<'_> {
        match found {
            Some(f) => Packet {
                command: Command(f.command),
                data: &self.scratch[3..3 + f.len as usize],
                data_length: f.len,
                is_valid: f.valid,
            },
            None => Packet::none(),
        }
    }

    fn scan<W: ByteWindow + ?Sized>(&mut self, window: &W) -> (Option<Found>, usize) {
        let mut consumed = 0;

        loop {
            let Some(start) = window.find_start(consumed) else {
                return (None, consumed);
            };
            let next_start = window.find_start(start + 1);
            let region_end = next_start.unwrap_or_else(|| window.len());

            match (self.unstuff(window, start, region_end), next_start) {
                (
                    Span::Complete {
                        command,
                        len,
                        valid,
                        wire_end,
                    },
                    Some(end),
                ) if command != Command::NONE.raw() && wire_end == end => {
                    self.count(valid);
                    return (Some(Found { command, len, valid }), end);
                }
                (_, Some(end)) => {
                    self.resync();
                    consumed = end;
                }
                (
                    Span::Complete {
                        command,
                        len,
                        valid: true,
                        wire_end,
                    },
                    None,
                ) => {
                    if command == Command::NONE.raw() {
                        self.resync();
                        consumed = wire_end;
                        continue;
                    }
                    self.count(true);
                    return (
                        Some(Found {
                            command,
                            len,
                            valid: true,
                        }),
                        wire_end,
                    );
                }
                (_, None) => return (None, consumed),
            }
        }
    }

    fn resync(&mut self) {
        self.stats.resyncs = self.stats.resyncs.wrapping_add(1);
    }

    fn count(&mut self, valid: bool) {
        if valid {
            self.stats.packets = self.stats.packets.wrapping_add(1);
        } else {
            self.stats.checksum_errors = self.stats.checksum_errors.wrapping_add(1);
        }
    }

    /// Unstuff `window[start..end]` (which begins with START) into the
    /// staging buffer.
    fn unstuff<W: ByteWindow + ?Sized>(&mut self, window: &W, start: usize, end: usize) -> Span {
        self.scratch[0] = FRAME_START;
        let mut count = 1;
        let mut unstuffer = Unstuffer::new();

        for offset in start + 1..end {
            let Some(raw) = unstuffer.push(window.get(offset)) else {
                continue;
            };
            if count == N {
                return Span::Incomplete;
            }
            self.scratch[count] = raw;
            count += 1;

            if count > 2 && count == self.scratch[2] as usize + PACKET_OVERHEAD {
                let mut sum = Checksum::new();
                sum.update_slice(&self.scratch[..count - 1]);
                return Span::Complete {
                    command: self.scratch[1],
                    len: self.scratch[2],
                    valid: sum.finalize() == self.scratch[count - 1],
                    wire_end: offset + 1,
                };
            }
        }

        Span::Incomplete
    }
}

impl<const N: usize> Default for PacketParser<N> {
    fn default() -> Self {
        Self::new()
    }
}
