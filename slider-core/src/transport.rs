//! Wire modes: how protocol bytes are carried over the serial channel.
//!
//! [`BinaryTransport`] passes wire bytes through untouched. [`TextTransport`]
//! carries each wire byte as ASCII decimal plus a space and ends each
//! outbound packet with a newline, which makes the protocol usable from a
//! plain serial terminal.

use slider_proto::text::{self, write_text_byte, TextByteReader, MAX_TEXT_BYTE_LEN};
use slider_proto::RingBuffer;

use crate::channel::{ChannelError, SerialChannel};

/// Channel bytes moved per read call in binary mode.
const READ_CHUNK: usize = 32;

/// A wire mode.
pub trait Transport {
    /// Move whatever is available from `channel` into `ring`.
    ///
    /// Never reads more than `ring` can hold, so unread bytes stay queued in
    /// the channel. Returns the number of wire bytes added to `ring`.
    fn read_into<C: SerialChannel, const N: usize>(
        &mut self,
        channel: &mut C,
        ring: &mut RingBuffer<N>,
    ) -> usize;

    /// Channel bytes needed to send the encoded packet `wire`.
    fn channel_len(&self, wire: &[u8]) -> usize;

    /// Send one encoded packet.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError`] if the channel fails or stops accepting bytes.
    fn write_packet<C: SerialChannel>(
        &mut self,
        channel: &mut C,
        wire: &[u8],
    ) -> Result<(), ChannelError>;
}

/// Write all of `bytes`, failing if the channel stops making progress.
fn write_all<C: SerialChannel>(channel: &mut C, mut bytes: &[u8]) -> Result<(), ChannelError> {
    while !bytes.is_empty() {
        let n = channel.write(bytes)?;
        if n == 0 {
            return Err(ChannelError::Io);
        }
        bytes = &bytes[n..];
    }
    Ok(())
}

/// Raw binary wire mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BinaryTransport;

impl Transport for BinaryTransport {
    fn read_into<C: SerialChannel, const N: usize>(
        &mut self,
        channel: &mut C,
        ring: &mut RingBuffer<N>,
    ) -> usize {
        let mut total = 0;
        loop {
            let want = channel.bytes_available().min(ring.free()).min(READ_CHUNK);
            if want == 0 {
                return total;
            }
            let mut chunk = [0u8; READ_CHUNK];
            let got = channel.read(&mut chunk[..want]);
            if got == 0 {
                return total;
            }
            total += ring.write(&chunk[..got]);
        }
    }

    fn channel_len(&self, wire: &[u8]) -> usize {
        wire.len()
    }

    fn write_packet<C: SerialChannel>(
        &mut self,
        channel: &mut C,
        wire: &[u8],
    ) -> Result<(), ChannelError> {
        write_all(channel, wire)
    }
}

/// ASCII decimal wire mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextTransport {
    reader: TextByteReader,
}

impl TextTransport {
    /// Create a text transport with no partial token.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            reader: TextByteReader::new(),
        }
    }
}

impl Transport for TextTransport {
    fn read_into<C: SerialChannel, const N: usize>(
        &mut self,
        channel: &mut C,
        ring: &mut RingBuffer<N>,
    ) -> usize {
        let mut total = 0;
        while !ring.is_full() && channel.bytes_available() > 0 {
            let mut ch = [0u8; 1];
            if channel.read(&mut ch) == 0 {
                break;
            }
            if let Some(byte) = self.reader.push(ch[0]) {
                if ring.push(byte) {
                    total += 1;
                }
            }
        }
        total
    }

    fn channel_len(&self, wire: &[u8]) -> usize {
        let mut tmp = [0u8; MAX_TEXT_BYTE_LEN];
        wire.iter()
            .map(|&b| write_text_byte(&mut tmp, b))
            .sum::<usize>()
            + 1
    }

    fn write_packet<C: SerialChannel>(
        &mut self,
        channel: &mut C,
        wire: &[u8],
    ) -> Result<(), ChannelError> {
        let mut tmp = [0u8; MAX_TEXT_BYTE_LEN];
        for &b in wire {
            let len = write_text_byte(&mut tmp, b);
            write_all(channel, &tmp[..len])?;
        }
        write_all(channel, &[text::TEXT_PACKET_TERMINATOR])
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::channel::mock::MockChannel;

    #[test]
    fn test_binary_read_respects_ring_space() {
        let mut ch = MockChannel::new();
        ch.feed(&[1, 2, 3, 4, 5, 6]);
        let mut ring = RingBuffer::<5>::new();

        let n = BinaryTransport.read_into(&mut ch, &mut ring);
        assert_eq!(n, 4);
        assert!(ring.is_full());
        assert_eq!(ch.rx.len(), 2);
    }

    #[test]
    fn test_binary_read_large_burst() {
        let mut ch = MockChannel::new();
        ch.feed(&[0x42; 100]);
        let mut ring = RingBuffer::<200>::new();
        assert_eq!(BinaryTransport.read_into(&mut ch, &mut ring), 100);
        assert_eq!(ring.pending(), 100);
    }

    #[test]
    fn test_binary_write() {
        let mut ch = MockChannel::new();
        BinaryTransport
            .write_packet(&mut ch, &[0xFF, 0x01, 0x00, 0x00])
            .unwrap();
        assert_eq!(ch.tx, [0xFF, 0x01, 0x00, 0x00]);
        assert_eq!(BinaryTransport.channel_len(&[0xFF, 0x01]), 2);
    }

    #[test]
    fn test_write_stalls_are_errors() {
        let mut ch = MockChannel::new();
        ch.headroom = 0;
        assert_eq!(
            BinaryTransport.write_packet(&mut ch, &[1]),
            Err(ChannelError::Io)
        );
    }

    #[test]
    fn test_text_read() {
        let mut ch = MockChannel::new();
        ch.feed(b"255 1 0 0 \n");
        let mut ring = RingBuffer::<16>::new();
        let mut transport = TextTransport::new();

        assert_eq!(transport.read_into(&mut ch, &mut ring), 4);
        assert_eq!(ring.peek(0), Some(0xFF));
        assert_eq!(ring.peek(1), Some(0x01));
        assert_eq!(ring.peek(3), Some(0x00));
    }

    #[test]
    fn test_text_read_keeps_partial_token() {
        let mut ch = MockChannel::new();
        let mut ring = RingBuffer::<16>::new();
        let mut transport = TextTransport::new();

        ch.feed(b"25");
        assert_eq!(transport.read_into(&mut ch, &mut ring), 0);
        ch.feed(b"3 ");
        assert_eq!(transport.read_into(&mut ch, &mut ring), 1);
        assert_eq!(ring.peek(0), Some(253));
    }

    #[test]
    fn test_text_write() {
        let mut ch = MockChannel::new();
        let mut transport = TextTransport::new();
        let wire = [0xFF, 0xF0, 0x00, 0x11];

        transport.write_packet(&mut ch, &wire).unwrap();
        assert_eq!(ch.tx, b"255 240 0 17 \n");
        assert_eq!(transport.channel_len(&wire), ch.tx.len());
    }
}
