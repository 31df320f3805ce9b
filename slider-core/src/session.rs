//! SliderSession: one protocol connection over a serial channel.

use slider_proto::{
    Encode, Packet, PacketParser, ParserStats, RingBuffer, FRAME_START, MAX_ENCODED_SIZE,
};

use crate::channel::{Clock, SerialChannel};
use crate::config::{SessionConfig, RX_BUFFER_SIZE};
use crate::error::SendError;
use crate::fmt::{debug, trace, warn};
use crate::transport::{BinaryTransport, Transport};

/// Counters kept by the session on top of [`ParserStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionStats {
    /// Wire bytes moved into the receive buffer.
    pub bytes_received: u32,
    /// Times a full receive buffer was cleared to make progress.
    pub overflow_recoveries: u32,
    /// Packets dropped because the channel had no room in time.
    pub dropped_sends: u32,
}

/// A slider protocol session.
///
/// Owns the receive ring buffer and parser for one serial connection. All
/// waiting is bounded busy waiting against `K`.
///
/// # Example
///
/// ```ignore
/// let mut session = SliderSession::binary(channel, clock);
/// loop {
///     session.pump();
///     loop {
///         let packet = session.decode_next();
///         if packet.is_none() {
///             break;
///         }
///         // dispatch on packet.command
///     }
/// }
/// ```
pub struct SliderSession<C, K, T = BinaryTransport, const N: usize = RX_BUFFER_SIZE> {
    channel: C,
    clock: K,
    transport: T,
    config: SessionConfig,
    ring: RingBuffer<N>,
    parser: PacketParser,
    stats: SessionStats,
}

impl<C: SerialChannel, K: Clock> SliderSession<C, K> {
    /// Binary-mode session with the default configuration.
    pub fn binary(channel: C, clock: K) -> Self {
        Self::new(channel, clock, BinaryTransport, SessionConfig::default())
    }
}

impl<C: SerialChannel, K: Clock, T: Transport, const N: usize> SliderSession<C, K, T, N> {
    /// Create a session.
    pub fn new(channel: C, clock: K, transport: T, config: SessionConfig) -> Self {
        Self {
            channel,
            clock,
            transport,
            config,
            ring: RingBuffer::new(),
            parser: PacketParser::new(),
            stats: SessionStats::default(),
        }
    }

    /// Move available bytes from the channel into the receive buffer.
    ///
    /// Keeps reading until no byte arrived for `idle_timeout_us`, the
    /// `receive_budget_us` is spent, or the buffer is full. Returns the
    /// number of wire bytes received.
    pub fn pump(&mut self) -> usize {
        let start = self.clock.now_us();
        let mut last_byte = start;
        let mut total = 0;

        loop {
            let n = self.transport.read_into(&mut self.channel, &mut self.ring);
            let now = self.clock.now_us();
            if n > 0 {
                total += n;
                last_byte = now;
            }
            if self.ring.is_full()
                || now.saturating_sub(last_byte) >= self.config.idle_timeout_us
                || now.saturating_sub(start) >= self.config.receive_budget_us
            {
                break;
            }
        }

        self.stats.bytes_received = self.stats.bytes_received.wrapping_add(total as u32);
        if total > 0 {
            trace!("received {} bytes, {} pending", total, self.ring.pending());
        }
        total
    }

    /// Decode the next packet from the receive buffer.
    ///
    /// Returns [`Packet::none()`] when no complete packet is buffered. The
    /// packet borrows the session; copy it with
    /// [`Packet::to_owned_packet`] to keep it.
    pub fn decode_next(&mut self) -> Packet<'_> {
        if !self.parse_once() && self.ring.is_full() {
            self.recover_overflow();
            self.parse_once();
        }
        self.parser.last_packet()
    }

    /// Pump the channel, then decode the next packet.
    pub fn poll(&mut self) -> Packet<'_> {
        self.pump();
        self.decode_next()
    }

    /// Encode `packet` and write it to the channel.
    ///
    /// Waits up to `send_wait_us` for the channel to have room for the whole
    /// packet. On timeout the packet is dropped, not queued.
    ///
    /// # Errors
    ///
    /// - [`SendError::Timeout`] if room did not appear in time
    /// - [`SendError::Encode`] if the packet cannot be encoded
    /// - [`SendError::Channel`] if the channel failed mid-write
    pub fn encode_and_send(&mut self, packet: &Packet<'_>) -> Result<(), SendError> {
        let mut buf = [0u8; MAX_ENCODED_SIZE];
        let len = packet.encode(&mut buf)?;
        let wire = &buf[..len];
        let needed = self.transport.channel_len(wire);

        let start = self.clock.now_us();
        while self.channel.write_headroom() < needed {
            if self.clock.now_us().saturating_sub(start) >= self.config.send_wait_us {
                self.stats.dropped_sends = self.stats.dropped_sends.wrapping_add(1);
                warn!("dropped {} packet: no room for {} bytes", packet.command, needed);
                return Err(SendError::Timeout);
            }
        }

        self.transport.write_packet(&mut self.channel, wire)?;
        trace!("sent {} ({} bytes)", packet.command, len);
        Ok(())
    }

    /// Run the parser once; returns whether a packet came out.
    fn parse_once(&mut self) -> bool {
        let before = self.parser.stats();
        let found = self.parser.parse_ring(&mut self.ring).is_some();
        let after = self.parser.stats();

        if after.resyncs != before.resyncs {
            warn!(
                "framing resync: dropped {} truncated packet(s)",
                after.resyncs.wrapping_sub(before.resyncs)
            );
        }
        if after.checksum_errors != before.checksum_errors {
            debug!("checksum mismatch on {}", self.parser.last_packet().command);
        }
        found
    }

    /// Make room in a full receive buffer the parser cannot consume.
    ///
    /// Junk ahead of the first START is dropped; if the buffer already starts
    /// with START, everything up to the next START goes (or all of it).
    fn recover_overflow(&mut self) {
        let skip = match self.ring.position_from(0, FRAME_START) {
            Some(0) => self.ring.position_from(1, FRAME_START),
            other => other,
        };
        match skip {
            Some(n) => self.ring.advance_by(n),
            None => self.ring.clear(),
        }
        self.stats.overflow_recoveries = self.stats.overflow_recoveries.wrapping_add(1);
        warn!("receive buffer full, discarded to {} pending", self.ring.pending());
    }

    /// Session counters.
    #[must_use]
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Parser counters.
    #[must_use]
    pub fn parser_stats(&self) -> ParserStats {
        self.parser.stats()
    }

    /// The timing configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The receive buffer.
    pub fn ring(&self) -> &RingBuffer<N> {
        &self.ring
    }

    /// Get a reference to the channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Get a mutable reference to the channel.
    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Get a reference to the clock.
    pub fn clock(&self) -> &K {
        &self.clock
    }

    /// Decompose the session into its channel and clock.
    pub fn into_parts(self) -> (C, K) {
        (self.channel, self.clock)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::channel::mock::{MockChannel, StepClock};
    use crate::channel::ChannelError;
    use crate::transport::TextTransport;
    use slider_proto::{Command, OwnedPacket};
    use std::vec::Vec;

    fn wire(command: Command, data: &[u8]) -> Vec<u8> {
        let mut buf = [0u8; MAX_ENCODED_SIZE];
        let len = Packet::new(command, data).encode(&mut buf).unwrap();
        buf[..len].to_vec()
    }

    fn session() -> SliderSession<MockChannel, StepClock> {
        SliderSession::binary(MockChannel::new(), StepClock::new(100))
    }

    fn drain<C: SerialChannel, K: Clock, T: Transport, const N: usize>(
        s: &mut SliderSession<C, K, T, N>,
    ) -> Vec<OwnedPacket> {
        let mut out = Vec::new();
        loop {
            let p = s.decode_next();
            if p.is_none() {
                return out;
            }
            out.push(p.to_owned_packet().unwrap());
        }
    }

    #[test]
    fn test_poll_decodes_packet() {
        let mut s = session();
        s.channel_mut().feed(&wire(Command::BOARD_INFO, &[]));

        let p = s.poll();
        assert_eq!(p.command, Command::BOARD_INFO);
        assert!(p.is_valid);
        assert_eq!(s.stats().bytes_received, 4);
    }

    #[test]
    fn test_pump_without_data_ends_on_idle_timeout() {
        let mut s = session();
        assert_eq!(s.pump(), 0);
        // 100 us per clock reading, 1000 us idle timeout
        assert!(s.clock().now() <= 1_300);
    }

    #[test]
    fn test_pump_stops_when_ring_full() {
        let mut s = session();
        s.channel_mut().feed(&[0x11; 300]);
        assert_eq!(s.pump(), RX_BUFFER_SIZE - 1);
        assert!(s.ring().is_full());
        assert_eq!(s.channel().rx.len(), 300 - (RX_BUFFER_SIZE - 1));
    }

    #[test]
    fn test_several_packets_in_one_pump() {
        let mut s = session();
        let mut bytes = wire(Command::SCAN_ON, &[]);
        bytes.extend(wire(Command::LED, &[1, 2, 3, 4]));
        bytes.extend(wire(Command::DETECT, &[]));
        s.channel_mut().feed(&bytes);

        s.pump();
        let packets = drain(&mut s);
        let commands: Vec<Command> = packets.iter().map(|p| p.command).collect();
        assert_eq!(commands, [Command::SCAN_ON, Command::LED, Command::DETECT]);
        assert_eq!(&packets[1].data[..], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_overflow_recovery_with_junk() {
        let mut s = session();
        s.channel_mut().feed(&[0x11; 250]);
        s.pump();
        assert!(s.ring().is_full());

        assert!(s.decode_next().is_none());
        assert!(s.ring().is_empty());
        assert_eq!(s.stats().overflow_recoveries, 1);

        s.channel_mut().rx.clear();
        s.channel_mut().feed(&wire(Command::SCAN_REPORT, &[]));
        assert_eq!(s.poll().command, Command::SCAN_REPORT);
    }

    #[test]
    fn test_overflow_recovery_keeps_packet_after_junk() {
        let mut s = session();
        let mut bytes = std::vec![0x22u8; RX_BUFFER_SIZE - 1 - 3];
        bytes.extend_from_slice(&[0xFF, 0x02, 0x05]);
        s.channel_mut().feed(&bytes);
        s.pump();
        assert!(s.ring().is_full());

        assert!(s.decode_next().is_none());
        assert_eq!(s.ring().pending(), 3);

        s.channel_mut()
            .feed(&[1, 2, 3, 4, 5, slider_proto::packet_checksum(0x02, &[1, 2, 3, 4, 5])]);
        let p = s.poll();
        assert_eq!(p.command, Command::LED);
        assert_eq!(p.data, &[1, 2, 3, 4, 5]);
        assert!(p.is_valid);
    }

    #[test]
    fn test_resync_is_counted() {
        let mut s = session();
        let mut bytes = std::vec![0xFF, 0x02, 0x40, 0x00];
        bytes.extend(wire(Command::SCAN_OFF, &[]));
        s.channel_mut().feed(&bytes);

        assert_eq!(s.poll().command, Command::SCAN_OFF);
        assert_eq!(s.parser_stats().resyncs, 1);
    }

    #[test]
    fn test_encode_and_send() {
        let mut s = session();
        s.encode_and_send(&Packet::empty(Command::SCAN_REPORT))
            .unwrap();
        assert_eq!(s.channel().tx, [0xFF, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn test_send_times_out_without_headroom() {
        let mut s = session();
        s.channel_mut().headroom = 2;

        assert_eq!(
            s.encode_and_send(&Packet::empty(Command::DETECT)),
            Err(SendError::Timeout)
        );
        assert!(s.channel().tx.is_empty());
        assert_eq!(s.stats().dropped_sends, 1);
    }

    #[test]
    fn test_send_channel_error() {
        let mut s = session();
        s.channel_mut().fail_writes = true;
        assert_eq!(
            s.encode_and_send(&Packet::empty(Command::DETECT)),
            Err(SendError::Channel(ChannelError::Io))
        );
    }

    #[test]
    fn test_send_payload_too_large() {
        let mut s = session();
        let data = [0u8; 300];
        assert_eq!(
            s.encode_and_send(&Packet::new(Command::LED, &data)),
            Err(SendError::Encode(slider_proto::EncodeError::PayloadTooLarge))
        );
    }

    #[test]
    fn test_text_session_round_trip() {
        let mut s: SliderSession<MockChannel, StepClock, TextTransport> = SliderSession::new(
            MockChannel::new(),
            StepClock::new(100),
            TextTransport::new(),
            SessionConfig::default(),
        );
        s.channel_mut().feed(b"255 240 0 17 \n");
        assert_eq!(s.poll().command, Command::BOARD_INFO);

        s.encode_and_send(&Packet::empty(Command::DETECT)).unwrap();
        // 0 - 0xFF - 0x10 - 0 = 0xF1
        assert_eq!(s.channel().tx, b"255 16 0 241 \n");
    }

    #[test]
    fn test_text_headroom_counts_text_bytes() {
        let mut s: SliderSession<MockChannel, StepClock, TextTransport> = SliderSession::new(
            MockChannel::new(),
            StepClock::new(100),
            TextTransport::new(),
            SessionConfig::default(),
        );
        // Four wire bytes would fit, their text form does not.
        s.channel_mut().headroom = 8;
        assert_eq!(
            s.encode_and_send(&Packet::empty(Command::DETECT)),
            Err(SendError::Timeout)
        );
    }
}
