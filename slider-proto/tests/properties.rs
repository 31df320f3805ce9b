//! Property tests for the slider codec.

use proptest::prelude::*;
use slider_proto::stuffing::{encode_byte, Unstuffer};
use slider_proto::{
    packet_checksum, Command, Encode, Packet, PacketParser, RingBuffer, FRAME_START,
    MAX_ENCODED_SIZE,
};

fn encode(command: u8, data: &[u8]) -> Vec<u8> {
    let mut buf = [0u8; MAX_ENCODED_SIZE];
    let len = Packet::new(Command(command), data).encode(&mut buf).unwrap();
    buf[..len].to_vec()
}

fn command() -> impl Strategy<Value = u8> {
    1u8..=255
}

/// Whether `wire` (after a START) unstuffs to exactly one packet.
fn is_exact_frame(wire: &[u8]) -> bool {
    let mut unstuffer = Unstuffer::new();
    let raw: Vec<u8> = wire.iter().filter_map(|&w| unstuffer.push(w)).collect();
    !unstuffer.escape_pending() && raw.len() >= 2 && raw.len() == raw[1] as usize + 3
}

proptest! {
    #[test]
    fn round_trip(cmd in command(), data in proptest::collection::vec(any::<u8>(), 0..=124)) {
        let wire = encode(cmd, &data);
        let mut parser: PacketParser = PacketParser::new();
        let (packet, consumed) = parser.parse_linear(&wire);

        prop_assert_eq!(packet.command, Command(cmd));
        prop_assert_eq!(packet.data, &data[..]);
        prop_assert_eq!(packet.data_length as usize, data.len());
        prop_assert!(packet.is_valid);
        prop_assert_eq!(consumed, wire.len());
    }

    #[test]
    fn stuffing_is_lossless(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let mut unstuffer = Unstuffer::new();
        let mut out = Vec::new();
        for &raw in &bytes {
            for &wire in encode_byte(raw).as_slice() {
                prop_assert_ne!(wire, 0xFF);
                if let Some(b) = unstuffer.push(wire) {
                    out.push(b);
                }
            }
        }
        prop_assert_eq!(out, bytes);
    }

    #[test]
    fn flipped_payload_byte_is_rejected(
        cmd in command(),
        data in proptest::collection::vec(any::<u8>(), 1..=64),
        index in any::<prop::sample::Index>(),
        flip in 1u8..=255,
    ) {
        let i = index.index(data.len());
        let mut corrupted = data.clone();
        corrupted[i] ^= flip;

        // Corrupted payload carrying the original checksum, closed by a START.
        let mut wire = vec![FRAME_START];
        for raw in [cmd, corrupted.len() as u8]
            .into_iter()
            .chain(corrupted.iter().copied())
            .chain(core::iter::once(packet_checksum(cmd, &data)))
        {
            wire.extend_from_slice(encode_byte(raw).as_slice());
        }
        wire.push(FRAME_START);

        let mut parser: PacketParser = PacketParser::new();
        let (packet, _) = parser.parse_linear(&wire);
        prop_assert_eq!(packet.command, Command(cmd));
        prop_assert!(!packet.is_valid);
    }

    #[test]
    fn partial_packet_is_never_surfaced(
        cmd in command(),
        data in proptest::collection::vec(any::<u8>(), 0..=32),
    ) {
        let wire = encode(cmd, &data);
        let mut ring = RingBuffer::<200>::new();
        let mut parser: PacketParser = PacketParser::new();

        for (i, &b) in wire.iter().enumerate() {
            prop_assert!(ring.push(b));
            let packet = parser.parse_ring(&mut ring);
            if i + 1 < wire.len() {
                prop_assert!(packet.is_none());
            } else {
                prop_assert_eq!(packet.command, Command(cmd));
                prop_assert!(packet.is_valid);
            }
        }
        prop_assert!(ring.is_empty());
    }

    #[test]
    fn chunked_stream_yields_every_packet(
        packets in proptest::collection::vec(
            (command(), proptest::collection::vec(any::<u8>(), 0..=16)),
            1..8,
        ),
        chunk in 1usize..24,
    ) {
        let wire: Vec<u8> = packets
            .iter()
            .flat_map(|(cmd, data)| encode(*cmd, data))
            .collect();

        let mut ring = RingBuffer::<200>::new();
        let mut parser: PacketParser = PacketParser::new();
        let mut seen = Vec::new();

        for piece in wire.chunks(chunk) {
            prop_assert_eq!(ring.write(piece), piece.len());
            loop {
                let packet = parser.parse_ring(&mut ring);
                if packet.is_none() {
                    break;
                }
                prop_assert!(packet.is_valid);
                seen.push((packet.command.raw(), packet.data.to_vec()));
            }
        }

        prop_assert_eq!(seen, packets);
    }

    #[test]
    fn junk_span_never_hides_next_packet(junk in proptest::array::uniform13(0u8..FRAME_START)) {
        prop_assume!(!is_exact_frame(&junk));

        let mut wire = vec![FRAME_START];
        wire.extend_from_slice(&junk);
        wire.extend_from_slice(&[FRAME_START, 0x01, 0x00, packet_checksum(0x01, &[])]);

        let mut ring = RingBuffer::<64>::new();
        let mut parser: PacketParser = PacketParser::new();
        ring.write(&wire);

        let packet = parser.parse_ring(&mut ring);
        prop_assert_eq!(packet.command, Command::SCAN_REPORT);
        prop_assert!(packet.is_valid);
        prop_assert!(ring.is_empty());
        prop_assert_eq!(parser.stats().resyncs, 1);
    }
}
