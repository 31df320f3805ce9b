//! Sega touch slider serial protocol: framing, parsing and encoding.
//!
//! This crate provides everything needed to speak the slider protocol used by
//! Project DIVA Arcade and Chunithm cabinets:
//!
//! - **Types**
//!   - [`Command`] - One-byte opcode
//!   - [`Packet`] - Decoded or outgoing packet (borrowed payload)
//!   - [`OwnedPacket`] - Packet with an owned payload
//!   - [`BoardInfo`] - 18-byte board identification record
//!
//! - **Receiving**
//!   - [`RingBuffer`] - Circular buffer of raw wire bytes
//!   - [`PacketParser`] - Re-entrant parser with framing recovery
//!
//! - **Sending**
//!   - [`Encode`] trait - Stuff and checksum a packet
//!
//! - **Wire helpers**
//!   - [`stuffing`] - Byte stuffing and checksum
//!   - [`text`] - ASCII decimal wire mode
//!
//! # Protocol Format
//!
//! ```text
//! 0xFF cmd len data[0..len] checksum
//! ```
//!
//! - `0xFF` - START, only ever sent raw at the beginning of a packet
//! - `cmd` - Opcode (see [`Command`])
//! - `len` - Payload length
//! - `checksum` - `0 - (0xFF + cmd + len + data..)` modulo 256
//!
//! After START, bytes equal to `0xFF` or `0xFD` are sent as `0xFD, value - 1`.
//!
//! # Example
//!
//! ```
//! use slider_proto::{Command, Encode, Packet, PacketParser, RingBuffer};
//!
//! let mut wire = [0u8; 32];
//! let len = Packet::new(Command::LED, &[0x3F, 0xFF, 0x00, 0x10])
//!     .encode(&mut wire)
//!     .unwrap();
//!
//! let mut ring = RingBuffer::<64>::new();
//! ring.write(&wire[..len]);
//!
//! let mut parser: PacketParser = PacketParser::new();
//! let packet = parser.parse_ring(&mut ring);
//! assert_eq!(packet.command, Command::LED);
//! assert_eq!(packet.data, &[0x3F, 0xFF, 0x00, 0x10]);
//! assert!(packet.is_valid);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)
//! - **`embedded-io`**: Enable `encode_io()` for I/O peripherals
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod board_info;
pub mod command;
pub mod encode;
pub mod packet;
pub mod parser;
pub mod ring;
pub mod stuffing;
pub mod text;

pub use board_info::{BoardInfo, BoardInfoError, DEFAULT_FIRMWARE_VERSION, DEVICE_CLASS_SLIDER};
pub use command::Command;
pub use encode::{max_encoded_len, Encode, EncodeError, MAX_ENCODED_SIZE, MAX_WIRE_DATA_LEN};
pub use packet::{OwnedPacket, Packet, MAX_DATA_LEN, MAX_PACKET_SIZE, MAX_STAGING_SIZE};
pub use parser::{ByteWindow, PacketParser, ParserStats};
pub use ring::RingBuffer;
pub use stuffing::{packet_checksum, Checksum, FRAME_ESCAPE, FRAME_START};
pub use text::TextByteReader;
