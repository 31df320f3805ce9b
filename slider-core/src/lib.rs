//! Platform-agnostic slider device logic.
//!
//! This crate ties the [`slider_proto`] codec to a serial channel and to the
//! touch/LED hardware without any platform-specific dependencies. It can be
//! used both in embedded `no_std` environments and on host for testing.
//!
//! # Overview
//!
//! - [`channel`]: Collaborator traits ([`SerialChannel`], [`Clock`])
//! - [`transport`]: Wire modes ([`BinaryTransport`], [`TextTransport`])
//! - [`session`]: One protocol connection ([`SliderSession`])
//! - [`config`]: Timing configuration ([`SessionConfig`])
//! - [`board`]: Supported cabinets ([`SliderDef`], [`SliderKind`])
//! - [`report`]: Scan report and LED payloads ([`ScanReport`], [`LedFrame`])
//! - [`device`]: Command responder ([`SliderDevice`])
//!
//! # Main Loop
//!
//! ```ignore
//! let mut session = SliderSession::binary(channel, clock);
//! let mut device = SliderDevice::new(SliderKind::Diva.def(), sensor, leds);
//! loop {
//!     let _ = device.poll(&mut session);
//! }
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Log and format through defmt (for embedded logging)
//! - **`log`**: Log through the `log` facade
//! - **`embedded-io`**: Enable [`IoChannel`](channel::IoChannel)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

mod fmt;

pub mod board;
pub mod channel;
pub mod config;
pub mod device;
pub mod error;
pub mod report;
pub mod session;
pub mod transport;

// Re-export main types at crate root
pub use board::{SliderDef, SliderKind, CHUNI_SLIDER, DIVA_SLIDER, RAW_KEY_COUNT};
pub use channel::{ChannelError, Clock, SerialChannel};
pub use config::{SessionConfig, RX_BUFFER_SIZE};
pub use device::{LedSink, Response, SliderDevice, TouchSensor};
pub use error::SendError;
pub use report::{LedFrame, Rgb, ScanReport};
pub use session::{SessionStats, SliderSession};
pub use transport::{BinaryTransport, TextTransport, Transport};
