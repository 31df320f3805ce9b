//! Touch slider controller firmware for RP2040.
//!
//! The board enumerates as a USB CDC-ACM serial port and speaks the slider
//! packet protocol to the game host: it answers board-info and scan
//! requests, streams scan reports while auto scan is on, and accepts LED
//! frames.
//!
//! # Hardware Configuration
//!
//! | Function   | GPIO  | Description |
//! |------------|-------|-------------|
//! | Touch pads | 0-15  | One pad per key pair, active low with pull-up |
//! | LED        | 25    | On-board LED (lit while auto scan is on) |
//! | USB        | -     | CDC-ACM serial to the host |
//!
//! # Architecture
//!
//! The firmware uses the Embassy async runtime with four concurrent tasks:
//!
//! - **USB Task**: Manages the USB device stack
//! - **Receiver Task**: Moves OUT packets into [`RX_PIPE`](usb_serial::RX_PIPE)
//! - **Sender Task**: Drains [`TX_PIPE`](usb_serial::TX_PIPE) into IN packets
//! - **Slider Task**: Ticks a [`SliderDevice`] over a [`SliderSession`] on
//!   [`UsbSerial`], which only touches the pipes and never awaits USB
//!
//! # Modules
//!
//! - [`usb_serial`]: CDC-ACM serial channel ([`UsbSerial`])
//! - [`pads`]: GPIO touch sensor ([`GpioPads`])
//! - [`leds`]: LED sink ([`LogLeds`])
//! - [`clock`]: Microsecond clock ([`EmbassyClock`])
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//! - **`board-diva`** (default): Project DIVA Arcade key and LED layout
//! - **`board-chuni`**: Chunithm key and LED layout
//! - **`text-wire`**: ASCII decimal wire mode
//!
//! # Re-exports
//!
//! This crate re-exports the main items from [`slider_core`] so the binary
//! only needs to depend on this crate.

#![no_std]

#[cfg(all(feature = "board-diva", feature = "board-chuni"))]
compile_error!("Cannot enable both `board-diva` and `board-chuni` features - they select conflicting key layouts");

#[cfg(not(any(feature = "board-diva", feature = "board-chuni")))]
compile_error!("Enable one of the `board-diva` or `board-chuni` features");

pub use slider_core::{
    LedFrame, LedSink, SessionConfig, SliderDef, SliderDevice, SliderKind, SliderSession,
    TouchSensor,
};

pub mod clock;
pub mod leds;
pub mod pads;
pub mod usb_serial;

pub use clock::EmbassyClock;
pub use leds::LogLeds;
pub use pads::{GpioPads, PAD_COUNT};
pub use usb_serial::{configure_usb_serial, UsbSerial};

/// Board selected at build time.
#[cfg(feature = "board-chuni")]
pub const BOARD: SliderKind = SliderKind::Chuni;

/// Board selected at build time.
#[cfg(not(feature = "board-chuni"))]
pub const BOARD: SliderKind = SliderKind::Diva;

/// Wire mode selected at build time.
#[cfg(feature = "text-wire")]
pub type WireTransport = slider_core::TextTransport;

/// Wire mode selected at build time.
#[cfg(not(feature = "text-wire"))]
pub type WireTransport = slider_core::BinaryTransport;

/// The session type the firmware runs.
pub type FirmwareSession = SliderSession<UsbSerial, EmbassyClock, WireTransport>;

/// Session timings for the firmware.
///
/// The USB tasks share the executor with the session, so the pipes cannot
/// change while the session waits: reads take one pass and a full TX pipe
/// drops the packet at once.
pub const SESSION_CONFIG: SessionConfig = SessionConfig::new()
    .with_idle_timeout_us(0)
    .with_send_wait_us(0);

/// Build the firmware session over the USB serial pipes.
#[must_use]
pub fn new_session() -> FirmwareSession {
    SliderSession::new(
        UsbSerial::new(),
        EmbassyClock,
        WireTransport::default(),
        SESSION_CONFIG,
    )
}
