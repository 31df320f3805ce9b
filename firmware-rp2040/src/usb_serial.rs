//! USB CDC-ACM serial channel.
//!
//! The USB side and the slider side meet in two static byte pipes. The
//! USB tasks ([`run_receiver`], [`run_sender`]) await on the endpoints and
//! the pipes; [`UsbSerial`] only uses the non-blocking pipe calls, so the
//! slider session can poll it from thread mode.
//!
//! Writes are sliced into IN packets one byte short of the endpoint size,
//! which keeps every transfer terminated without zero-length packets.

use defmt::{info, warn};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::pipe::Pipe;
use embassy_usb::class::cdc_acm::{CdcAcmClass, Receiver, Sender, State};
use embassy_usb::driver::EndpointError;
use embassy_usb::Builder;
use portable_atomic::{AtomicBool, Ordering};
use slider_core::{ChannelError, SerialChannel};
use slider_proto::MAX_ENCODED_SIZE;

/// Max packet size of the CDC data endpoints.
pub const USB_PACKET_SIZE: u16 = 64;

/// Host-to-device pipe size.
pub const RX_PIPE_SIZE: usize = 256;

/// Device-to-host pipe size. Holds two worst-case encoded packets.
pub const TX_PIPE_SIZE: usize = 2 * MAX_ENCODED_SIZE;

/// Bytes received from the host, waiting for the session.
pub static RX_PIPE: Pipe<CriticalSectionRawMutex, RX_PIPE_SIZE> = Pipe::new();

/// Bytes queued by the session, waiting for the host.
pub static TX_PIPE: Pipe<CriticalSectionRawMutex, TX_PIPE_SIZE> = Pipe::new();

static CONNECTED: AtomicBool = AtomicBool::new(false);

type UsbDriver<'d> = Driver<'d, USB>;

/// Register a CDC-ACM class on the device builder.
pub fn configure_usb_serial<'d>(
    builder: &mut Builder<'d, UsbDriver<'d>>,
    state: &'d mut State<'d>,
) -> CdcAcmClass<'d, UsbDriver<'d>> {
    CdcAcmClass::new(builder, state, USB_PACKET_SIZE)
}

/// Whether the host side of the serial port is up.
#[inline]
#[must_use]
pub fn is_connected() -> bool {
    CONNECTED.load(Ordering::Relaxed)
}

/// Move OUT packets into [`RX_PIPE`].
///
/// Stale bytes are dropped on each new connection. A full pipe stalls the
/// endpoint until the session catches up.
pub async fn run_receiver(receiver: &mut Receiver<'_, UsbDriver<'_>>) -> ! {
    let mut buf = [0u8; USB_PACKET_SIZE as usize];
    loop {
        receiver.wait_connection().await;
        RX_PIPE.clear();
        info!("USB serial connected");

        loop {
            match receiver.read_packet(&mut buf).await {
                Ok(n) => RX_PIPE.write_all(&buf[..n]).await,
                Err(EndpointError::BufferOverflow) => warn!("USB OUT packet too large"),
                Err(EndpointError::Disabled) => break,
            }
        }
        info!("USB serial disconnected");
    }
}

/// Drain [`TX_PIPE`] into IN packets.
pub async fn run_sender(sender: &mut Sender<'_, UsbDriver<'_>>) -> ! {
    let mut buf = [0u8; USB_PACKET_SIZE as usize];
    let chunk = buf.len() - 1;
    loop {
        sender.wait_connection().await;
        TX_PIPE.clear();
        CONNECTED.store(true, Ordering::Relaxed);

        loop {
            let n = TX_PIPE.read(&mut buf[..chunk]).await;
            if let Err(e) = sender.write_packet(&buf[..n]).await {
                warn!("USB IN write failed: {:?}", e);
                break;
            }
        }
        CONNECTED.store(false, Ordering::Relaxed);
    }
}

/// [`SerialChannel`] over the USB pipes.
#[derive(Debug, Default)]
pub struct UsbSerial {
    _private: (),
}

impl UsbSerial {
    /// Create the channel handle.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl SerialChannel for UsbSerial {
    fn bytes_available(&mut self) -> usize {
        RX_PIPE.len()
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        if buf.is_empty() {
            return 0;
        }
        RX_PIPE.try_read(buf).unwrap_or(0)
    }

    fn write_headroom(&mut self) -> usize {
        TX_PIPE.free_capacity()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, ChannelError> {
        if !is_connected() {
            return Err(ChannelError::Disconnected);
        }
        if bytes.is_empty() {
            return Ok(0);
        }
        Ok(TX_PIPE.try_write(bytes).unwrap_or(0))
    }
}
