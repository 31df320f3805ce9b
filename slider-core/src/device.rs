//! SliderDevice: answers host commands and streams scan reports.

use slider_proto::{Command, Packet};

use crate::board::{SliderDef, RAW_KEY_COUNT};
use crate::channel::{Clock, SerialChannel};
use crate::error::SendError;
use crate::fmt::{debug, info, warn};
use crate::report::{LedFrame, ScanReport};
use crate::session::SliderSession;
use crate::transport::Transport;

/// Touch sensing hardware.
pub trait TouchSensor {
    /// Fill `raw` with the current electrode readings (0 = untouched).
    fn read(&mut self, raw: &mut [u8; RAW_KEY_COUNT]);
}

/// LED output hardware.
pub trait LedSink {
    /// Display a frame.
    fn show(&mut self, frame: &LedFrame);
}

/// What to send back for one host packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    /// Nothing.
    None,
    /// A fresh scan report.
    ScanReport,
    /// An empty packet echoing the command.
    Ack(Command),
    /// The board info record.
    BoardInfo,
}

/// A slider device: board definition plus sensor and LED hardware.
pub struct SliderDevice<S, L> {
    def: &'static SliderDef,
    sensor: S,
    leds: L,
    auto_scan: bool,
}

impl<S: TouchSensor, L: LedSink> SliderDevice<S, L> {
    /// Create a device with auto-scan off.
    pub fn new(def: &'static SliderDef, sensor: S, leds: L) -> Self {
        Self {
            def,
            sensor,
            leds,
            auto_scan: false,
        }
    }

    /// Whether a scan report is sent on every poll.
    #[must_use]
    pub fn auto_scan(&self) -> bool {
        self.auto_scan
    }

    /// The board definition.
    pub fn def(&self) -> &'static SliderDef {
        self.def
    }

    /// Apply one host packet and decide the reply.
    pub fn handle(&mut self, packet: &Packet<'_>) -> Response {
        if !packet.is_valid {
            debug!("ignoring {} with bad checksum", packet.command);
            return Response::None;
        }

        match packet.command {
            Command::SCAN_REPORT => Response::ScanReport,
            Command::LED => {
                if let Some(frame) = LedFrame::from_payload(self.def, packet.data) {
                    self.leds.show(&frame);
                }
                Response::None
            }
            Command::SCAN_ON => {
                self.auto_scan = true;
                Response::None
            }
            Command::SCAN_OFF => {
                self.auto_scan = false;
                Response::Ack(Command::SCAN_OFF)
            }
            Command::DETECT => {
                self.auto_scan = false;
                Response::Ack(Command::DETECT)
            }
            Command::BOARD_INFO => Response::BoardInfo,
            Command::EXCEPTION => {
                warn!("host reported exception ({} bytes)", packet.data_length);
                Response::None
            }
            other => {
                debug!("ignoring command {}", other);
                Response::None
            }
        }
    }

    /// Send the reply chosen by [`handle`](Self::handle).
    ///
    /// # Errors
    ///
    /// Returns the session's [`SendError`] if the reply could not be sent.
    pub fn respond<C, K, T, const N: usize>(
        &mut self,
        session: &mut SliderSession<C, K, T, N>,
        response: Response,
    ) -> Result<(), SendError>
    where
        C: SerialChannel,
        K: Clock,
        T: Transport,
    {
        match response {
            Response::None => Ok(()),
            Response::ScanReport => self.send_scan(session),
            Response::Ack(command) => session.encode_and_send(&Packet::empty(command)),
            Response::BoardInfo => {
                let bytes = self.def.board_info().to_bytes();
                session.encode_and_send(&Packet::new(Command::BOARD_INFO, &bytes))
            }
        }
    }

    /// Read the sensor and send one scan report.
    ///
    /// # Errors
    ///
    /// Returns the session's [`SendError`] if the report could not be sent.
    pub fn send_scan<C, K, T, const N: usize>(
        &mut self,
        session: &mut SliderSession<C, K, T, N>,
    ) -> Result<(), SendError>
    where
        C: SerialChannel,
        K: Clock,
        T: Transport,
    {
        let mut raw = [0u8; RAW_KEY_COUNT];
        self.sensor.read(&mut raw);
        let report = ScanReport::from_raw(self.def, &raw);
        session.encode_and_send(&Packet::new(Command::SCAN_REPORT, report.as_bytes()))
    }

    /// Run one loop iteration: receive, answer every buffered packet, then
    /// send a scan report if auto-scan is on.
    ///
    /// A failed reply does not stop the iteration.
    ///
    /// # Errors
    ///
    /// Returns the first [`SendError`] hit during the iteration.
    pub fn poll<C, K, T, const N: usize>(
        &mut self,
        session: &mut SliderSession<C, K, T, N>,
    ) -> Result<usize, SendError>
    where
        C: SerialChannel,
        K: Clock,
        T: Transport,
    {
        session.pump();

        let mut handled = 0;
        let mut first_error = None;
        loop {
            let packet = session.decode_next();
            if packet.is_none() {
                break;
            }
            let was_auto = self.auto_scan;
            let response = self.handle(&packet);
            if self.auto_scan != was_auto {
                info!("auto scan {}", if self.auto_scan { "on" } else { "off" });
            }
            handled += 1;
            if let Err(e) = self.respond(session, response) {
                warn!("reply failed: {}", e);
                first_error.get_or_insert(e);
            }
        }

        if self.auto_scan {
            if let Err(e) = self.send_scan(session) {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(handled),
        }
    }

    /// Get a reference to the sensor.
    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    /// Get a mutable reference to the sensor.
    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// Get a reference to the LED sink.
    pub fn leds(&self) -> &L {
        &self.leds
    }

    /// Decompose the device into its sensor and LED sink.
    pub fn into_parts(self) -> (S, L) {
        (self.sensor, self.leds)
    }
}
