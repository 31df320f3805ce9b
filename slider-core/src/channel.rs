//! Serial channel and clock traits consumed by the session.

/// Error type for channel operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelError {
    /// Peripheral I/O error.
    Io,
    /// Host not connected / port closed.
    Disconnected,
}

impl core::fmt::Display for ChannelError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io => write!(f, "I/O error"),
            Self::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// Non-blocking byte channel to the host.
///
/// Every method must return immediately; the session does its own bounded
/// waiting against a [`Clock`].
pub trait SerialChannel {
    /// Bytes that can be read right now without blocking.
    fn bytes_available(&mut self) -> usize;

    /// Read up to `buf.len()` bytes that are already available.
    ///
    /// Returns the number of bytes read (0 when nothing is buffered).
    fn read(&mut self, buf: &mut [u8]) -> usize;

    /// Bytes that can be written right now without blocking.
    fn write_headroom(&mut self) -> usize;

    /// Write bytes, returning how many were accepted.
    ///
    /// # Errors
    ///
    /// Returns a [`ChannelError`] if the peripheral failed.
    fn write(&mut self, bytes: &[u8]) -> Result<usize, ChannelError>;
}

/// Monotonic microsecond time source.
pub trait Clock {
    /// Microseconds since an arbitrary fixed point.
    fn now_us(&self) -> u64;
}

impl<C: SerialChannel + ?Sized> SerialChannel for &mut C {
    fn bytes_available(&mut self) -> usize {
        (**self).bytes_available()
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        (**self).read(buf)
    }

    fn write_headroom(&mut self) -> usize {
        (**self).write_headroom()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, ChannelError> {
        (**self).write(bytes)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

#[cfg(feature = "embedded-io")]
pub use io::IoChannel;

#[cfg(feature = "embedded-io")]
mod io {
    use super::{ChannelError, SerialChannel};
    use embedded_io::{Read, ReadReady, Write, WriteReady};

    /// [`SerialChannel`] over a blocking `embedded-io` peripheral.
    ///
    /// Readiness is taken from [`ReadReady`]/[`WriteReady`]; when the
    /// peripheral reports ready, one byte is assumed available (or free) so
    /// reads and writes never block.
    pub struct IoChannel<T> {
        inner: T,
    }

    impl<T> IoChannel<T> {
        /// Wrap a peripheral.
        pub fn new(inner: T) -> Self {
            Self { inner }
        }

        /// Get a reference to the peripheral.
        pub fn inner(&self) -> &T {
            &self.inner
        }

        /// Unwrap the peripheral.
        pub fn into_inner(self) -> T {
            self.inner
        }
    }

    impl<T: Read + ReadReady + Write + WriteReady> SerialChannel for IoChannel<T> {
        fn bytes_available(&mut self) -> usize {
            usize::from(self.inner.read_ready().unwrap_or(false))
        }

        fn read(&mut self, buf: &mut [u8]) -> usize {
            if buf.is_empty() || !self.inner.read_ready().unwrap_or(false) {
                return 0;
            }
            self.inner.read(&mut buf[..1]).unwrap_or(0)
        }

        fn write_headroom(&mut self) -> usize {
            usize::from(self.inner.write_ready().unwrap_or(false))
        }

        fn write(&mut self, bytes: &[u8]) -> Result<usize, ChannelError> {
            if bytes.is_empty() || !self.inner.write_ready().map_err(|_| ChannelError::Io)? {
                return Ok(0);
            }
            self.inner.write(&bytes[..1]).map_err(|_| ChannelError::Io)
        }
    }
}


#[cfg(test)]
mod tests {
    extern crate std;

    use super::mock::{MockChannel, StepClock};
    use super::*;
    use std::string::ToString;

    #[test]
    fn test_mock_channel_reads_in_order() {
        let mut ch = MockChannel::new();
        ch.feed(&[1, 2, 3]);
        let mut buf = [0u8; 2];
        assert_eq!(ch.bytes_available(), 3);
        assert_eq!(ch.read(&mut buf), 2);
        assert_eq!(buf, [1, 2]);
        assert_eq!(ch.read(&mut buf), 1);
        assert_eq!(buf[0], 3);
    }

    #[test]
    fn test_forwarding_through_mut_ref() {
        let mut ch = MockChannel::new();
        {
            let mut r = &mut ch;
            assert_eq!(SerialChannel::write(&mut r, &[9, 9]), Ok(2));
        }
        assert_eq!(ch.tx, [9, 9]);
    }

    #[test]
    fn test_step_clock() {
        let clock = StepClock::new(10);
        assert_eq!(clock.now_us(), 0);
        assert_eq!((&clock).now_us(), 10);
        assert_eq!(clock.now(), 20);
    }

    #[test]
    fn test_channel_error_display() {
        assert_eq!(ChannelError::Disconnected.to_string(), "disconnected");
    }
}
