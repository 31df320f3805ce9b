//! Session timing and buffer configuration.

/// Receive ring buffer size in bytes (one slot stays free).
pub const RX_BUFFER_SIZE: usize = 200;

/// Default idle timeout: stop reading once no byte arrived for this long.
pub const DEFAULT_IDLE_TIMEOUT_US: u64 = 1_000;

/// Default absolute budget for one receive pass.
pub const DEFAULT_RECEIVE_BUDGET_US: u64 = 6_000;

/// Default wait for write headroom before a packet is dropped.
pub const DEFAULT_SEND_WAIT_US: u64 = 5_000;

/// Runtime timing parameters for a [`SliderSession`](crate::SliderSession).
///
/// # Example
///
/// ```
/// use slider_core::SessionConfig;
///
/// let config = SessionConfig::default().with_send_wait_us(2_000);
/// assert_eq!(config.send_wait_us, 2_000);
/// assert_eq!(config.idle_timeout_us, 1_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionConfig {
    /// Receive pass ends when no byte arrived for this many microseconds.
    pub idle_timeout_us: u64,
    /// Receive pass ends after this many microseconds regardless.
    pub receive_budget_us: u64,
    /// Longest wait for write headroom before a packet is dropped.
    pub send_wait_us: u64,
}

impl SessionConfig {
    /// Configuration with the default timings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            idle_timeout_us: DEFAULT_IDLE_TIMEOUT_US,
            receive_budget_us: DEFAULT_RECEIVE_BUDGET_US,
            send_wait_us: DEFAULT_SEND_WAIT_US,
        }
    }

    /// Set the receive idle timeout.
    #[must_use]
    pub const fn with_idle_timeout_us(mut self, us: u64) -> Self {
        self.idle_timeout_us = us;
        self
    }

    /// Set the absolute receive budget.
    #[must_use]
    pub const fn with_receive_budget_us(mut self, us: u64) -> Self {
        self.receive_budget_us = us;
        self
    }

    /// Set the send headroom wait.
    #[must_use]
    pub const fn with_send_wait_us(mut self, us: u64) -> Self {
        self.send_wait_us = us;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}
