//! Session error types.

use slider_proto::EncodeError;

use crate::channel::ChannelError;

/// Error sending a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendError {
    /// The channel did not have room for the packet in time; it was dropped.
    Timeout,
    /// The packet could not be encoded.
    Encode(EncodeError),
    /// The channel failed while writing.
    Channel(ChannelError),
}

impl From<EncodeError> for SendError {
    fn from(err: EncodeError) -> Self {
        SendError::Encode(err)
    }
}

impl From<ChannelError> for SendError {
    fn from(err: ChannelError) -> Self {
        SendError::Channel(err)
    }
}

impl core::fmt::Display for SendError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Timeout => write!(f, "timed out waiting for write headroom"),
            Self::Encode(e) => write!(f, "encode failed: {e}"),
            Self::Channel(e) => write!(f, "channel failed: {e}"),
        }
    }
}
