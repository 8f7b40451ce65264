//! Error types for framing and client protocol operations.

use std::fmt;
use std::io;

use crate::packet::{MAX_BODY, MAX_PACKET, MIN_PACKET, PacketType};

/// Alias for `Result<T, rcon_proto::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// The half of an exchange in which an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Sending a packet.
    Write,
    /// Receiving or validating a packet.
    Read,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Write => "write",
            Self::Read => "read",
        })
    }
}

/// Errors returned by the framing engine and the protocol clients.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The outbound body exceeds [`MAX_BODY`]. Nothing was written.
    #[error("on write: request body is too long: {len} bytes (max {max})", max = MAX_BODY)]
    RequestTooLong {
        /// Length of the rejected body.
        len: usize,
    },

    /// A frame declared a size below [`MIN_PACKET`].
    #[error(
        "on read: unexpected response format: packet size {size} is below the minimum {min}",
        min = MIN_PACKET
    )]
    UnexpectedFormat {
        /// The declared size.
        size: i32,
    },

    /// A frame declared a size above [`MAX_PACKET`].
    #[error(
        "on read: response is too long: packet size {size} exceeds {max}",
        max = MAX_PACKET
    )]
    ResponseTooLong {
        /// The declared size.
        size: i32,
    },

    /// A packet's type is not the one the current protocol step expects.
    #[error("on read: invalid response type: expected {expected} but got {actual}")]
    InvalidResponseType {
        /// Type the step required.
        expected: PacketType,
        /// Type that arrived.
        actual: PacketType,
    },

    /// A packet's id does not match the request it answers.
    #[error("on read: response id mismatch: expected {expected} but got {actual}")]
    ResponseIdMismatch {
        /// Id of the originating request.
        expected: i32,
        /// Id that arrived.
        actual: i32,
    },

    /// The empty echo preceding an auth response carried a body.
    #[error(
        "on read: response body error: expected '{}' got '{}'",
        String::from_utf8_lossy(expected),
        String::from_utf8_lossy(actual)
    )]
    ResponseBody {
        /// Body the step required.
        expected: Vec<u8>,
        /// Body that arrived.
        actual: Vec<u8>,
    },

    /// The server rejected the password.
    #[error("on read: authentication failed")]
    AuthFailed,

    /// An error from the underlying transport.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Returns the phase the error belongs to, or `None` for transport errors.
    pub const fn phase(&self) -> Option<Phase> {
        match self {
            Self::RequestTooLong { .. } => Some(Phase::Write),
            Self::UnexpectedFormat { .. }
            | Self::ResponseTooLong { .. }
            | Self::InvalidResponseType { .. }
            | Self::ResponseIdMismatch { .. }
            | Self::ResponseBody { .. }
            | Self::AuthFailed => Some(Phase::Read),
            Self::Io(_) => None,
        }
    }
}
