//! Protocol clients: authentication and command execution over a
//! [`PacketIo`](rcon_proto::PacketIo) stream.
//!
//! Two variants are provided. [`LenientClient`] reads exactly one packet per
//! request and works with servers that skip parts of the reference handshake.
//! [`StrictClient`] follows the reference handshake and reassembles command
//! output split across several packets.

mod lenient;
mod strict;

pub use lenient::LenientClient;
pub use strict::StrictClient;

use rcon_proto::{Error, Packet, PacketType, Result};

/// Operations every protocol client provides.
pub trait Client {
    /// Authenticates the connection with `password`.
    fn auth(&mut self, password: &str) -> Result<()>;

    /// Runs `command` on the server and returns its output.
    fn exec(&mut self, command: &str) -> Result<Vec<u8>>;
}

impl<C: Client + ?Sized> Client for Box<C> {
    fn auth(&mut self, password: &str) -> Result<()> {
        (**self).auth(password)
    }

    fn exec(&mut self, command: &str) -> Result<Vec<u8>> {
        (**self).exec(command)
    }
}

/// Fails unless `packet` has the type the current step expects.
fn expect_type(packet: &Packet, expected: PacketType) -> Result<()> {
    if packet.kind == expected {
        Ok(())
    } else {
        Err(Error::InvalidResponseType {
            expected,
            actual: packet.kind,
        })
    }
}

/// Fails unless `packet` answers the request with id `expected`.
fn expect_id(packet: &Packet, expected: i32) -> Result<()> {
    if packet.id == expected {
        Ok(())
    } else {
        Err(Error::ResponseIdMismatch {
            expected,
            actual: packet.id,
        })
    }
}

/// Checks an auth response to the request with id `request_id`.
///
/// The type tag alone cannot tell an auth response from a command echo; the
/// caller knows it just sent an auth request.
fn check_auth_response(packet: &Packet, request_id: i32) -> Result<()> {
    expect_type(packet, PacketType::AUTH_RESPONSE)?;
    if packet.id == -1 {
        return Err(Error::AuthFailed);
    }
    expect_id(packet, request_id)
}
