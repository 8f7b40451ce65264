//! Single-packet client for servers that answer every request with exactly
//! one packet.

use std::fmt;

use rcon_proto::{Packet, PacketIo, PacketType, Result};

use super::{Client, check_auth_response, expect_id, expect_type};
use crate::id::IdSource;

/// A client that expects one response packet per request.
///
/// Authentication reads a single auth response (no preceding empty echo), and
/// command output is taken from a single response packet. Output that the
/// server splits across several packets is truncated to the first one; use
/// [`StrictClient`](super::StrictClient) where that matters.
pub struct LenientClient<P, G> {
    /// Packet stream of the connection.
    io: P,
    /// Source of request ids.
    ids: G,
}

impl<P: PacketIo, G: IdSource> LenientClient<P, G> {
    /// Creates a client over `io`, drawing request ids from `ids`.
    pub const fn new(io: P, ids: G) -> Self {
        Self { io, ids }
    }

    /// Returns the underlying packet stream.
    pub const fn get_ref(&self) -> &P {
        &self.io
    }

    /// Consumes the client and returns the packet stream.
    pub fn into_inner(self) -> P {
        self.io
    }
}

impl<P: PacketIo, G: IdSource> Client for LenientClient<P, G> {
    /// Sends the password and reads one auth response.
    ///
    /// Fails with [`InvalidResponseType`], [`AuthFailed`] or
    /// [`ResponseIdMismatch`], checked in that order.
    ///
    /// [`InvalidResponseType`]: rcon_proto::Error::InvalidResponseType
    /// [`AuthFailed`]: rcon_proto::Error::AuthFailed
    /// [`ResponseIdMismatch`]: rcon_proto::Error::ResponseIdMismatch
    fn auth(&mut self, password: &str) -> Result<()> {
        let request_id = self.ids.next_id();
        self.io.write_packet(&Packet::auth(request_id, password))?;
        tracing::debug!(id = request_id, "sent auth request");

        let response = self.io.read_packet()?;
        check_auth_response(&response, request_id)?;
        tracing::debug!(id = request_id, "authenticated");
        Ok(())
    }

    fn exec(&mut self, command: &str) -> Result<Vec<u8>> {
        let request_id = self.ids.next_id();
        self.io
            .write_packet(&Packet::exec_command(request_id, command))?;
        tracing::debug!(id = request_id, command, "sent command");

        let response = self.io.read_packet()?;
        expect_type(&response, PacketType::RESPONSE_VALUE)?;
        expect_id(&response, request_id)?;
        Ok(response.body)
    }
}

impl<P: fmt::Debug, G> fmt::Debug for LenientClient<P, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LenientClient")
            .field("io", &self.io)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use rcon_proto::Error;

    use super::*;
    use crate::client::mock::{MockIo, ids};

    #[test]
    fn auth_succeeds() {
        let io = MockIo::new([(1, PacketType::AUTH_RESPONSE, "")]);
        let mut client = LenientClient::new(&io, ids(&[1]));
        client.auth("pw").unwrap();

        let sent = io.sent();
        assert_eq!(sent, [Packet::new(1, PacketType::AUTH, "pw")]);
    }

    #[test]
    fn auth_rejected_password() {
        let io = MockIo::new([(-1, PacketType::AUTH_RESPONSE, "")]);
        let mut client = LenientClient::new(&io, ids(&[1]));
        assert!(matches!(client.auth("pw"), Err(Error::AuthFailed)));
    }

    #[test]
    fn auth_id_mismatch() {
        let io = MockIo::new([(2, PacketType::AUTH_RESPONSE, "")]);
        let mut client = LenientClient::new(&io, ids(&[1]));
        assert!(matches!(
            client.auth("pw"),
            Err(Error::ResponseIdMismatch {
                expected: 1,
                actual: 2
            })
        ));
    }

    #[test]
    fn auth_wrong_type() {
        let io = MockIo::new([(1, PacketType::RESPONSE_VALUE, "")]);
        let mut client = LenientClient::new(&io, ids(&[1]));
        assert!(matches!(
            client.auth("pw"),
            Err(Error::InvalidResponseType {
                expected: PacketType::AUTH_RESPONSE,
                actual: PacketType::RESPONSE_VALUE
            })
        ));
    }

    #[test]
    fn auth_type_checked_before_sentinel() {
        let io = MockIo::new([(-1, PacketType::RESPONSE_VALUE, "")]);
        let mut client = LenientClient::new(&io, ids(&[1]));
        assert!(matches!(
            client.auth("pw"),
            Err(Error::InvalidResponseType { .. })
        ));
    }

    #[test]
    fn exec_returns_body() {
        let io = MockIo::new([(1, PacketType::RESPONSE_VALUE, "bar")]);
        let mut client = LenientClient::new(&io, ids(&[1]));
        assert_eq!(client.exec("foo").unwrap(), b"bar");

        let sent = io.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, PacketType::EXEC_COMMAND);
        assert_eq!(sent[0].body, b"foo");
    }

    #[test]
    fn exec_wrong_type() {
        let io = MockIo::new([(1, PacketType::AUTH_RESPONSE, "bar")]);
        let mut client = LenientClient::new(&io, ids(&[1]));
        assert!(matches!(
            client.exec("foo"),
            Err(Error::InvalidResponseType { .. })
        ));
    }

    #[test]
    fn exec_id_mismatch() {
        let io = MockIo::new([(3, PacketType::RESPONSE_VALUE, "bar")]);
        let mut client = LenientClient::new(&io, ids(&[1]));
        assert!(matches!(
            client.exec("foo"),
            Err(Error::ResponseIdMismatch {
                expected: 1,
                actual: 3
            })
        ));
    }

    #[test]
    fn exec_oversized_command_is_not_sent() {
        let console = rcon_proto::Console::new(std::sync::Mutex::new(std::io::Cursor::new(
            Vec::<u8>::new(),
        )));
        let mut client = LenientClient::new(&console, ids(&[1]));
        let long = "x".repeat(rcon_proto::MAX_BODY + 1);
        assert!(matches!(
            client.exec(&long),
            Err(Error::RequestTooLong { .. })
        ));
        assert!(console.get_ref().lock().unwrap().get_ref().is_empty());
    }
}
