//! Client implementing the reference handshake and multi-packet responses.

use std::fmt;

use rcon_proto::{Error, Packet, PacketIo, PacketType, Result};

use super::{Client, check_auth_response, expect_id, expect_type};
use crate::id::IdSource;

/// A client that follows the reference protocol exactly.
///
/// Authentication expects the server to first echo an empty
/// `RESPONSE_VALUE` and then send the auth response. Command execution
/// writes an empty `RESPONSE_VALUE` delimiter right after the command;
/// servers answer in order, so the delimiter's echo marks the end of the
/// command's output, however many packets it spans.
///
/// A server that never echoes the delimiter blocks [`exec`](Client::exec)
/// until the transport times out or fails.
pub struct StrictClient<P, G> {
    /// Packet stream of the connection.
    io: P,
    /// Source of request ids.
    ids: G,
}

impl<P: PacketIo, G: IdSource> StrictClient<P, G> {
    /// Creates a client over `io`, drawing request ids from `ids`.
    ///
    /// `ids` must not return the same value twice in a row, otherwise the
    /// delimiter cannot be told apart from the command output.
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

impl<P: PacketIo, G: IdSource> Client for StrictClient<P, G> {
    fn auth(&mut self, password: &str) -> Result<()> {
        let request_id = self.ids.next_id();
        self.io.write_packet(&Packet::auth(request_id, password))?;
        tracing::debug!(id = request_id, "sent auth request");

        let echo = self.io.read_packet()?;
        expect_type(&echo, PacketType::RESPONSE_VALUE)?;
        expect_id(&echo, request_id)?;
        if !echo.body.is_empty() {
            return Err(Error::ResponseBody {
                expected: Vec::new(),
                actual: echo.body,
            });
        }

        let response = self.io.read_packet()?;
        check_auth_response(&response, request_id)?;
        tracing::debug!(id = request_id, "authenticated");
        Ok(())
    }

    fn exec(&mut self, command: &str) -> Result<Vec<u8>> {
        let command_id = self.ids.next_id();
        self.io
            .write_packet(&Packet::exec_command(command_id, command))?;
        let delimiter_id = self.ids.next_id();
        self.io
            .write_packet(&Packet::empty_response_value(delimiter_id))?;
        tracing::debug!(id = command_id, delimiter = delimiter_id, command, "sent command");

        let mut output = Vec::new();
        let mut parts = 0usize;
        loop {
            let packet = self.io.read_packet()?;
            expect_type(&packet, PacketType::RESPONSE_VALUE)?;
            if packet.id == delimiter_id {
                break;
            }
            expect_id(&packet, command_id)?;
            output.extend_from_slice(&packet.body);
            parts += 1;
        }

        tracing::debug!(id = command_id, parts, len = output.len(), "command finished");
        Ok(output)
    }
}

impl<P: fmt::Debug, G> fmt::Debug for StrictClient<P, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrictClient")
            .field("io", &self.io)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::{MockIo, ids};

    #[test]
    fn auth_succeeds() {
        let io = MockIo::new([
            (1, PacketType::RESPONSE_VALUE, ""),
            (1, PacketType::AUTH_RESPONSE, ""),
        ]);
        let mut client = StrictClient::new(&io, ids(&[1]));
        client.auth("pw").unwrap();
        assert_eq!(io.sent(), [Packet::auth(1, "pw")]);
    }

    #[test]
    fn auth_echo_with_body() {
        let io = MockIo::new([
            (1, PacketType::RESPONSE_VALUE, "surprise"),
            (1, PacketType::AUTH_RESPONSE, ""),
        ]);
        let mut client = StrictClient::new(&io, ids(&[1]));
        match client.auth("pw") {
            Err(Error::ResponseBody { expected, actual }) => {
                assert!(expected.is_empty());
                assert_eq!(actual, b"surprise");
            }
            other => panic!("expected ResponseBody, got {other:?}"),
        }
    }

    #[test]
    fn auth_missing_echo() {
        // A server that skips the empty echo looks like a type error here.
        let io = MockIo::new([(1, PacketType::AUTH_RESPONSE, "")]);
        let mut client = StrictClient::new(&io, ids(&[1]));
        assert!(matches!(
            client.auth("pw"),
            Err(Error::InvalidResponseType {
                expected: PacketType::RESPONSE_VALUE,
                actual: PacketType::AUTH_RESPONSE
            })
        ));
    }

    #[test]
    fn auth_echo_id_mismatch() {
        let io = MockIo::new([(4, PacketType::RESPONSE_VALUE, "")]);
        let mut client = StrictClient::new(&io, ids(&[1]));
        assert!(matches!(
            client.auth("pw"),
            Err(Error::ResponseIdMismatch {
                expected: 1,
                actual: 4
            })
        ));
    }

    #[test]
    fn auth_rejected_password() {
        let io = MockIo::new([
            (1, PacketType::RESPONSE_VALUE, ""),
            (-1, PacketType::AUTH_RESPONSE, ""),
        ]);
        let mut client = StrictClient::new(&io, ids(&[1]));
        assert!(matches!(client.auth("pw"), Err(Error::AuthFailed)));
    }

    #[test]
    fn auth_response_id_mismatch() {
        let io = MockIo::new([
            (1, PacketType::RESPONSE_VALUE, ""),
            (2, PacketType::AUTH_RESPONSE, ""),
        ]);
        let mut client = StrictClient::new(&io, ids(&[1]));
        assert!(matches!(
            client.auth("pw"),
            Err(Error::ResponseIdMismatch {
                expected: 1,
                actual: 2
            })
        ));
    }

    #[test]
    fn exec_joins_parts_until_delimiter() {
        let io = MockIo::new([
            (1, PacketType::RESPONSE_VALUE, "foo"),
            (1, PacketType::RESPONSE_VALUE, "bar"),
            (2, PacketType::RESPONSE_VALUE, ""),
        ]);
        let mut client = StrictClient::new(&io, ids(&[1, 2]));
        assert_eq!(client.exec("list").unwrap(), b"foobar");

        assert_eq!(
            io.sent(),
            [
                Packet::exec_command(1, "list"),
                Packet::empty_response_value(2)
            ]
        );
        assert!(io.inbound.lock().unwrap().is_empty());
    }

    #[test]
    fn exec_empty_output() {
        let io = MockIo::new([(2, PacketType::RESPONSE_VALUE, "")]);
        let mut client = StrictClient::new(&io, ids(&[1, 2]));
        assert!(client.exec("noop").unwrap().is_empty());
    }

    #[test]
    fn exec_stops_at_delimiter() {
        let io = MockIo::new([
            (1, PacketType::RESPONSE_VALUE, "out"),
            (2, PacketType::RESPONSE_VALUE, ""),
            (1, PacketType::RESPONSE_VALUE, "late"),
        ]);
        let mut client = StrictClient::new(&io, ids(&[1, 2]));
        assert_eq!(client.exec("cmd").unwrap(), b"out");
        assert_eq!(io.inbound.lock().unwrap().len(), 1);
    }

    #[test]
    fn exec_foreign_id() {
        let io = MockIo::new([(9, PacketType::RESPONSE_VALUE, "stray")]);
        let mut client = StrictClient::new(&io, ids(&[1, 2]));
        assert!(matches!(
            client.exec("cmd"),
            Err(Error::ResponseIdMismatch {
                expected: 1,
                actual: 9
            })
        ));
    }

    #[test]
    fn exec_wrong_type() {
        let io = MockIo::new([(1, PacketType::AUTH_RESPONSE, "")]);
        let mut client = StrictClient::new(&io, ids(&[1, 2]));
        assert!(matches!(
            client.exec("cmd"),
            Err(Error::InvalidResponseType { .. })
        ));
    }

    #[test]
    fn exec_transport_closed_mid_response() {
        let io = MockIo::new([(1, PacketType::RESPONSE_VALUE, "partial")]);
        let mut client = StrictClient::new(&io, ids(&[1, 2]));
        assert!(matches!(client.exec("cmd"), Err(Error::Io(_))));
    }
}
