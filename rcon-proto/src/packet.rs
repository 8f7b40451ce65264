//! Packet model and the structural constants of the wire format.

use std::borrow::Cow;
use std::fmt;

/// Width of the little-endian `size` prefix. Not counted by `size` itself.
pub const SIZE_FIELD: usize = 4;

/// Smallest legal `size`: id(4) + type(4) + body terminator(1) + packet terminator(1).
pub const MIN_PACKET: usize = 10;

/// Largest legal `size`, excluding the size prefix.
pub const MAX_PACKET: usize = 4096;

/// Largest body a single packet can carry.
pub const MAX_BODY: usize = MAX_PACKET - MIN_PACKET;

/// Purpose of a packet, as carried in its `type` field.
///
/// This is an open set: the server may send any value, so it is modelled as
/// a newtype rather than an enum. Note that [`PacketType::EXEC_COMMAND`] and
/// [`PacketType::AUTH_RESPONSE`] share the value `2`; the request that was just
/// sent decides which one an inbound packet is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PacketType(pub i32);

impl PacketType {
    /// Output of a command, or the echo of an empty delimiter packet.
    pub const RESPONSE_VALUE: Self = Self(0);
    /// A command to run on the server.
    pub const EXEC_COMMAND: Self = Self(2);
    /// Result of an authentication attempt.
    pub const AUTH_RESPONSE: Self = Self(2);
    /// Authentication request carrying the password.
    pub const AUTH: Self = Self(3);
}

impl From<i32> for PacketType {
    fn from(v: i32) -> Self {
        Self(v)
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single protocol message.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Packet {
    /// Request identifier, echoed by the server in its responses.
    ///
    /// `-1` on an auth response means the password was rejected.
    pub id: i32,
    /// What the packet is for.
    pub kind: PacketType,
    /// Opaque payload; conventionally ASCII.
    pub body: Vec<u8>,
}

impl Packet {
    /// Creates a packet from its parts.
    pub fn new(id: i32, kind: PacketType, body: impl Into<Vec<u8>>) -> Self {
        Self {
            id,
            kind,
            body: body.into(),
        }
    }

    /// An authentication request carrying `password`.
    pub fn auth(id: i32, password: &str) -> Self {
        Self::new(id, PacketType::AUTH, password)
    }

    /// A command execution request.
    pub fn exec_command(id: i32, command: &str) -> Self {
        Self::new(id, PacketType::EXEC_COMMAND, command)
    }

    /// An empty `RESPONSE_VALUE` packet, used as an end-of-response delimiter.
    pub fn empty_response_value(id: i32) -> Self {
        Self::new(id, PacketType::RESPONSE_VALUE, Vec::new())
    }

    /// Value of the `size` field this packet has on the wire.
    pub fn wire_size(&self) -> usize {
        self.body.len() + MIN_PACKET
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn body_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_match_wire_layout() {
        assert_eq!(MIN_PACKET, 10);
        assert_eq!(MAX_BODY, 4086);
    }

    #[test]
    fn exec_and_auth_response_share_a_value() {
        assert_eq!(PacketType::EXEC_COMMAND, PacketType::AUTH_RESPONSE);
        assert_ne!(PacketType::AUTH, PacketType::RESPONSE_VALUE);
    }

    #[test]
    fn constructors_set_kind_and_body() {
        let p = Packet::exec_command(1, "foo");
        assert_eq!(p.kind, PacketType::EXEC_COMMAND);
        assert_eq!(p.id, 1);
        assert_eq!(p.body_str(), "foo");
        assert_eq!(p.wire_size(), 13);

        let d = Packet::empty_response_value(7);
        assert_eq!(d.kind, PacketType::RESPONSE_VALUE);
        assert!(d.body.is_empty());
        assert_eq!(d.wire_size(), MIN_PACKET);

        assert_eq!(Packet::auth(2, "pw").kind, PacketType::AUTH);
    }
}
