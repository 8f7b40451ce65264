//! Wire framing for the Source RCON protocol.
//!
//! Packets are framed with a 4-byte little-endian size prefix followed by
//! the id, the type, the body and two NUL terminators. [`Console`] reads and
//! writes such frames over any reliable byte stream ([`Transport`]),
//! recovering packet boundaries no matter how the stream chunks its data.

mod codec;
mod error;
mod packet;
mod transport;

pub use codec::{Console, encode};
pub use error::{Error, Phase, Result};
pub use packet::{MAX_BODY, MAX_PACKET, MIN_PACKET, Packet, PacketType, SIZE_FIELD};
pub use transport::{PacketIo, Transport};
