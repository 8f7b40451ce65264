//! Length-prefixed frame codec over any [`Transport`].
//!
//! Each frame is `[i32 LE size][i32 LE id][i32 LE type][body][0x00][0x00]`,
//! where `size` counts every byte after the size field itself.

use std::fmt;
use std::io;
use std::sync::{Mutex, PoisonError};

use crate::packet::{MAX_BODY, MAX_PACKET, MIN_PACKET, Packet, PacketType, SIZE_FIELD};
use crate::transport::{PacketIo, Transport};
use crate::{Error, Result};

/// Serializes `packet` into a single frame.
///
/// Fails with [`Error::RequestTooLong`] if the body exceeds [`MAX_BODY`].
pub fn encode(packet: &Packet) -> Result<Vec<u8>> {
    let len = packet.body.len();
    if len > MAX_BODY {
        return Err(Error::RequestTooLong { len });
    }

    // Bounded by MAX_PACKET above.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let size = (len + MIN_PACKET) as i32;

    let mut frame = Vec::with_capacity(SIZE_FIELD + MIN_PACKET + len);
    frame.extend_from_slice(&size.to_le_bytes());
    frame.extend_from_slice(&packet.id.to_le_bytes());
    frame.extend_from_slice(&packet.kind.0.to_le_bytes());
    frame.extend_from_slice(&packet.body);
    // Body terminator, then packet terminator.
    frame.extend_from_slice(&[0, 0]);
    Ok(frame)
}

/// Validates a declared `size` and returns the full frame length including
/// the size prefix.
fn frame_len(size: i32) -> Result<usize> {
    match usize::try_from(size) {
        Ok(n) if n < MIN_PACKET => Err(Error::UnexpectedFormat { size }),
        Ok(n) if n > MAX_PACKET => Err(Error::ResponseTooLong { size }),
        Ok(n) => Ok(n + SIZE_FIELD),
        Err(_) => Err(Error::UnexpectedFormat { size }),
    }
}

/// Reads a little-endian `i32` from the first four bytes of `bytes`.
fn le_i32(bytes: &[u8]) -> i32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[..4]);
    i32::from_le_bytes(raw)
}

/// Parses `id`, `type` and body out of a frame with its size prefix removed.
/// The caller guarantees `payload.len() >= MIN_PACKET`.
fn parse_payload(payload: &[u8]) -> Packet {
    let id = le_i32(&payload[0..4]);
    let kind = PacketType(le_i32(&payload[4..8]));
    let body = payload[8..payload.len() - 2].to_vec();
    Packet { id, kind, body }
}

/// Scratch space owned by one [`Console`]'s read path.
struct ReadState {
    /// Large enough for the biggest legal frame.
    buf: Box<[u8]>,
    /// Bytes received past the end of the previous frame.
    queued: Vec<u8>,
}

impl fmt::Debug for ReadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadState")
            .field("capacity", &self.buf.len())
            .field("queued", &self.queued.len())
            .finish()
    }
}

/// Framing engine for one connection.
///
/// Turns a [`Transport`] byte stream into a stream of [`Packet`]s. Reads are
/// serialized by an internal lock, so a console shared between threads never
/// interleaves the assembly of two frames. Writes are not locked: each packet
/// goes out as exactly one `write_all`, and callers that write from several
/// threads must order those writes themselves.
#[derive(Debug)]
pub struct Console<T> {
    /// The underlying byte stream.
    transport: T,
    /// Scratch buffer and carry-over, guarded for concurrent readers.
    reader: Mutex<ReadState>,
}

impl<T: Transport> Console<T> {
    /// Wraps `transport`.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            reader: Mutex::new(ReadState {
                buf: vec![0u8; MAX_PACKET + SIZE_FIELD].into_boxed_slice(),
                queued: Vec::new(),
            }),
        }
    }

    /// Returns the underlying transport.
    pub const fn get_ref(&self) -> &T {
        &self.transport
    }

    /// Consumes the console and returns the transport. Any bytes already
    /// received for a following frame are dropped.
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Writes `packet` as one frame.
    ///
    /// An oversized body fails with [`Error::RequestTooLong`] before any I/O.
    pub fn write_packet(&self, packet: &Packet) -> Result<()> {
        let frame = encode(packet)?;
        self.transport.write_all(&frame)?;
        tracing::trace!(
            id = packet.id,
            kind = packet.kind.0,
            len = packet.body.len(),
            "wrote packet"
        );
        Ok(())
    }

    /// Reads the next packet, however many transport reads it takes.
    ///
    /// Bytes that arrive past the end of this frame are kept and used by the
    /// next call. A transport error aborts the read; no partial packet is
    /// returned.
    pub fn read_packet(&self) -> Result<Packet> {
        let mut state = self.reader.lock().unwrap_or_else(PoisonError::into_inner);
        let ReadState { buf, queued } = &mut *state;

        let mut filled = if queued.is_empty() {
            self.fill(buf, 0)?
        } else {
            let n = queued.len();
            buf[..n].copy_from_slice(queued.as_slice());
            queued.clear();
            n
        };

        // The size field itself may arrive in pieces.
        while filled < SIZE_FIELD {
            filled = self.fill(buf, filled)?;
        }

        let size = le_i32(&buf[..SIZE_FIELD]);
        let total = frame_len(size)?;

        while filled < total {
            filled = self.fill(buf, filled)?;
        }

        if filled > total {
            queued.extend_from_slice(&buf[total..filled]);
        }

        let packet = parse_payload(&buf[SIZE_FIELD..total]);
        tracing::trace!(
            id = packet.id,
            kind = packet.kind.0,
            len = packet.body.len(),
            queued = queued.len(),
            "read packet"
        );
        Ok(packet)
    }

    /// Performs one transport read into `buf[filled..]` and returns the new
    /// fill level. End of stream is an error: a frame is always pending here.
    fn fill(&self, buf: &mut [u8], filled: usize) -> io::Result<usize> {
        let n = self.transport.read(&mut buf[filled..])?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed by peer",
            ));
        }
        Ok(filled + n)
    }
}

impl<T: Transport> PacketIo for Console<T> {
    fn read_packet(&self) -> Result<Packet> {
        Self::read_packet(self)
    }

    fn write_packet(&self, packet: &Packet) -> Result<()> {
        Self::write_packet(self, packet)
    }
}
