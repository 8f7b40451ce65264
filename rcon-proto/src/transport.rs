//! Byte-stream and packet-stream capabilities the framing engine and the
//! clients are written against.

use std::io::{self, Read, Write};
use std::net::TcpStream;
#[cfg(unix)]
use std::os::unix::net::UnixStream;
use std::sync::{Arc, Mutex, PoisonError};

use crate::{Packet, Result};

/// A reliable byte stream that can be read and written through a shared
/// reference.
///
/// `read` may return fewer bytes than requested; `Ok(0)` means the peer
/// closed the stream. `write_all` either writes every byte or fails.
/// Timeouts and connection lifecycle belong to the implementor.
pub trait Transport {
    /// Reads whatever is available into `buf`, blocking until at least one
    /// byte arrives or the stream ends.
    fn read(&self, buf: &mut [u8]) -> io::Result<usize>;

    /// Writes all of `bytes`.
    fn write_all(&self, bytes: &[u8]) -> io::Result<()>;
}

impl Transport for TcpStream {
    fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        let mut stream = self;
        Read::read(&mut stream, buf)
    }

    fn write_all(&self, bytes: &[u8]) -> io::Result<()> {
        let mut stream = self;
        Write::write_all(&mut stream, bytes)
    }
}

#[cfg(unix)]
impl Transport for UnixStream {
    fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        let mut stream = self;
        Read::read(&mut stream, buf)
    }

    fn write_all(&self, bytes: &[u8]) -> io::Result<()> {
        let mut stream = self;
        Write::write_all(&mut stream, bytes)
    }
}

/// Adapts any owned `Read + Write` stream. Reads and writes take turns on the
/// lock, which matches the one-request-at-a-time shape of the protocol.
impl<S: Read + Write> Transport for Mutex<S> {
    fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        let mut stream = self.lock().unwrap_or_else(PoisonError::into_inner);
        Read::read(&mut *stream, buf)
    }

    fn write_all(&self, bytes: &[u8]) -> io::Result<()> {
        let mut stream = self.lock().unwrap_or_else(PoisonError::into_inner);
        Write::write_all(&mut *stream, bytes)?;
        Write::flush(&mut *stream)
    }
}

/// Reads and writes whole packets.
///
/// Implemented by [`Console`](crate::Console); the protocol clients are
/// generic over it so they can be driven by a scripted stream in tests.
pub trait PacketIo {
    /// Reads the next packet.
    fn read_packet(&self) -> Result<Packet>;

    /// Writes one packet.
    fn write_packet(&self, packet: &Packet) -> Result<()>;
}

impl<P: PacketIo + ?Sized> PacketIo for &P {
    fn read_packet(&self) -> Result<Packet> {
        (**self).read_packet()
    }

    fn write_packet(&self, packet: &Packet) -> Result<()> {
        (**self).write_packet(packet)
    }
}

impl<P: PacketIo + ?Sized> PacketIo for Arc<P> {
    fn read_packet(&self) -> Result<Packet> {
        (**self).read_packet()
    }

    fn write_packet(&self, packet: &Packet) -> Result<()> {
        (**self).write_packet(packet)
    }
}

impl<P: PacketIo + ?Sized> PacketIo for Box<P> {
    fn read_packet(&self) -> Result<Packet> {
        (**self).read_packet()
    }

    fn write_packet(&self, packet: &Packet) -> Result<()> {
        (**self).write_packet(packet)
    }
}
