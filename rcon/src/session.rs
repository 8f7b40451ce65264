//! TCP connection setup and authenticated sessions.

use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};

use rcon_proto::{Console, Result};

use crate::client::{Client, LenientClient, StrictClient};
use crate::config::{Config, Mode};
use crate::id::SequentialIds;

/// Opens a TCP connection to `config.address` and wraps it in a [`Console`].
///
/// Each resolved address is tried in turn. The configured timeout bounds the
/// connect and becomes the socket's read and write timeout.
pub fn connect(config: &Config) -> Result<Console<TcpStream>> {
    let timeout = config.io_timeout();
    let mut last_err = None;

    for addr in config.address.to_socket_addrs()? {
        let attempt = match timeout {
            Some(t) => TcpStream::connect_timeout(&addr, t),
            None => TcpStream::connect(addr),
        };
        match attempt {
            Ok(stream) => {
                stream.set_read_timeout(timeout)?;
                stream.set_write_timeout(timeout)?;
                stream.set_nodelay(true)?;
                tracing::info!(%addr, ?timeout, "connected");
                return Ok(Console::new(stream));
            }
            Err(e) => {
                tracing::debug!(%addr, error = %e, "connect attempt failed");
                last_err = Some(e);
            }
        }
    }

    Err(last_err
        .unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} did not resolve to any address", config.address),
            )
        })
        .into())
}

/// A connected, optionally authenticated, RCON session.
pub struct Session {
    /// Protocol client chosen by [`Config::mode`].
    client: Box<dyn Client + Send>,
    /// Address of the server.
    peer: SocketAddr,
}

impl Session {
    /// Connects, picks the client for `config.mode` and, if a password is
    /// configured, authenticates.
    pub fn open(config: &Config) -> Result<Self> {
        let console = connect(config)?;
        let peer = console.get_ref().peer_addr()?;
        let ids = SequentialIds::default();

        let mut client: Box<dyn Client + Send> = match config.mode {
            Mode::Strict => Box::new(StrictClient::new(console, ids)),
            Mode::Lenient => Box::new(LenientClient::new(console, ids)),
        };

        if let Some(password) = &config.password {
            client.auth(password)?;
            tracing::info!(%peer, mode = ?config.mode, "session authenticated");
        }

        Ok(Self { client, peer })
    }

    /// Address of the server.
    pub const fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Authenticates with `password`.
    pub fn auth(&mut self, password: &str) -> Result<()> {
        self.client.auth(password)
    }

    /// Runs `command` and returns its output.
    pub fn exec(&mut self, command: &str) -> Result<Vec<u8>> {
        self.client.exec(command)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("peer", &self.peer)
            .finish_non_exhaustive()
    }
}
