//! Blocking client for the Source RCON protocol.
//!
//! `rcon` layers the authentication and command-execution state machines
//! on top of the framing engine from [`rcon_proto`].
//!
//! # Quick start
//!
//! ```no_run
//! use rcon::{Config, Session};
//!
//! let config = Config::new("127.0.0.1:27015").password("secret");
//! let mut session = Session::open(&config)?;
//! let output = session.exec("status")?;
//! println!("{}", String::from_utf8_lossy(&output));
//! # Ok::<(), rcon::Error>(())
//! ```
//!
//! The clients can also be driven over any [`PacketIo`] stream:
//!
//! ```no_run
//! use std::net::TcpStream;
//! use rcon::{Client, Console, SequentialIds, StrictClient};
//!
//! let console = Console::new(TcpStream::connect("127.0.0.1:27015")?);
//! let mut client = StrictClient::new(&console, SequentialIds::default());
//! client.auth("secret")?;
//! let output = client.exec("status")?;
//! # Ok::<(), rcon::Error>(())
//! ```

mod client;
mod config;
mod id;
mod session;

pub use client::{Client, LenientClient, StrictClient};
pub use config::{Config, DEFAULT_PORT, Mode};
pub use id::{IdSource, SequentialIds, time_based_id};
pub use rcon_proto::{Console, Error, Packet, PacketIo, PacketType, Phase, Result, Transport};
pub use session::{Session, connect};
