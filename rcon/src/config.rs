//! Connection settings and JSON persistence.

use std::path::Path;
use std::time::Duration;
use std::{fs, io};

use serde::{Deserialize, Serialize};

/// Port most Source-engine servers listen on for RCON.
pub const DEFAULT_PORT: u16 = 27015;

/// Which protocol client to drive the connection with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Mode {
    /// Reference handshake and multi-packet output ([`StrictClient`](crate::StrictClient)).
    #[default]
    Strict,
    /// One response packet per request ([`LenientClient`](crate::LenientClient)).
    Lenient,
}

/// Settings for opening an RCON session.
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```json
/// { "address": "play.example.net:25575", "mode": "lenient", "timeout_ms": 3000 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct Config {
    /// `host:port` of the server.
    pub address: String,
    /// Password sent during authentication.
    pub password: Option<String>,
    /// Connect, read and write timeout in milliseconds; `None` blocks forever.
    pub timeout_ms: Option<u64>,
    /// Protocol client to use.
    pub mode: Mode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: format!("127.0.0.1:{DEFAULT_PORT}"),
            password: None,
            timeout_ms: Some(5_000),
            mode: Mode::default(),
        }
    }
}

impl Config {
    /// Creates a config for `address` with default settings.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// Sets the password.
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets the I/O timeout; `None` disables it.
    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout_ms = timeout.map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Sets the protocol client.
    #[must_use]
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// The configured timeout, treating `0` as no timeout.
    pub fn io_timeout(&self) -> Option<Duration> {
        self.timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    /// Loads a config from a JSON file.
    pub fn load(path: &Path) -> io::Result<Self> {
        let data = fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Writes the config to a JSON file.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let file = fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self).map_err(io::Error::other)
    }
}
