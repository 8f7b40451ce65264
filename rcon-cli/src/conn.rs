//! Connection flags and their merge with the config file.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use rcon::{Config, Mode, Session};

/// Connection flags shared by every subcommand.
#[derive(clap::Args, Debug, Default)]
pub struct ConnArgs {
    /// JSON config file; flags and environment override its values.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Server address as host:port.
    #[arg(short, long, global = true, env = "RCON_ADDRESS")]
    pub address: Option<String>,

    /// Password used to authenticate.
    #[arg(short, long, global = true, env = "RCON_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Connect/read/write timeout in milliseconds (0 disables it).
    #[arg(short, long, global = true)]
    pub timeout: Option<u64>,

    /// Expect one response packet per request instead of the full handshake.
    #[arg(long, global = true)]
    pub lenient: bool,
}

impl ConnArgs {
    /// Builds the effective config: file first, then flags.
    pub fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(address) = &self.address {
            config.address.clone_from(address);
        }
        if let Some(password) = &self.password {
            config = config.password(password.as_str());
        }
        if let Some(ms) = self.timeout {
            config = config.timeout(Some(Duration::from_millis(ms)));
        }
        if self.lenient {
            config = config.mode(Mode::Lenient);
        }

        if config.password.is_none() {
            bail!("no password given (use --password, RCON_PASSWORD or the config file)");
        }
        Ok(config)
    }

    /// Connects and authenticates.
    pub fn open(&self) -> Result<Session> {
        let config = self.config()?;
        tracing::debug!(
            address = %config.address,
            mode = ?config.mode,
            timeout_ms = ?config.timeout_ms,
            "opening session"
        );
        Session::open(&config).with_context(|| format!("connecting to {}", config.address))
    }
}
