//! Command-line client for Source RCON servers.

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::missing_docs_in_private_items
)]

mod conn;
mod shell;

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rcon", version, about = "Remote console client for Source RCON servers")]
struct Cli {
    #[command(flatten)]
    conn: conn::ConnArgs,

    /// Log protocol steps to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a single command and print its output.
    Exec {
        /// Command and arguments, joined with spaces.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        command: Vec<String>,
    },

    /// Read commands from stdin, one per line, and print each response.
    Shell,

    /// Generate shell completion scripts.
    #[command(hide = true)]
    Completion {
        /// Target shell.
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = cli.dispatch() {
        eprintln!("rcon: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

impl Cli {
    fn dispatch(self) -> Result<()> {
        match self.command {
            Command::Exec { command } => exec(&self.conn, &command.join(" ")),
            Command::Shell => shell::run(&self.conn),
            Command::Completion { shell } => {
                clap_complete::generate(shell, &mut Self::command(), "rcon", &mut io::stdout());
                Ok(())
            }
        }
    }
}

fn exec(conn: &conn::ConnArgs, command: &str) -> Result<()> {
    let mut session = conn.open()?;
    let output = session
        .exec(command)
        .with_context(|| format!("executing {command:?}"))?;
    print_output(&output)
}

/// Writes a command's output to stdout, ending it with a newline.
pub(crate) fn print_output(output: &[u8]) -> Result<()> {
    let mut out = io::stdout().lock();
    out.write_all(output)?;
    if !output.ends_with(b"\n") {
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
