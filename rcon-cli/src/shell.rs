//! Line-oriented command loop over stdin.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result};

use crate::conn::ConnArgs;

/// Runs every non-empty stdin line as a command until EOF, `quit` or `exit`.
///
/// A failed command ends the loop: after a protocol error the connection is
/// in an unknown state.
pub fn run(conn: &ConnArgs) -> Result<()> {
    let mut session = conn.open()?;
    let interactive = io::stdin().is_terminal();
    if interactive {
        eprintln!("connected to {}; type quit to leave", session.peer_addr());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            eprint!("> ");
            io::stderr().flush()?;
        }
        let Some(read) = lines.next() else { break };
        let line = read?;
        let command = line.trim();
        match command {
            "" => {}
            "quit" | "exit" => break,
            _ => {
                let output = session
                    .exec(command)
                    .with_context(|| format!("executing {command:?}"))?;
                crate::print_output(&output)?;
            }
        }
    }
    Ok(())
}
