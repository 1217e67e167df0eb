//! Broadside: interactive fleet battle odds.
//!
//! This binary reads line commands from stdin and writes responses to
//! stdout. Logs go to stderr.

use std::io::{self, BufRead, Write};
use std::path::Path;

use broadside::protocol::parser::{parse_command, Command};
use broadside::session::{Session, SessionError};

/// Runs the main command loop, reading commands from stdin
/// and writing responses to stdout.
fn main() {
    broadside::logging::init("warn");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut session = Session::new();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        let result = match cmd {
            Command::Add { ships } | Command::Preset { ships } => {
                session.add_ships(ships);
                Ok(())
            }
            Command::Remove { index } => session.remove_ship(index).map(|_| ()),
            Command::Clear => {
                session.clear();
                Ok(())
            }
            Command::List => session.handle_list(&mut out),
            Command::Load { path } => session.load(Path::new(&path)),
            Command::SetOption { name, value } => {
                session.set_option(name, value);
                Ok(())
            }
            Command::Simulate { trials } => session.handle_simulate(trials, &mut out),
            Command::IsReady => session.handle_isready(&mut out),
            Command::Quit => break,
        };

        if let Err(e) = result {
            report_error(&mut out, &e);
        }
    }

    let _ = out.flush();
}

/// Writes an `error` line so clients can tell a failed command apart.
fn report_error<W: Write>(out: &mut W, e: &SessionError) {
    tracing::warn!(error = %e, "command failed");
    let _ = writeln!(out, "error {}", e);
    let _ = out.flush();
}
