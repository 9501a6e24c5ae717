//! Runs a command and turns its outcome into output and an exit code.

use std::error::Error as StdError;
use std::io::{self, Write};

use tracing::debug;

use crate::{
    client::ApiClient,
    command::Command,
    error::{CommandError, CommandResult},
    exit_codes::CliExitCode,
};

/// Execute `command` once and report the outcome on the process streams.
///
/// Returns 0 on success, 1 on domain related errors (unauthorized, resource
/// doesn't exist, bad input) and 2 on infrastructure errors (no connection,
/// I/O failures).
pub async fn run<C: Command>(client: &ApiClient, command: &C, args: &[String]) -> CliExitCode {
    let result = command.execute(client, args).await;
    let stdout = io::stdout();
    let stderr = io::stderr();
    report(result, &mut stdout.lock(), &mut stderr.lock())
}

/// Write the outcome of a command to `out`/`err` and pick the exit code
pub fn report<O: Write, E: Write>(result: CommandResult, out: &mut O, err: &mut E) -> CliExitCode {
    match result {
        Ok(payload) => match write_payload(&payload, out) {
            Ok(()) => CliExitCode::Success,
            Err(e) => {
                debug!("Failed writing command output: {}", e);
                CliExitCode::SystemFailure
            }
        },
        Err(error) => {
            if error.is_system_failure() {
                log_cause_chain(&error);
            }
            if let Err(e) = writeln!(err, "{}", error) {
                debug!("Failed writing error message: {}", e);
            }
            error.exit_code()
        }
    }
}

fn write_payload<O: Write>(payload: &[u8], out: &mut O) -> io::Result<()> {
    out.write_all(payload)?;
    // text gets a trailing newline, binary payloads are written untouched
    if let Ok(text) = std::str::from_utf8(payload) {
        if !text.ends_with('\n') {
            out.write_all(b"\n")?;
        }
    }
    out.flush()
}

fn log_cause_chain(error: &CommandError) {
    let mut cause = error.cause().map(|c| c as &(dyn StdError + 'static));
    while let Some(current) = cause {
        debug!("{}", current);
        cause = current.source();
    }
}
