use hs_cli::commands::{build_cli, PARAMETER_VERBOSE};
use hs_cli::exit_codes::CliExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::execute_command;

/// Logging goes to stderr so command output on stdout stays clean.
/// `--verbose` forces debug level for this crate, otherwise `RUST_LOG` decides.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("hs_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Main entry point for the program
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let code = match build_cli().try_get_matches() {
        Ok(matches) => {
            init_logging(matches.get_flag(PARAMETER_VERBOSE));

            match execute_command(&matches).await {
                Ok(code) => code,
                Err(e) => {
                    eprintln!("{}", e);
                    e.exit_code()
                }
            }
        }
        Err(e) => {
            init_logging(false);
            // help and version go to stdout and are not failures
            if let Err(print_error) = e.print() {
                debug!("Failed printing usage: {}", print_error);
            }
            if e.use_stderr() {
                CliExitCode::UsageError
            } else {
                CliExitCode::Success
            }
        }
    };

    std::process::exit(code.into());
}
