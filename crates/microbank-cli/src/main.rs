use microbank_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Log to the XDG state dir; fall back to stderr if it is not writable.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable, using stderr: {:#}", err);
    }

    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("microbank error: {:#}", err);
        if let Some(details) = cli::error_details(&err) {
            eprintln!("microbank error details: {details}");
        }
        std::process::exit(1);
    }
}
