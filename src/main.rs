// Entrypoint for the CLI application.
// - Keeps `main` small: parse arguments, set up logging, hand over to `run`.
// - Errors come back as `anyhow::Error` and are mapped to exit codes here.

use anylist_cli::cli::Cli;
use anylist_cli::error::exit_code_for;
use anylist_cli::output::{print_error, OutputFormat};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    anylist_cli::logging::init(cli.verbose);
    let format = if cli.json { OutputFormat::Json } else { OutputFormat::Text };

    match anylist_cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            tracing::debug!(code, "command failed");
            print_error(format, &format!("{:#}", e), code);
            ExitCode::from(code)
        }
    }
}
