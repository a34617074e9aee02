// Library root
// -----------
// This crate exposes the pieces of the `anylist` CLI as a library. The
// binary (`main.rs`) only parses arguments, sets up logging and maps errors
// to exit codes.
//
// Module responsibilities:
// - `api`: blocking HTTP client for the AnyList service.
// - `service`: the `ShoppingService` trait the commands run against, and
//   the scoped `Session` handle.
// - `models`: lists, items and the fixed category table.
// - `config`: credential file and environment overrides.
// - `commands`: one handler per CLI verb.
// - `output`: text / JSON rendering.
// - `ui`: prompts, spinners and the interactive menu.
//
// Commands only see the `ShoppingService` trait, so they can be exercised
// without a network (see the tests in `commands`).
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod service;
pub mod ui;

use crate::api::ApiClient;
use crate::cli::Cli;
use crate::commands::Context;
use crate::config::{env_credentials, ConfigStore};
use crate::error::CliError;
use crate::output::{color_enabled, Output, OutputFormat};
use clap::CommandFactory;
use std::io::{self, IsTerminal};

/// Runs a parsed command line against the real service.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let format = if cli.json { OutputFormat::Json } else { OutputFormat::Text };
    let mut output = Output::stdout(format, color_enabled(format, cli.no_color));
    let interactive = io::stdin().is_terminal() && io::stdout().is_terminal();
    let progress = !cli.json && io::stderr().is_terminal();

    let store = ConfigStore::default_location();
    tracing::debug!(config = %store.path().display(), interactive, "starting");

    let mut ctx = Context {
        store,
        env: env_credentials(),
        output: &mut output,
        interactive,
        progress,
    };

    match cli.command {
        Some(command) => commands::dispatch(command, &mut ctx, ApiClient::from_env),
        // Without a command: interactive menu on a terminal, usage error otherwise.
        None if interactive && !cli.json => {
            let session = commands::open_session(&ctx, ApiClient::from_env)?;
            ui::main_menu(&session, ctx.output, progress)
        }
        None => {
            eprintln!("{}", Cli::command().render_help());
            Err(CliError::Usage("No command given".into()).into())
        }
    }
}
