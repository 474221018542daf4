// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! reg - API registry controller CLI

mod commands;
mod config;
mod error;
mod logging;
mod output;

use clap::{Parser, Subcommand};
use commands::{lint, resolve, validate};
use config::GlobalArgs;
use error::CliError;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "reg",
    version,
    about = "Keep derived API registry artifacts up to date"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan and run the actions a manifest calls for
    Resolve(resolve::ResolveArgs),
    /// Check a manifest without contacting the registry
    Validate(validate::ValidateArgs),
    /// Run a linter plugin over a spec directory
    Lint(lint::LintArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::setup_logging(cli.global.verbose);

    let result = match cli.command {
        Commands::Resolve(args) => resolve::handle(args, &cli.global).await,
        Commands::Validate(args) => validate::handle(args, &cli.global),
        Commands::Lint(args) => lint::handle(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<CliError>() {
                Some(cli_error) => eprint!("{cli_error}"),
                None => eprintln!("error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
