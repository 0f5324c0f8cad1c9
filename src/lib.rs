//! pico-export - export published WordPress posts as a Pico CMS content archive

pub mod cli;
pub mod convert;
pub mod domain;
pub mod export;
pub mod infra;
pub mod store;

use anyhow::Result;
use clap::Parser;

use cli::{
    Cli, Command,
    config::Config,
    handlers::{handle_completions, handle_export, handle_list},
};

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    cli::logging::init(cli.verbose);

    let config = Config::load()?;
    let db = config.database(cli.db.as_ref());

    match &cli.command {
        Command::Export(args) => handle_export(args, &config, &db),
        Command::List(args) => handle_list(args, &config, &db),
        Command::Completions(args) => handle_completions(args),
    }
}
