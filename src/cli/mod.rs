//! CLI command definitions and handlers

pub mod config;
pub mod handlers;
pub mod logging;
pub mod output;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use output::OutputFormat;

/// pico-export - export published WordPress posts as a Pico CMS content archive
#[derive(Parser, Debug)]
#[command(name = "pico-export", version, about, long_about = None)]
pub struct Cli {
    /// Content database (overrides config file)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Export every published post to a zip archive
    Export(ExportArgs),

    /// List the posts an export would include
    #[command(name = "ls")]
    List(ListArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `export` command
#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Where to write the archive ("-" for stdout; default: ./<download name>)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write a complete HTTP response (status, headers, body) to stdout
    #[arg(long, conflicts_with = "output")]
    pub http: bool,

    /// Root folder name inside the archive
    #[arg(long, value_name = "NAME")]
    pub folder: Option<String>,

    /// Skip the paragraph filter and convert bodies as stored
    #[arg(long)]
    pub no_autop: bool,

    /// Summary format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

impl ExportArgs {
    /// True if the archive bytes go to stdout.
    pub fn streams_to_stdout(&self) -> bool {
        self.http || self.output.as_deref().is_some_and(|p| p.as_os_str() == "-")
    }
}

/// Arguments for the `ls` (list) command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish)
    #[arg(value_enum)]
    pub shell: Shell,
}
