//! Binary entry point: parse the command line, set up logging, then either run
//! the scripted demo or open the data file and drive the Ratatui event loop.
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use library_lending::{demo, logger, run_app, App, JsonStore, LendingService};
use tracing::info;

#[derive(Parser)]
#[command(name = "library-lending")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON data file
    #[arg(long, env = "LIBRARY_LENDING_DATA")]
    data_file: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG is used if invalid
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log file for the terminal UI (defaults to lending.log beside the data file)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive terminal UI (default)
    Tui,
    /// Print a scripted walkthrough of the lending rules
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Tui) {
        Command::Demo => {
            logger::init(&cli.log_level, cli.log_file.as_deref())?;
            demo::run()
        }
        Command::Tui => {
            let data_file = match cli.data_file {
                Some(path) => path,
                None => JsonStore::default_path()?,
            };
            let log_file = cli
                .log_file
                .unwrap_or_else(|| data_file.with_file_name("lending.log"));
            logger::init(&cli.log_level, Some(&log_file))?;
            info!(data_file = %data_file.display(), "starting lending desk");

            let service = LendingService::open(JsonStore::new(data_file))?;
            let mut app = App::new(service);
            run_app(&mut app)
        }
    }
}
