//! snipshelf - Code Snippet Shelf
//!
//! Store, tag, filter and copy short code fragments from the terminal.
//! Snippets live in two JSON slots under the user's data directory.

use clap::Parser;
use colored::Colorize;
use snipshelf::cli::{self, Cli};
use snipshelf::{config::Config, logging};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();
    color_eyre::install()?;

    let config = Config::load()?;
    logging::init_logging(&config.log_level);

    if let Err(e) = cli::execute_cli(args, &config) {
        eprintln!("{}  {} {e:#}", "┃".bright_magenta(), "Error:".bright_red());
        std::process::exit(1);
    }

    Ok(())
}
