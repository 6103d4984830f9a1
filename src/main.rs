mod cli;
mod error;
mod pyenv;
mod python;
mod reconcile;
mod report;
mod workflow;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use std::process;

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        unsafe {
            std::env::set_var("PYUP_VERBOSE", "1");
        }
    }

    let result = match cli.command {
        Commands::Upgrade {
            keep_bugfix,
            remove_minor,
            no_update,
            dry_run,
        } => workflow::execute_upgrade(keep_bugfix, remove_minor, no_update, dry_run),
        Commands::Status => workflow::execute_status(),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
