use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "pyup",
    about = "pyenv upgrade helper - align installed Python versions with python.org support status",
    version,
    author
)]
pub struct Cli {
    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upgrade installed Python versions to the latest supported bugfix releases
    Upgrade {
        /// Keep existing versions even if a newer bugfix is available
        #[arg(short = 'k', long)]
        keep_bugfix: bool,

        /// Remove unsupported versions entirely, including the latest bugfix
        #[arg(short = 'r', long)]
        remove_minor: bool,

        /// Do not update pyenv or its list of available versions
        #[arg(long)]
        no_update: bool,

        /// Determine the necessary changes, but do not execute them
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Show the support status of installed and available Python versions
    Status,
}
