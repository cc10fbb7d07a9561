use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "fivekit")]
#[command(version)]
#[command(about = "Cache cleaning and diagnostics for the FiveM game client", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan cache targets and show reclaimable space
    Scan {
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete the contents of all cache targets
    Clean {
        /// Show what would be removed without deleting anything
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run environment health checks
    Doctor {
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List registered cache targets and their resolved paths
    Targets,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
