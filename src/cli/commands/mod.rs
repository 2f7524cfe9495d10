//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use clap::Subcommand;

pub mod extract;
pub mod index;
pub mod search;
pub mod stats;

use crate::app::AppContext;
use crate::error::Result;

pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Index(args) => index::run(ctx, args),
        Commands::Search(args) => search::run(ctx, args),
        Commands::Extract(args) => extract::run(ctx, args),
        Commands::Stats(args) => stats::run(ctx, args),
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the candidate index from a folder of resumes
    Index(index::IndexArgs),

    /// Rank indexed candidates against job requirements
    Search(search::SearchArgs),

    /// Print the record extracted from one resume
    Extract(extract::ExtractArgs),

    /// Show index status
    Stats(stats::StatsArgs),
}
