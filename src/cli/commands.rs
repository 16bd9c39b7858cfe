//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

use crate::config::Goal;

#[derive(Parser)]
#[command(name = "sentiflow")]
#[command(about = "Clean social posts and run them through sentiment analysis")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file (default: config.toml, then config.example.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize a single text and print the result
    Clean {
        /// Text to normalize
        text: String,
        /// Print the text after every stage
        #[arg(long)]
        explain: bool,
    },
    /// Consume posts and write them to CSV
    Run {
        /// Override the configured goal
        #[arg(long, value_enum)]
        goal: Option<Goal>,
        /// Override the configured source (JSON-lines file, `-` for stdin)
        #[arg(long)]
        source: Option<String>,
        /// Append to the output CSV instead of truncating it
        #[arg(long)]
        append: bool,
    },
    /// Load the preprocessing tables and report their sizes
    Tables,
    /// Show current configuration
    Config,
}
