//! Command-line interface definitions for Topic Scout.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! The API key can be provided via command-line flag or environment variable.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::models::TimeRange;

/// Command-line arguments for the Topic Scout application.
///
/// # Examples
///
/// ```sh
/// # Search two topics, five articles each, over the last two weeks
/// topic_scout search --topics "rust, distributed systems"
///
/// # Narrower search, exported to CSV in ./exports
/// topic_scout search -t solar -n 3 -r 1week --csv -o ./exports
///
/// # Saved searches
/// topic_scout history
/// topic_scout show 1
/// topic_scout export 1
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to config.yaml file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search for recent articles about one or more topics
    Search {
        /// Comma-separated topics to search
        #[arg(short, long)]
        topics: String,

        /// Articles to request per topic
        #[arg(short = 'n', long, default_value_t = 5)]
        count: u32,

        /// How far back to look: 1week, 2weeks, 1month, 2months, or quarter
        #[arg(short, long, default_value = "2weeks")]
        range: TimeRange,

        /// Perplexity API key
        #[arg(long, env = "PERPLEXITY_API_KEY")]
        api_key: Option<String>,

        /// Export the results to a CSV file after searching
        #[arg(long)]
        csv: bool,

        /// Directory for exported CSV files
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// List saved searches, newest first
    History,

    /// Print a saved search as a ready-to-edit search command
    Show {
        /// Position in the history list (1 = most recent)
        index: usize,
    },

    /// Export a saved search's articles to a CSV file
    Export {
        /// Position in the history list (1 = most recent)
        index: usize,

        /// Directory for exported CSV files
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}
