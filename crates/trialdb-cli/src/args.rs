use clap::{Parser, Subcommand};

/// CLI arguments for trialdb-cli
#[derive(Debug, Parser)]
#[command(
    name = "trialdb",
    version,
    about = "CLI for querying the trialdb-core clinical trial search engine"
)]
pub struct CliArgs {
    /// Path to the postal-code dataset (JSON or JSON.gz)
    #[arg(short = 'p', long = "postal-data", global = true)]
    pub postal_data: Option<String>,

    /// Path to the trial catalog JSON export (default: fetch from the
    /// upstream API when built with the 'fetch' feature)
    #[arg(short = 't', long = "trials", global = true)]
    pub trials: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show a summary of the loaded datasets
    Stats,

    /// Rank trials by distance from a postal code
    Search {
        /// Five-digit postal code to search from
        postal_code: String,

        /// Keep only trials tagged with any of these keywords
        #[arg(short = 'k', long = "keywords", num_args = 1..)]
        keywords: Vec<String>,

        /// Maximum number of trials to print
        #[arg(short = 'l', long = "limit", default_value_t = 5)]
        limit: usize,
    },

    /// Show the full record for a single trial
    Trial {
        /// Trial identifier
        id: String,
    },
}
