//! CLI command definitions and dispatch for the `asintel` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod extract;
pub mod fetch;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Analyze Amazon products from ASIN batches.
#[derive(Parser)]
#[command(name = "asintel", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive analysis chat session.
    Chat {
        /// Marketplace to query (US, GB, DE, ...). Defaults to the
        /// configured marketplace.
        #[arg(long)]
        domain: Option<String>,
    },

    /// Extract ASINs from a CSV file and print the batch.
    Extract {
        /// Path to a CSV file of ASINs.
        path: PathBuf,
    },

    /// Fetch product fields for ASINs given on the command line.
    Fetch {
        /// ASINs to look up.
        #[arg(required = true)]
        asins: Vec<String>,

        /// Fields to retrieve (title, brand, rating, review_count,
        /// price, sales_rank, monthly_sold, image). Defaults to the
        /// configured field set.
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,

        /// Marketplace to query (US, GB, DE, ...).
        #[arg(long)]
        domain: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
