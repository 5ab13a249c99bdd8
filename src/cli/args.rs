//! CLI argument definitions using clap
//!
//! Commands:
//! - filterdsl compile --schema <path> --entity <name> [--filters] [--search] [--sort]
//! - filterdsl run --schema <path> --entity <name> --data <path> [--limit] [--offset]

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// filterdsl - compile filter/sort/search requests into query plans
#[derive(Parser, Debug)]
#[command(name = "filterdsl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Inputs shared by every command
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Path to the schema catalog (JSON)
    #[arg(long)]
    pub schema: PathBuf,

    /// Root entity to query
    #[arg(long)]
    pub entity: String,

    /// Filter expression (JSON)
    #[arg(long)]
    pub filters: Option<String>,

    /// Free-text search term
    #[arg(long)]
    pub search: Option<String>,

    /// Sort directive: `path` or `path:desc`
    #[arg(long)]
    pub sort: Option<String>,

    /// Path to compiler configuration (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Explain plan
    #[default]
    Text,
    /// Serialized compiled plan
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a request and print its plan
    Compile {
        #[command(flatten)]
        query: QueryArgs,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Compile a request and execute it against a JSON dataset
    Run {
        #[command(flatten)]
        query: QueryArgs,

        /// Path to the dataset: {"<entity>": [rows...]}
        #[arg(long)]
        data: PathBuf,

        #[arg(long)]
        limit: Option<u64>,

        #[arg(long)]
        offset: Option<u64>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
