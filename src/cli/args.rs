//! CLI argument definitions using clap
//!
//! Commands:
//! - recordkit validate --kind <kind> [--config <path>] [--batch]
//! - recordkit schemas [--config <path>] [--export <dir>]
//! - recordkit collection <kind> [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// recordkit - schema validation for document-database records
#[derive(Parser, Debug)]
#[command(name = "recordkit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate JSON records read from stdin
    Validate {
        /// Record kind, e.g. user, product, lead
        #[arg(long)]
        kind: String,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Read one JSON object per line instead of a single object
        #[arg(long)]
        batch: bool,
    },

    /// Print the registered schemas
    Schemas {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write each schema to a file in this directory instead
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Print the storage collection for a kind
    Collection {
        /// Record kind
        kind: String,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
