//! CLI module for recordkit
//!
//! Provides command-line interface for:
//! - validate: Validate JSON records from stdin
//! - schemas: Print or export the registered schemas
//! - collection: Print the storage collection for a kind

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{boot, collection, run, run_command, schemas, validate, validate_stream};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, read_requests, write_error, write_record, write_rejection, write_response};
