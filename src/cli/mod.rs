//! CLI module for filterdsl
//!
//! Provides command-line interface for:
//! - compile: print the explain plan or the serialized compiled plan
//! - run: compile and execute against a JSON dataset

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, OutputFormat, QueryArgs};
pub use commands::{compile, execute, run, run_command};
pub use errors::{CliError, CliResult};
pub use io::{write_error, write_json, write_text};
