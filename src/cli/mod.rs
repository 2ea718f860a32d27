//! CLI module for rulebase
//!
//! Provides the command-line interface:
//! - init: Create a default config file and rules directory
//! - serve: Boot the HTTP server over the configured store
//! - import: Bulk-import rules from a JSON file
//! - list: Print all stored rules as JSON

pub mod args;
pub mod commands;
pub mod errors;

pub use args::{Cli, Command};
pub use commands::{run, run_command};
pub use errors::{CliError, CliResult};
