//! CLI argument definitions using clap
//!
//! Commands:
//! - rulebase init --config <path>
//! - rulebase serve --config <path>
//! - rulebase import --config <path> <file> [--overwrite]
//! - rulebase list --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;

/// rulebase - Durable rule storage for the code audit system
#[derive(Parser, Debug)]
#[command(name = "rulebase")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a default config file and the rules directory
    Init {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },

    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },

    /// Bulk-import rules from a JSON array file
    Import {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// JSON file containing an array of rule candidates
        file: PathBuf,

        /// Overwrite rules whose ids already exist
        #[arg(long)]
        overwrite: bool,
    },

    /// Print all stored rules as JSON
    List {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_defaults_config_path() {
        let cli = Cli::try_parse_from(["rulebase", "init"]).unwrap();
        match cli.command {
            Command::Init { config } => {
                assert_eq!(config, PathBuf::from(DEFAULT_CONFIG_PATH));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_import_parses_file_and_overwrite() {
        let cli = Cli::try_parse_from(["rulebase", "import", "rules.json", "--overwrite"]).unwrap();
        match cli.command {
            Command::Import {
                file, overwrite, ..
            } => {
                assert_eq!(file, PathBuf::from("rules.json"));
                assert!(overwrite);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_import_requires_file() {
        assert!(Cli::try_parse_from(["rulebase", "import"]).is_err());
    }
}
