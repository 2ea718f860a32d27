//! CLI command implementations
//!
//! Each command loads configuration, opens the store, performs its work,
//! and reports through stdout. All failures surface as coded `CliError`s.

use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::http_server::HttpServer;
use crate::rules::{RuleDraft, RuleStore};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Parse arguments and dispatch
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Dispatch a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Init { config } => init(&config),
        Command::Serve { config } => serve(&config),
        Command::Import {
            config,
            file,
            overwrite,
        } => import(&config, &file, overwrite),
        Command::List { config } => list(&config),
    }
}

/// Create a default config file and the rules directory
pub fn init(config_path: &Path) -> CliResult<()> {
    if config_path.exists() {
        return Err(CliError::already_initialized(config_path));
    }

    // The rules directory lands next to the config file
    let mut config = Config::default();
    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        config.rules_dir = parent.join("rules").display().to_string();
    }
    config.save(config_path)?;
    open_store(&config)?;

    println!("Initialized config at {}", config_path.display());
    println!("Rules directory: {}", config.rules_dir);
    Ok(())
}

/// Boot the HTTP server and serve until the process exits
pub fn serve(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let store = open_store(&config)?;
    let server = HttpServer::new(config.http, store);

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to start runtime: {}", e)))?;
    runtime
        .block_on(server.start())
        .map_err(|e| CliError::boot_failed(format!("Server failed: {}", e)))
}

/// Bulk-import rules from a JSON array file and print the report
pub fn import(config_path: &Path, file: &Path, overwrite: bool) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let store = open_store(&config)?;

    let content = fs::read_to_string(file)
        .map_err(|e| CliError::input_error(format!("Failed to read {}: {}", file.display(), e)))?;
    let drafts: Vec<RuleDraft> = serde_json::from_str(&content).map_err(|e| {
        CliError::input_error(format!("Invalid rules JSON in {}: {}", file.display(), e))
    })?;

    let report = store
        .bulk_import(drafts, overwrite)
        .map_err(|e| CliError::store_error(e.to_string()))?;

    println!("Imported {} rule(s)", report.imported);
    for error in &report.errors {
        println!("  {}", error);
    }
    Ok(())
}

/// Print all stored rules as pretty JSON
pub fn list(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let store = open_store(&config)?;

    let rules = store.list();
    let json = serde_json::to_string_pretty(&rules)
        .map_err(|e| CliError::store_error(format!("Failed to serialize rules: {}", e)))?;
    println!("{}", json);
    Ok(())
}

fn open_store(config: &Config) -> CliResult<RuleStore> {
    RuleStore::open(&config.rules_dir).map_err(|e| CliError::store_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_config_and_refuses_rerun() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("rulebase.json");

        init(&config_path).unwrap();
        assert!(config_path.exists());
        assert!(temp.path().join("rules").is_dir());

        let err = init(&config_path).unwrap_err();
        assert_eq!(
            err.code(),
            crate::cli::errors::CliErrorCode::AlreadyInitialized
        );
    }

    #[test]
    fn test_import_reports_per_entry_errors() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("rulebase.json");
        let rules_dir = temp.path().join("rules");
        let config = Config {
            rules_dir: rules_dir.display().to_string(),
            ..Default::default()
        };
        config.save(&config_path).unwrap();

        let payload = temp.path().join("payload.json");
        fs::write(
            &payload,
            r#"[
                {"id":"java_001","language":"java","name":"SQLi",
                 "pattern":"...","severity":"high"},
                {"id":"java_002","language":"java"}
            ]"#,
        )
        .unwrap();

        import(&config_path, &payload, false).unwrap();
        assert!(rules_dir.join("java_001.json").exists());
        assert!(!rules_dir.join("java_002.json").exists());
    }

    #[test]
    fn test_list_with_missing_config_fails() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.json");
        assert!(list(&missing).is_err());
    }
}
