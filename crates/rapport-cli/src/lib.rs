//! Rapport CLI library.
//!
//! This library provides the core functionality for the Rapport command-line interface,
//! including configuration management, command execution, and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;

use rapport_graph::SocialService;
use rapport_store::SqliteStore;
use std::fs;
use std::path::Path;

/// Social service backed by the SQLite database the CLI operates on.
pub type Service = SocialService<SqliteStore>;

/// Open (creating if needed) the database at `path` with the configured engine settings.
pub fn open_service(path: &Path, config: &Config) -> Result<Service> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let store = SqliteStore::new(path)?;
    tracing::debug!(path = %path.display(), "Opened database");
    Ok(SocialService::new(store, config.graph.clone())?)
}

/// Run a parsed command and return its rendered output.
pub fn dispatch(command: Command, service: &Service, formatter: &Formatter) -> Result<String> {
    match command {
        Command::Account(args) => commands::execute_account(args, service, formatter),
        Command::Post(args) => commands::execute_post(args, service, formatter),
        Command::Follow(args) => commands::execute_follow(args, service, formatter),
        Command::Unfollow(args) => commands::execute_unfollow(args, service, formatter),
        Command::View(args) => commands::execute_view(args, service, formatter),
        Command::React(args) => commands::execute_react(args, service, formatter),
        Command::Stats(args) => commands::execute_stats(args, service, formatter),
        Command::Repair => commands::execute_repair(service, formatter),
    }
}
