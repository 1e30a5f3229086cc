mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, LinksConfig, LoggingConfig, StorageConfig};
pub use database::{ImportBundle, ImportSummary, SqliteStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the creatordesk data directory, creating it if needed.
///
/// `CREATORDESK_HOME` overrides the location outright. Otherwise it is
/// `~/.config/creatordesk[-dev]/`, with the `-dev` suffix selected by
/// `CREATORDESK_ENV=dev`.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("CREATORDESK_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env =
                std::env::var("CREATORDESK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("creatordesk-dev")
            } else {
                base_dir.join("creatordesk")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
