mod config;
pub mod database;
pub mod kv;
pub mod repository;
mod settings;

pub use config::{AppConfig, LoggingConfig, TimerConfig};
pub use database::Database;
pub use kv::{KvStore, MemoryStore};
pub use repository::{keys, Repository};
pub use settings::Settings;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory.
///
/// `STUDYBUDDY_DATA_DIR` wins when set. Otherwise `~/.config/studybuddy`, or
/// `~/.config/studybuddy-dev` with `STUDYBUDDY_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("STUDYBUDDY_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("STUDYBUDDY_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("studybuddy-dev")
            } else {
                base_dir.join("studybuddy")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
