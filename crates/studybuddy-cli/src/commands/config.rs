use clap::Subcommand;
use studybuddy_core::{ConfigError, Settings};

use super::open_repository;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a setting
    Get {
        /// Setting key (e.g. "studyDuration", "soundEnabled")
        key: String,
    },
    /// Set a setting
    Set {
        /// Setting key
        key: String,
        /// New value
        value: String,
    },
    /// List all settings
    List,
    /// Reset settings to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let repo = open_repository()?;

    match action {
        ConfigAction::Get { key } => {
            let value = repo
                .get_settings()
                .get(&key)
                .ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let settings = repo.get_settings().with_value(&key, &value)?;
            repo.save_settings(&settings)?;
            println!("ok");
        }
        ConfigAction::List => {
            let json = serde_json::to_string_pretty(&repo.get_settings())?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            repo.save_settings(&Settings::default())?;
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
