mod config;

pub use config::{ApiConfig, Config, DisplayConfig, EngineConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/wakeup[-dev]/` based on WAKEUP_ENV.
///
/// Set WAKEUP_ENV=dev to use the development config directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("WAKEUP_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("wakeup-dev")
    } else {
        base_dir.join("wakeup")
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
