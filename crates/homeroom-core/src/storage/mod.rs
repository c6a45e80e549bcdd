mod config;
pub mod migrations;
pub mod task_db;

pub use config::{BoardConfig, Config, DisplayConfig};
pub use task_db::TaskDb;

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/homeroom[-dev]/` based on HOMEROOM_ENV.
///
/// Set HOMEROOM_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HOMEROOM_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("homeroom-dev")
    } else {
        base_dir.join("homeroom")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
