mod config;
pub mod database;
pub mod kv;

pub use config::{
    BreathingConfig, Config, DriverConfig, MealsConfig, StretchConfig, WaterConfig,
};
pub use database::{Database, SessionRecord, Stats};
pub use kv::{load_json, save_json, KvStore, MemoryStore};

use std::path::PathBuf;

/// Returns `~/.config/wellnest[-dev]/` based on WELLNEST_ENV.
///
/// Set WELLNEST_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("WELLNEST_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("wellnest-dev")
    } else {
        base_dir.join("wellnest")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
