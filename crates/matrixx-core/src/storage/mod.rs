mod config;

pub use config::{ChatConfig, Config, InterviewConfig, RevealConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/matrixx[-dev]/` based on MATRIXX_ENV.
///
/// Set MATRIXX_ENV=dev to use the development directory. MATRIXX_CONFIG_DIR,
/// when set, replaces the whole path.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("MATRIXX_CONFIG_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("MATRIXX_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("matrixx-dev")
            } else {
                base_dir.join("matrixx")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DirUnavailable(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
