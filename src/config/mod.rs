mod init;
mod schema;
mod validation;

pub use init::write_default_config;
pub use schema::{Config, DealsConfig, RecentConfig};
pub use validation::validate_config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Get the config directory path (~/.config/kite-resale/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".config")
        .join("kite-resale")
}

/// Get the default config file path (~/.config/kite-resale/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Errors
///
/// Returns an error if:
/// - The config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!(
            "Config file not found at {}. Run `kite-resale init` to create one",
            path.display()
        );
    }

    let config_content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", path.display()))?;

    Ok(config)
}

/// Load the explicitly requested config, or the default file when present.
///
/// An explicit path must exist. A missing default file falls back to the
/// built-in defaults so the tool works with `--input` alone.
pub fn load_config_or_default(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(p) => load_config(&p),
        None => {
            let default_path = get_config_path();
            if default_path.exists() {
                load_config(&default_path)
            } else {
                debug!(path = %default_path.display(), "no config file, using defaults");
                Ok(Config::default())
            }
        }
    }
}
