//! Loading configuration from disk and environment.

use std::{env, fs, path::Path, path::PathBuf};

use formbridge_util::config_path_from_env;
use tracing::debug;

use super::{ConfigError, FormBridgeConfig, validate_config};

/// Overrides the configuration file location.
pub const CONFIG_PATH_ENV: &str = "FORMBRIDGE_CONFIG_PATH";
/// Overrides `hashSecret` so the salt need not live on disk.
pub const HASH_SECRET_ENV: &str = "FORMBRIDGE_HASH_SECRET";

pub fn default_config_path() -> PathBuf {
    config_path_from_env(CONFIG_PATH_ENV, "config.json")
}

/// Loads configuration from the default path.
pub fn load_config() -> Result<FormBridgeConfig, ConfigError> {
    load_config_from_path(&default_config_path())
}

/// Loads configuration from `path`. A missing file yields defaults.
pub fn load_config_from_path(path: &Path) -> Result<FormBridgeConfig, ConfigError> {
    let mut config = if path.exists() {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&content)?
    } else {
        debug!(path = %path.display(), "no configuration file; using defaults");
        FormBridgeConfig::default()
    };

    if let Ok(secret) = env::var(HASH_SECRET_ENV)
        && !secret.is_empty()
    {
        config.hash_secret = secret;
    }

    validate_config(&config)?;
    Ok(config)
}
