//! Configuration validation.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use super::{ConfigError, FormBridgeConfig};

static INPUT_PREFIX_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9_]+_$").expect("valid prefix pattern"));

pub fn validate_config(config: &FormBridgeConfig) -> Result<(), ConfigError> {
    for prefix in &config.alternate_input_prefixes {
        validate_input_prefix(prefix)?;
    }
    if config.hash_secret.is_empty() {
        warn!("hashSecret is empty; state checksums will not match a salted host");
    }
    debug!(prefixes = config.alternate_input_prefixes.len(), "validated configuration");
    Ok(())
}

pub fn validate_input_prefix(prefix: &str) -> Result<(), ConfigError> {
    if !INPUT_PREFIX_PATTERN.is_match(prefix) {
        return Err(ConfigError::invalid_prefix(
            prefix,
            "prefix must contain only lowercase letters, numbers, and underscores, and end with '_'",
        ));
    }
    if prefix.ends_with("validation_") {
        return Err(ConfigError::invalid_prefix(prefix, "prefix collides with widget validation flags"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_prefixes() {
        assert!(validate_input_prefix("mdp_input_").is_ok());
        assert!(validate_input_prefix("x1_").is_ok());
    }

    #[test]
    fn rejects_malformed_prefixes() {
        assert!(matches!(validate_input_prefix("Input_"), Err(ConfigError::InvalidPrefix { .. })));
        assert!(matches!(validate_input_prefix("input"), Err(ConfigError::InvalidPrefix { .. })));
        assert!(matches!(validate_input_prefix("_validation_"), Err(ConfigError::InvalidPrefix { .. })));
    }

    #[test]
    fn validate_config_checks_every_prefix() {
        let config = FormBridgeConfig {
            alternate_input_prefixes: vec!["ok_".into(), "bad-prefix".into()],
            ..FormBridgeConfig::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
