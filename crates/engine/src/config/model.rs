//! Data model for FormBridge configuration.

use formbridge_types::submission::INPUT_PREFIX;
use formbridge_util::{HashError, KeyedHasher};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid input prefix '{prefix}': {reason}")]
    InvalidPrefix { prefix: String, reason: String },

    #[error("Hashing error: {0}")]
    Hash(#[from] HashError),
}

impl ConfigError {
    pub fn invalid_prefix(prefix: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPrefix {
            prefix: prefix.into(),
            reason: reason.into(),
        }
    }
}

/// Relationship includes requested from the MDP per record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncludeConfig {
    pub person_profile: Vec<String>,
    pub organization: Vec<String>,
}

impl Default for IncludeConfig {
    fn default() -> Self {
        let resources = ["addresses", "emails", "phones", "web_addresses"];
        let mut person_profile: Vec<String> = resources.iter().map(|name| name.to_string()).collect();
        person_profile.push("organizations".to_string());
        person_profile.push("data_fields".to_string());
        Self {
            person_profile,
            organization: resources.iter().map(|name| name.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormBridgeConfig {
    /// Key for content hashes and state checksums. Must match the host's salt.
    pub hash_secret: String,
    /// Prefixes besides `input_` whose keys carry whole-field values.
    pub alternate_input_prefixes: Vec<String>,
    /// Value used by bindings that configure no fallback of their own.
    pub default_fallback: String,
    pub includes: IncludeConfig,
}

impl FormBridgeConfig {
    pub fn hasher(&self) -> Result<KeyedHasher, ConfigError> {
        Ok(KeyedHasher::new(&self.hash_secret)?)
    }

    /// `input_` followed by the configured alternates.
    pub fn input_prefixes(&self) -> Vec<String> {
        let mut prefixes = vec![INPUT_PREFIX.to_string()];
        for prefix in &self.alternate_input_prefixes {
            if !prefixes.contains(prefix) {
                prefixes.push(prefix.clone());
            }
        }
        prefixes
    }

    /// Includes for the person-profile fetch; additional-info bindings also need `data_fields`.
    pub fn person_includes(&self, with_data_fields: bool) -> Vec<String> {
        let mut includes = self.includes.person_profile.clone();
        if with_data_fields && !includes.iter().any(|include| include == "data_fields") {
            includes.push("data_fields".to_string());
        }
        includes
    }
}
