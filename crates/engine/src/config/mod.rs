//! Per-request configuration.
//!
//! The host builds a [`FormBridgeConfig`] once per request (from
//! `~/.config/formbridge/config.json` or the path in
//! `FORMBRIDGE_CONFIG_PATH`) and passes it explicitly to the engine.

mod io;
mod model;
mod validation;

pub use io::{CONFIG_PATH_ENV, HASH_SECRET_ENV, default_config_path, load_config, load_config_from_path};
pub use model::{ConfigError, FormBridgeConfig, IncludeConfig};
pub use validation::{validate_config, validate_input_prefix};
