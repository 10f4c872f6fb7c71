use std::{env, path::PathBuf};

use dirs_next::{config_dir, home_dir};

/// Expands a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    if trimmed == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    let rest = trimmed.strip_prefix("~/").or_else(|| trimmed.strip_prefix("~\\"));
    match rest {
        Some(rest) => home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest),
        None => PathBuf::from(trimmed),
    }
}

/// Resolves a config file path: `env_var` when set and non-blank, else `<config_dir>/formbridge/<file_name>`.
pub fn config_path_from_env(env_var: &str, file_name: &str) -> PathBuf {
    if let Ok(path) = env::var(env_var)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("formbridge")
        .join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_wins() {
        temp_env::with_var("FORMBRIDGE_TEST_PATH", Some("/tmp/fb/config.json"), || {
            assert_eq!(
                config_path_from_env("FORMBRIDGE_TEST_PATH", "config.json"),
                PathBuf::from("/tmp/fb/config.json")
            );
        });
    }

    #[test]
    fn blank_override_falls_back_to_config_dir() {
        temp_env::with_var("FORMBRIDGE_TEST_PATH", Some("  "), || {
            let path = config_path_from_env("FORMBRIDGE_TEST_PATH", "config.json");
            assert!(path.ends_with("formbridge/config.json"));
        });
    }

    #[test]
    fn expands_home_prefix() {
        let expanded = expand_tilde("~/x/y");
        assert!(expanded.ends_with("x/y"));
        assert_ne!(expanded, PathBuf::from("~/x/y"));
    }
}
