//! Configuration loading utilities

use crate::Config;
use std::env;
use std::path::{Path, PathBuf};
use suggester_common::UserId;
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_VAR: &str = "SUGGESTER_CONFIG_PATH";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Invalid configuration value for '{field}': {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        /// Variable name.
        var: String,
        /// Underlying parse failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ConfigError {
    /// Creates a validation error for a field.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the configuration.
    ///
    /// Lookup order: `explicit`, `SUGGESTER_CONFIG_PATH`, `config.yaml`,
    /// `config.yml`, then built-in defaults. Environment overrides are
    /// applied last and the result is validated.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        let mut config = match Self::locate(explicit) {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                Self::parse_file(&path)?
            }
            None => {
                info!("No configuration file found, using defaults");
                Config::default()
            }
        };

        Self::apply_overrides(&mut config, |var| env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a YAML configuration file without overrides or validation.
    pub fn parse_file(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_str(&content)
    }

    /// Parses YAML configuration text.
    pub fn parse_str(content: &str) -> Result<Config, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = env::var(CONFIG_PATH_VAR) {
            return Some(PathBuf::from(path));
        }
        ["config.yaml", "config.yml"]
            .into_iter()
            .map(PathBuf::from)
            .find(|candidate| candidate.exists())
    }

    /// Applies environment overrides read through `lookup`.
    pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("DISCORD_TOKEN") {
            debug!("Discord token overridden from environment");
            config.discord.token = token;
        }

        if let Some(owners) = lookup("SUGGESTER_OWNERS") {
            config.discord.owner_ids = parse_id_list("SUGGESTER_OWNERS", &owners)?;
        }

        if let Some(staff) = lookup("SUGGESTER_GLOBAL_STAFF") {
            config.discord.global_staff_ids = parse_id_list("SUGGESTER_GLOBAL_STAFF", &staff)?;
        }

        if let Some(timeout) = lookup("SUGGESTER_TIMEOUT") {
            config.discord.confirm_timeout_seconds =
                timeout.parse().map_err(|e| ConfigError::EnvParseError {
                    var: "SUGGESTER_TIMEOUT".to_string(),
                    source: Box::new(e),
                })?;
        }

        if let Some(path) = lookup("SUGGESTER_DB_PATH") {
            config.database.path = PathBuf::from(path);
        }

        if let Some(locale) = lookup("SUGGESTER_LOCALE") {
            config.display.default_locale = locale;
        }

        if let Some(level) = lookup("SUGGESTER_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}

fn parse_id_list(var: &str, raw: &str) -> Result<Vec<UserId>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse().map_err(|e| ConfigError::EnvParseError {
                var: var.to_string(),
                source: Box::new(e),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = Config::default();
        ConfigLoader::apply_overrides(
            &mut config,
            lookup_from(&[
                ("DISCORD_TOKEN", "a.b.c"),
                ("SUGGESTER_OWNERS", "1, 2,,3"),
                ("SUGGESTER_TIMEOUT", "10"),
            ]),
        )
        .unwrap();

        assert_eq!(config.discord.token, "a.b.c");
        assert_eq!(config.discord.owner_ids, vec![UserId(1), UserId(2), UserId(3)]);
        assert_eq!(config.discord.confirm_timeout_seconds, 10);
        assert_eq!(config.discord.confirm_timeout(), std::time::Duration::from_secs(10));
    }

    #[test]
    fn test_bad_override_is_reported() {
        let mut config = Config::default();
        let err = ConfigLoader::apply_overrides(
            &mut config,
            lookup_from(&[("SUGGESTER_GLOBAL_STAFF", "12,abc")]),
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::EnvParseError { ref var, .. } if var == "SUGGESTER_GLOBAL_STAFF"));
    }

    #[test]
    fn test_parse_partial_yaml_keeps_defaults() {
        let config = ConfigLoader::parse_str(
            "discord:\n  token: \"x.y.z\"\ndisplay:\n  palette:\n    green: \"#00ff00\"\n",
        )
        .unwrap();

        assert_eq!(config.discord.token, "x.y.z");
        assert_eq!(config.discord.default_prefix, ".");
        assert_eq!(config.display.palette.green.0, 0x00ff00);
        assert_eq!(config.display.control_emojis.check, "✅");
    }

    #[test]
    fn test_parse_rejects_bad_color() {
        let result = ConfigLoader::parse_str("display:\n  palette:\n    red: \"red\"\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
