//! Configuration schema definitions using serde.

use crate::validation::{self, HEX_COLOR_REGEX};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use suggester_common::{LoggingConfig, UserId};

/// Main configuration structure for the Suggester bot.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Discord connection and privileged users.
    pub discord: DiscordConfig,
    /// Document store location.
    pub database: DatabaseConfig,
    /// Display constants shared by every rendered message.
    pub display: DisplayConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Discord bot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Discord bot token.
    pub token: String,
    /// Bot administrators (permission level 0).
    pub owner_ids: Vec<UserId>,
    /// Global staff (permission level 1).
    pub global_staff_ids: Vec<UserId>,
    /// Prefix used for servers that never configured one.
    pub default_prefix: String,
    /// How long a confirmation prompt waits for a button press, in seconds.
    pub confirm_timeout_seconds: u64,
}

impl DiscordConfig {
    pub const fn confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.confirm_timeout_seconds)
    }
}

/// Document store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Directory holding the sled database.
    pub path: PathBuf,
    /// Page cache size in bytes.
    pub cache_capacity_bytes: u64,
}

/// Display constants: locale, colors, and control emojis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Locale used when a server has none configured.
    pub default_locale: String,
    /// Embed colors.
    pub palette: Palette,
    /// Emojis used for confirmations and reply prefixes.
    pub control_emojis: ControlEmojis,
}

/// Named embed colors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Palette {
    /// Neutral suggestion color.
    pub default: HexColor,
    /// Implemented / healthy.
    pub green: HexColor,
    /// In progress / warnings.
    pub orange: HexColor,
    /// Declined for now.
    pub gray: HexColor,
    /// Errors / denied.
    pub red: HexColor,
}

/// A palette entry selectable by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteColor {
    /// [`Palette::default`]
    Default,
    /// [`Palette::green`]
    Green,
    /// [`Palette::orange`]
    Orange,
    /// [`Palette::gray`]
    Gray,
    /// [`Palette::red`]
    Red,
}

impl Palette {
    /// Resolves a named palette entry to its RGB value.
    #[must_use]
    pub const fn get(&self, color: PaletteColor) -> u32 {
        match color {
            PaletteColor::Default => self.default.0,
            PaletteColor::Green => self.green.0,
            PaletteColor::Orange => self.orange.0,
            PaletteColor::Gray => self.gray.0,
            PaletteColor::Red => self.red.0,
        }
    }
}

/// A color written as `#rrggbb` in the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(pub u32);

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if !HEX_COLOR_REGEX.is_match(&value) {
            return Err(format!("'{value}' is not a #rrggbb color"));
        }
        u32::from_str_radix(&value[1..], 16)
            .map(Self)
            .map_err(|e| e.to_string())
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// Emojis the bot itself uses, written as chat markup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ControlEmojis {
    /// Prefix for successful replies and the confirm button.
    pub check: String,
    /// Prefix for error replies and the cancel button.
    pub x: String,
}

impl Config {
    /// Validates the configuration, returning the first offending field.
    pub fn validate(&self) -> Result<(), crate::ConfigError> {
        validation::validate_discord_token(&self.discord.token)
            .map_err(|reason| crate::ConfigError::invalid("discord.token", reason))?;

        validation::validate_prefix(&self.discord.default_prefix)
            .map_err(|reason| crate::ConfigError::invalid("discord.default_prefix", reason))?;

        if self.discord.confirm_timeout_seconds == 0 {
            return Err(crate::ConfigError::invalid(
                "discord.confirm_timeout_seconds",
                "must be greater than zero",
            ));
        }

        validation::validate_file_path(&self.database.path)
            .map_err(|reason| crate::ConfigError::invalid("database.path", reason))?;

        validation::validate_locale_tag(&self.display.default_locale)
            .map_err(|reason| crate::ConfigError::invalid("display.default_locale", reason))?;

        if self.display.control_emojis.check.trim().is_empty()
            || self.display.control_emojis.x.trim().is_empty()
        {
            return Err(crate::ConfigError::invalid(
                "display.control_emojis",
                "control emojis cannot be empty",
            ));
        }

        Ok(())
    }

    /// Whether the user is a bot administrator.
    #[must_use]
    pub fn is_owner(&self, user: UserId) -> bool {
        self.discord.owner_ids.contains(&user)
    }

    /// Whether the user is global staff.
    #[must_use]
    pub fn is_global_staff(&self, user: UserId) -> bool {
        self.discord.global_staff_ids.contains(&user)
    }
}
