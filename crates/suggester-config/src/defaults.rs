//! Default values for every configuration section.

use crate::schema::*;
use std::path::PathBuf;

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            owner_ids: Vec::new(),
            global_staff_ids: Vec::new(),
            default_prefix: ".".to_string(),
            confirm_timeout_seconds: 60,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/suggester.db"),
            cache_capacity_bytes: 64 * 1024 * 1024,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_locale: "en-US".to_string(),
            palette: Palette::default(),
            control_emojis: ControlEmojis::default(),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            default: HexColor(0x00_00_ff),
            green: HexColor(0x2e_cc_71),
            orange: HexColor(0xe6_7e_22),
            gray: HexColor(0x95_a5_a6),
            red: HexColor(0xe7_4c_3c),
        }
    }
}

impl Default for ControlEmojis {
    fn default() -> Self {
        Self {
            check: "✅".to_string(),
            x: "❌".to_string(),
        }
    }
}
