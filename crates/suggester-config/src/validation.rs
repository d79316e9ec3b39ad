//! Validation utilities and regex patterns

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Longest prefix a server (or the default) may use.
pub const MAX_PREFIX_LENGTH: usize = 20;

/// Regex pattern for validating hex color codes (e.g., #FFFFFF, #FF0000)
pub static HEX_COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid hex color regex pattern")
});

/// Regex pattern for language tags such as `en`, `en-US`, `pt-BR`
pub static LOCALE_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z]{2,3}(-[A-Z]{2})?$").expect("Invalid locale tag regex pattern")
});

/// Validate Discord token format (basic check)
pub fn validate_discord_token(token: &str) -> Result<(), &'static str> {
    if token.is_empty() {
        return Err("Discord token cannot be empty");
    }

    // bot_id.timestamp.signature
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() == 3 && parts.iter().all(|part| !part.is_empty()) {
        Ok(())
    } else {
        Err("Discord token must have three dot-separated parts")
    }
}

/// Validate a command prefix
pub fn validate_prefix(prefix: &str) -> Result<(), &'static str> {
    if prefix.trim().is_empty() {
        return Err("prefix cannot be empty");
    }
    if prefix.chars().count() > MAX_PREFIX_LENGTH {
        return Err("prefix cannot be longer than 20 characters");
    }
    Ok(())
}

/// Validate file path (basic check for valid path characters)
pub fn validate_file_path(path: &Path) -> Result<(), &'static str> {
    let path = path.to_string_lossy();
    if path.is_empty() {
        return Err("path cannot be empty");
    }

    // Colon stays allowed for Windows drive letters
    let invalid_chars = ['<', '>', '"', '|', '?', '*'];
    if path.chars().any(|c| invalid_chars.contains(&c)) {
        return Err("path contains invalid characters");
    }

    Ok(())
}

/// Validate a language tag
pub fn validate_locale_tag(tag: &str) -> Result<(), &'static str> {
    if LOCALE_TAG_REGEX.is_match(tag) {
        Ok(())
    } else {
        Err("locale must look like 'en' or 'en-US'")
    }
}
