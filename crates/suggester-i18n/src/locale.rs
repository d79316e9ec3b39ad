//! Locale handles

use crate::error::{I18nError, I18nResult};
use std::fmt;
use std::str::FromStr;
use unic_langid::LanguageIdentifier;

/// Tag of the locale used when nothing else matches.
pub const DEFAULT_LOCALE: &str = "en-US";

/// A parsed language tag such as `en-US`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale(LanguageIdentifier);

impl Locale {
    /// Parses a tag, rejecting anything unic-langid cannot read.
    pub fn parse(tag: &str) -> I18nResult<Self> {
        tag.parse::<LanguageIdentifier>()
            .map(Self)
            .map_err(|_| I18nError::InvalidLanguageId(tag.to_string()))
    }

    /// Picks a server's locale, falling back to `default` when unset or invalid.
    pub fn resolve(tag: Option<&str>, default: &Locale) -> Self {
        tag.and_then(|tag| Self::parse(tag).ok())
            .unwrap_or_else(|| default.clone())
    }

    /// The underlying identifier.
    pub fn language_identifier(&self) -> &LanguageIdentifier {
        &self.0
    }

    /// Language subtag only, e.g. `en` for `en-US`.
    pub fn language(&self) -> &str {
        self.0.language.as_str()
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self(unic_langid::langid!("en-US"))
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let locale = Locale::parse("fr-FR").unwrap();
        assert_eq!(locale.to_string(), "fr-FR");
        assert_eq!(locale.language(), "fr");
        assert_eq!(Locale::default().to_string(), DEFAULT_LOCALE);
    }

    #[test]
    fn test_resolve_falls_back() {
        let default = Locale::default();
        assert_eq!(Locale::resolve(None, &default), default);
        assert_eq!(Locale::resolve(Some("not a tag!"), &default), default);
        assert_eq!(
            Locale::resolve(Some("fr-FR"), &default).to_string(),
            "fr-FR"
        );
    }
}
