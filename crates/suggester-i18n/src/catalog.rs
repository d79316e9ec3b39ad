//! FluentBundle management and message formatting

use crate::error::{I18nError, I18nResult};
use crate::locale::Locale;
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

include!(concat!(env!("OUT_DIR"), "/bundled_locales.rs"));

/// Named message arguments, in the order they were given.
pub type MessageArgs<'a> = [(&'a str, String)];

/// Builds a `Vec<(&str, String)>` for [`Catalog::format`].
///
/// ```
/// let args = suggester_i18n::args!["user" => "Ana#0001", "id" => 12];
/// assert_eq!(args[1], ("id", "12".to_string()));
/// ```
#[macro_export]
macro_rules! args {
    ($($key:expr => $value:expr),* $(,)?) => {
        vec![$(($key, ::std::string::ToString::to_string(&$value))),*]
    };
}

/// Every bundled locale, loaded once and shared read-only.
pub struct Catalog {
    default: Locale,
    bundles: HashMap<Locale, FluentBundle<FluentResource>>,
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("default", &self.default)
            .field("locales", &self.bundles.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Catalog {
    /// Loads the locales compiled into this crate.
    pub fn bundled(default: &Locale) -> I18nResult<Self> {
        Self::from_sources(default, BUNDLED_LOCALES)
    }

    /// Loads `(tag, fluent source)` pairs. `default` must be among them.
    pub fn from_sources(default: &Locale, sources: &[(&str, &str)]) -> I18nResult<Self> {
        let mut bundles = HashMap::with_capacity(sources.len());

        for (tag, source) in sources {
            let locale = Locale::parse(tag)?;
            let resource = FluentResource::try_new((*source).to_string()).map_err(
                |(_, errors)| I18nError::FluentParseError {
                    locale: locale.to_string(),
                    errors: errors.iter().map(|e| format!("{e:?}")).collect(),
                },
            )?;

            let mut bundle = FluentBundle::new_concurrent(vec![locale
                .language_identifier()
                .clone()]);
            bundle.set_use_isolating(false);
            bundle
                .add_resource(resource)
                .map_err(|errors| I18nError::BundleCreationError {
                    locale: locale.to_string(),
                    errors: errors.iter().map(|e| format!("{e:?}")).collect(),
                })?;

            debug!("Loaded locale bundle {}", locale);
            bundles.insert(locale, bundle);
        }

        if !bundles.contains_key(default) {
            return Err(I18nError::MissingDefaultLocale(default.to_string()));
        }

        Ok(Self {
            default: default.clone(),
            bundles,
        })
    }

    /// Locale used when a request cannot be served otherwise.
    pub fn default_locale(&self) -> &Locale {
        &self.default
    }

    /// Whether a bundle exists for exactly this locale.
    pub fn supports(&self, locale: &Locale) -> bool {
        self.bundles.contains_key(locale)
    }

    /// All loaded locales, sorted by tag.
    pub fn locales(&self) -> Vec<&Locale> {
        let mut locales: Vec<_> = self.bundles.keys().collect();
        locales.sort_by_key(|locale| locale.to_string());
        locales
    }

    /// Whether the default locale defines `key`.
    pub fn has_message(&self, key: &str) -> bool {
        self.bundles
            .get(&self.default)
            .is_some_and(|bundle| bundle.has_message(key))
    }

    /// Formats a message without arguments.
    pub fn text(&self, locale: &Locale, key: &str) -> String {
        self.format(locale, key, &[])
    }

    /// Formats a message, never failing.
    ///
    /// Falls back to the default locale when `locale` lacks the key, and to
    /// the key itself when no bundle has it.
    pub fn format(&self, locale: &Locale, key: &str, args: &MessageArgs<'_>) -> String {
        match self.try_format(locale, key, args) {
            Ok(text) => text,
            Err(e) => {
                warn!("{}", e);
                key.to_string()
            }
        }
    }

    /// Formats a message, reporting lookup or formatting failures.
    pub fn try_format(
        &self,
        locale: &Locale,
        key: &str,
        args: &MessageArgs<'_>,
    ) -> I18nResult<String> {
        let fluent_args = to_fluent_args(args);

        for bundle in self.candidates(locale) {
            let Some(pattern) = bundle.get_message(key).and_then(|message| message.value())
            else {
                continue;
            };

            let mut errors = Vec::new();
            let text = bundle.format_pattern(pattern, fluent_args.as_ref(), &mut errors);
            if !errors.is_empty() {
                return Err(I18nError::MessageFormatError {
                    key: key.to_string(),
                    errors: errors.iter().map(|e| format!("{e:?}")).collect(),
                });
            }
            return Ok(text.into_owned());
        }

        Err(I18nError::MessageNotFound {
            key: key.to_string(),
        })
    }

    /// Bundles to try, most specific first: exact tag, same language, default.
    fn candidates<'a>(
        &'a self,
        locale: &Locale,
    ) -> impl Iterator<Item = &'a FluentBundle<FluentResource>> + 'a {
        let exact = self.bundles.get(locale);
        let same_language = self
            .bundles
            .iter()
            .filter(|(candidate, _)| {
                candidate.language() == locale.language() && *candidate != locale
            })
            .min_by_key(|(candidate, _)| candidate.to_string())
            .map(|(_, bundle)| bundle);
        let fallback = self.bundles.get(&self.default);

        [exact, same_language, fallback].into_iter().flatten()
    }
}

fn to_fluent_args<'a>(args: &'a MessageArgs<'a>) -> Option<FluentArgs<'a>> {
    if args.is_empty() {
        return None;
    }
    let mut fluent_args = FluentArgs::new();
    for (name, value) in args {
        fluent_args.set(*name, FluentValue::from(value.as_str()));
    }
    Some(fluent_args)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EN: &str = "greeting = Hello, { $name }!\nonly-english = Only here\n";
    const FR: &str = "greeting = Bonjour, { $name } !\n";

    fn catalog() -> Catalog {
        Catalog::from_sources(&Locale::default(), &[("en-US", EN), ("fr-FR", FR)]).unwrap()
    }

    #[test]
    fn test_format_with_args() {
        let catalog = catalog();
        let fr = Locale::parse("fr-FR").unwrap();

        assert_eq!(
            catalog.format(&Locale::default(), "greeting", &args!["name" => "Ana"]),
            "Hello, Ana!"
        );
        assert_eq!(
            catalog.format(&fr, "greeting", &args!["name" => "Ana"]),
            "Bonjour, Ana !"
        );
    }

    #[test]
    fn test_missing_key_falls_back() {
        let catalog = catalog();
        let fr = Locale::parse("fr-FR").unwrap();

        assert_eq!(catalog.text(&fr, "only-english"), "Only here");
        assert_eq!(catalog.text(&fr, "nowhere"), "nowhere");
        assert!(matches!(
            catalog.try_format(&fr, "nowhere", &[]),
            Err(I18nError::MessageNotFound { .. })
        ));
    }

    #[test]
    fn test_same_language_is_preferred() {
        let catalog = catalog();
        let canadian = Locale::parse("fr-CA").unwrap();
        assert_eq!(
            catalog.format(&canadian, "greeting", &args!["name" => "Léa"]),
            "Bonjour, Léa !"
        );
    }

    #[test]
    fn test_missing_default_is_rejected() {
        let result = Catalog::from_sources(&Locale::default(), &[("fr-FR", FR)]);
        assert!(matches!(result, Err(I18nError::MissingDefaultLocale(_))));
    }

    #[test]
    fn test_parse_errors_are_reported() {
        let result = Catalog::from_sources(&Locale::default(), &[("en-US", "= broken")]);
        assert!(matches!(result, Err(I18nError::FluentParseError { .. })));
    }
}
