//! Integration tests for the bundled catalog.

use suggester_i18n::{args, Catalog, Locale, BUNDLED_LOCALES};

#[test]
fn test_bundled_catalog_loads() {
    let catalog = Catalog::bundled(&Locale::default()).unwrap();

    assert!(BUNDLED_LOCALES.iter().any(|(tag, _)| *tag == "en-US"));
    assert!(catalog.supports(&Locale::default()));
    assert!(catalog.has_message("suggestion-from-title"));
    assert!(catalog.has_message("cfg-prefix-disallowed-error"));
}

#[test]
fn test_renderer_strings_format() {
    let catalog = Catalog::bundled(&Locale::default()).unwrap();
    let en = Locale::default();

    assert_eq!(
        catalog.format(&en, "suggestion-from-title", &args!["user" => "Ana#0001"]),
        "Suggestion from Ana#0001"
    );
    assert_eq!(
        catalog.format(&en, "comment-title", &args!["user" => "Ana#0001", "id" => "4_2"]),
        "Comment from Ana#0001 (ID 4_2)"
    );
    assert_eq!(
        catalog.format(
            &en,
            "log-suggestion-submitted-footer",
            &args!["id" => 4, "user" => 99]
        ),
        "Suggestion ID: 4 | User ID: 99"
    );
}

#[test]
fn test_unbundled_locale_uses_default() {
    let catalog = Catalog::bundled(&Locale::default()).unwrap();
    let de = Locale::parse("de-DE").unwrap();

    assert!(!catalog.supports(&de));
    assert_eq!(catalog.text(&de, "cancelled"), "Cancelled");
}
