//! Error types for catalog operations

use thiserror::Error;

/// Errors that can occur while building or querying the catalog
#[derive(Error, Debug)]
pub enum I18nError {
    /// Failed to parse a language identifier
    #[error("Invalid language identifier: {0}")]
    InvalidLanguageId(String),

    /// Failed to parse a Fluent resource
    #[error("Failed to parse Fluent resource for {locale}: {errors:?}")]
    FluentParseError { locale: String, errors: Vec<String> },

    /// Message not found in any bundle
    #[error("Message not found: {key}")]
    MessageNotFound { key: String },

    /// Failed to format a message
    #[error("Failed to format message '{key}': {errors:?}")]
    MessageFormatError { key: String, errors: Vec<String> },

    /// Adding a resource to a bundle failed
    #[error("Failed to create bundle for locale {locale}: {errors:?}")]
    BundleCreationError { locale: String, errors: Vec<String> },

    /// The fallback locale has no bundle
    #[error("Default locale {0} is not bundled")]
    MissingDefaultLocale(String),
}

/// Result type for catalog operations
pub type I18nResult<T> = Result<T, I18nError>;
