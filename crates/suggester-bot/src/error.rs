//! Application-wide error types using thiserror.

use poise::serenity_prelude as serenity;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum BotError {
    /// No Discord token was configured.
    #[error("Discord token is required but not provided in configuration")]
    MissingToken,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] suggester_config::ConfigError),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] suggester_common::SuggesterError),

    /// The document store could not be opened or flushed.
    #[error("Store error: {0}")]
    Store(#[from] suggester_core::StoreError),

    /// The bundled locales failed to load.
    #[error("Localization error: {0}")]
    I18n(#[from] suggester_i18n::I18nError),

    /// Discord/Serenity error.
    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),
}

/// Result type for the bot application.
pub type BotResult<T> = Result<T, BotError>;
