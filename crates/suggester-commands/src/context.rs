//! Shared application state handed to every command and event handler.

use std::fmt;
use std::sync::Arc;
use suggester_config::{Config, ControlEmojis, Palette};
use suggester_core::render::RenderContext;
use suggester_core::{ServerConfig, Store};
use suggester_i18n::{Catalog, Locale};
use tracing::warn;

/// Application data accessible in all commands.
pub struct Data {
    /// Bot-level configuration.
    pub config: Arc<Config>,
    /// Document store holding server configs and suggestions.
    pub store: Arc<dyn Store>,
    /// Localized strings.
    pub catalog: Arc<Catalog>,
    default_locale: Locale,
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Data")
            .field("config", &"<Config>")
            .field("store", &"<Store>")
            .field("catalog", &self.catalog)
            .field("default_locale", &self.default_locale)
            .finish()
    }
}

/// Error type for commands.
pub type CommandError = Box<dyn std::error::Error + Send + Sync>;

/// Poise context type alias.
pub type Context<'a> = poise::Context<'a, Data, CommandError>;

impl Data {
    pub fn new(config: Config, store: Arc<dyn Store>, catalog: Catalog) -> Self {
        let default_locale = Locale::parse(&config.display.default_locale).unwrap_or_else(|e| {
            warn!("{}; using {}", e, catalog.default_locale());
            catalog.default_locale().clone()
        });

        Self {
            config: Arc::new(config),
            store,
            catalog: Arc::new(catalog),
            default_locale,
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.config.display.palette
    }

    pub fn controls(&self) -> &ControlEmojis {
        &self.config.display.control_emojis
    }

    pub const fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    pub fn default_prefix(&self) -> &str {
        &self.config.discord.default_prefix
    }

    /// The server's locale, or the bot default.
    pub fn locale_for(&self, server: &ServerConfig) -> Locale {
        Locale::resolve(server.locale.as_deref(), &self.default_locale)
    }

    pub fn render_context<'a>(&'a self, locale: &'a Locale) -> RenderContext<'a> {
        RenderContext::new(&self.catalog, locale, self.palette())
    }
}
