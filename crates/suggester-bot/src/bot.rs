//! Core bot logic using the Poise framework.

use crate::error::{BotError, BotResult};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use suggester_commands::{create_framework, Data};
use suggester_config::Config;
use suggester_core::store::sled_store::StoreStats;
use suggester_core::{SledStore, Store};
use suggester_i18n::{Catalog, Locale};
use tracing::{error, info, warn};

/// Gateway events the bot subscribes to.
pub fn intents() -> serenity::GatewayIntents {
    serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_EMOJIS_AND_STICKERS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::GUILD_MESSAGE_REACTIONS
        | serenity::GatewayIntents::MESSAGE_CONTENT
}

/// Main bot structure.
pub struct SuggesterBot {
    config: Config,
    store: Arc<SledStore>,
}

impl SuggesterBot {
    /// Validates the configuration and opens the document store.
    pub fn new(config: Config) -> BotResult<Self> {
        if config.discord.token.trim().is_empty() {
            return Err(BotError::MissingToken);
        }

        let store = SledStore::open(&config.database.path, config.database.cache_capacity_bytes)?;
        Ok(Self {
            config,
            store: Arc::new(store),
        })
    }

    /// Counts of stored records.
    pub fn stats(&self) -> BotResult<StoreStats> {
        Ok(self.store.stats()?)
    }

    /// Builds the shared command data.
    pub fn data(&self) -> BotResult<Data> {
        let locale = Locale::parse(&self.config.display.default_locale).unwrap_or_else(|e| {
            warn!("{}; loading locales with {}", e, Locale::default());
            Locale::default()
        });
        let catalog = Catalog::bundled(&locale)?;
        info!("Loaded {} locale(s)", catalog.locales().len());

        let store: Arc<dyn Store> = self.store.clone();
        Ok(Data::new(self.config.clone(), store, catalog))
    }

    /// Connects to the gateway and runs until shutdown.
    pub async fn start(&self) -> BotResult<()> {
        let stats = self.stats()?;
        info!(
            "Store holds {} server configs and {} suggestions ({} bytes on disk)",
            stats.server_configs, stats.suggestions, stats.size_on_disk
        );

        let data = self.data()?;
        let framework = create_framework()
            .setup(move |ctx, ready, framework| {
                Box::pin(async move {
                    info!("Bot connected as: {}", ready.user.name);
                    info!("Connected to {} guilds", ready.guilds.len());
                    poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                    info!("Slash commands registered globally");
                    Ok(data)
                })
            })
            .build();

        let mut client = serenity::ClientBuilder::new(&self.config.discord.token, intents())
            .framework(framework)
            .await?;

        let shard_manager = client.shard_manager.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {:?}", e);
                return;
            }
            info!("Received shutdown signal, starting graceful shutdown");
            shard_manager.shutdown_all().await;
        });

        let result = client.start().await;
        self.store.flush().await?;
        info!("Store flushed, shutdown complete");
        result.map_err(BotError::from)
    }
}
