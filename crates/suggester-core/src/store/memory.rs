//! In-memory store for tests.

use super::{ConfigStore, StoreResult, SuggestionStore};
use crate::config::ServerConfig;
use crate::suggestion::Suggestion;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use suggester_common::{GuildId, MessageId};
use tokio::sync::RwLock;

/// Store holding everything in maps; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    configs: RwLock<HashMap<GuildId, ServerConfig>>,
    suggestions: RwLock<BTreeMap<(GuildId, u64), Suggestion>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn read_config(&self, guild: GuildId) -> StoreResult<Option<ServerConfig>> {
        Ok(self.configs.read().await.get(&guild).cloned())
    }

    async fn write_config(&self, guild: GuildId, config: &ServerConfig) -> StoreResult<()> {
        self.configs.write().await.insert(guild, config.clone());
        Ok(())
    }
}

#[async_trait]
impl SuggestionStore for MemoryStore {
    async fn get_suggestion(&self, guild: GuildId, id: u64) -> StoreResult<Option<Suggestion>> {
        Ok(self.suggestions.read().await.get(&(guild, id)).cloned())
    }

    async fn put_suggestion(&self, suggestion: &Suggestion) -> StoreResult<()> {
        self.suggestions.write().await.insert(
            (suggestion.guild_id, suggestion.suggestion_id),
            suggestion.clone(),
        );
        Ok(())
    }

    async fn find_by_message(
        &self,
        guild: GuildId,
        message: MessageId,
    ) -> StoreResult<Option<Suggestion>> {
        Ok(self
            .suggestions
            .read()
            .await
            .range((guild, 0)..=(guild, u64::MAX))
            .map(|(_, suggestion)| suggestion)
            .find(|suggestion| suggestion.message_id == Some(message))
            .cloned())
    }

    async fn has_awaiting_review(&self, guild: GuildId) -> StoreResult<bool> {
        Ok(self
            .suggestions
            .read()
            .await
            .range((guild, 0)..=(guild, u64::MAX))
            .any(|(_, suggestion)| suggestion.is_awaiting_review()))
    }

    async fn next_suggestion_id(&self, guild: GuildId) -> StoreResult<u64> {
        Ok(self
            .suggestions
            .read()
            .await
            .range((guild, 0)..=(guild, u64::MAX))
            .next_back()
            .map_or(1, |((_, id), _)| id + 1))
    }
}
