//! Document store contracts.
//!
//! Two record kinds are persisted: one [`ServerConfig`] per guild and one
//! [`Suggestion`] per (guild, suggestion id), with a secondary index from
//! (guild, feed message id) to the suggestion. Writes are last-write-wins.

use crate::config::ServerConfig;
use crate::suggestion::Suggestion;
use async_trait::async_trait;
use suggester_common::{GuildId, MessageId};
use thiserror::Error;

#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod sled_store;

pub use sled_store::SledStore;

/// Store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    #[error("Failed to (de)serialize {kind}: {source}")]
    Serialization {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Corrupt index entry: {0}")]
    CorruptIndex(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Per-guild configuration records.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn read_config(&self, guild: GuildId) -> StoreResult<Option<ServerConfig>>;

    async fn write_config(&self, guild: GuildId, config: &ServerConfig) -> StoreResult<()>;
}

/// Suggestion records.
#[async_trait]
pub trait SuggestionStore: Send + Sync {
    async fn get_suggestion(&self, guild: GuildId, id: u64) -> StoreResult<Option<Suggestion>>;

    /// Inserts or replaces a suggestion and keeps the message index in step.
    async fn put_suggestion(&self, suggestion: &Suggestion) -> StoreResult<()>;

    async fn find_by_message(
        &self,
        guild: GuildId,
        message: MessageId,
    ) -> StoreResult<Option<Suggestion>>;

    async fn has_awaiting_review(&self, guild: GuildId) -> StoreResult<bool>;

    /// One past the highest id used in the guild, starting at 1.
    async fn next_suggestion_id(&self, guild: GuildId) -> StoreResult<u64>;
}

/// Both record kinds behind one handle.
pub trait Store: ConfigStore + SuggestionStore {}

impl<T: ConfigStore + SuggestionStore + ?Sized> Store for T {}

/// Reads a guild's config, falling back to a fresh one with `prefix`.
pub async fn config_or_default<S>(
    store: &S,
    guild: GuildId,
    prefix: &str,
) -> StoreResult<ServerConfig>
where
    S: ConfigStore + ?Sized,
{
    Ok(store
        .read_config(guild)
        .await?
        .unwrap_or_else(|| ServerConfig::with_prefix(prefix)))
}
