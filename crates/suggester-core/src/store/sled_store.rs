//! sled-backed document store.

use super::{ConfigStore, StoreError, StoreResult, SuggestionStore};
use crate::config::ServerConfig;
use crate::suggestion::Suggestion;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use suggester_common::{GuildId, MessageId};
use tracing::{debug, info, warn};

const CONFIG_TREE: &str = "server_configs";
const SUGGESTION_TREE: &str = "suggestions";
const MESSAGE_INDEX_TREE: &str = "suggestion_messages";

/// Store backed by an embedded sled database.
///
/// Records are JSON documents. Suggestion keys are the guild id followed by
/// the suggestion id, both big-endian, so a guild's suggestions are one
/// ordered prefix range.
#[derive(Debug, Clone)]
pub struct SledStore {
    db: Arc<sled::Db>,
    configs: sled::Tree,
    suggestions: sled::Tree,
    messages: sled::Tree,
}

/// Record counts and disk usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub server_configs: usize,
    pub suggestions: usize,
    pub size_on_disk: u64,
}

impl SledStore {
    /// Opens (or creates) the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P, cache_capacity: u64) -> StoreResult<Self> {
        info!("Opening suggestion store at: {:?}", path.as_ref());

        let db = sled::Config::default()
            .path(path.as_ref())
            .cache_capacity(cache_capacity)
            .flush_every_ms(Some(1000))
            .open()?;

        Self::from_db(db)
    }

    /// An in-memory database removed on drop.
    pub fn temporary() -> StoreResult<Self> {
        Self::from_db(sled::Config::new().temporary(true).open()?)
    }

    fn from_db(db: sled::Db) -> StoreResult<Self> {
        let store = Self {
            configs: db.open_tree(CONFIG_TREE)?,
            suggestions: db.open_tree(SUGGESTION_TREE)?,
            messages: db.open_tree(MESSAGE_INDEX_TREE)?,
            db: Arc::new(db),
        };
        info!("Suggestion store ready");
        Ok(store)
    }

    pub fn stats(&self) -> StoreResult<StoreStats> {
        Ok(StoreStats {
            server_configs: self.configs.len(),
            suggestions: self.suggestions.len(),
            size_on_disk: self.db.size_on_disk()?,
        })
    }

    /// Flushes pending writes to disk.
    pub async fn flush(&self) -> StoreResult<()> {
        self.db.flush_async().await?;
        Ok(())
    }

    fn load_suggestion(&self, key: &[u8]) -> StoreResult<Option<Suggestion>> {
        self.suggestions
            .get(key)?
            .map(|data| decode("suggestion", &data))
            .transpose()
    }
}

fn pair_key(guild: GuildId, id: u64) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&guild.key_bytes());
    key[8..].copy_from_slice(&id.to_be_bytes());
    key
}

fn id_from_key(key: &[u8]) -> StoreResult<u64> {
    let tail: [u8; 8] = key
        .get(key.len().saturating_sub(8)..)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or_else(|| StoreError::CorruptIndex(format!("{key:?}")))?;
    Ok(u64::from_be_bytes(tail))
}

fn encode<T: Serialize>(kind: &'static str, value: &T) -> StoreResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|source| StoreError::Serialization { kind, source })
}

fn decode<T: DeserializeOwned>(kind: &'static str, data: &[u8]) -> StoreResult<T> {
    serde_json::from_slice(data).map_err(|source| StoreError::Serialization { kind, source })
}

#[async_trait]
impl ConfigStore for SledStore {
    async fn read_config(&self, guild: GuildId) -> StoreResult<Option<ServerConfig>> {
        debug!("Reading config for guild {}", guild);
        self.configs
            .get(guild.key_bytes())?
            .map(|data| decode("server config", &data))
            .transpose()
    }

    async fn write_config(&self, guild: GuildId, config: &ServerConfig) -> StoreResult<()> {
        debug!("Writing config for guild {}", guild);
        self.configs
            .insert(guild.key_bytes(), encode("server config", config)?)?;
        self.configs.flush_async().await?;
        Ok(())
    }
}

#[async_trait]
impl SuggestionStore for SledStore {
    async fn get_suggestion(&self, guild: GuildId, id: u64) -> StoreResult<Option<Suggestion>> {
        self.load_suggestion(&pair_key(guild, id))
    }

    async fn put_suggestion(&self, suggestion: &Suggestion) -> StoreResult<()> {
        let guild = suggestion.guild_id;
        let key = pair_key(guild, suggestion.suggestion_id);
        debug!("Storing suggestion {} for guild {}", suggestion.suggestion_id, guild);

        // A failed decode must leave both trees untouched
        let previous = self
            .suggestions
            .get(key)?
            .map(|data| decode::<Suggestion>("suggestion", &data))
            .transpose()?;
        let document = encode("suggestion", suggestion)?;
        self.suggestions.insert(key, document)?;

        if let Some(old_message) = previous.and_then(|old| old.message_id) {
            if Some(old_message) != suggestion.message_id {
                self.messages.remove(pair_key(guild, old_message.get()))?;
            }
        }
        if let Some(message) = suggestion.message_id {
            self.messages.insert(
                pair_key(guild, message.get()),
                suggestion.suggestion_id.to_be_bytes().to_vec(),
            )?;
        }

        self.db.flush_async().await?;
        Ok(())
    }

    async fn find_by_message(
        &self,
        guild: GuildId,
        message: MessageId,
    ) -> StoreResult<Option<Suggestion>> {
        let Some(entry) = self.messages.get(pair_key(guild, message.get()))? else {
            return Ok(None);
        };
        let id = id_from_key(&entry)?;
        let suggestion = self.load_suggestion(&pair_key(guild, id))?;
        if suggestion.is_none() {
            warn!("Message index for {} points at missing suggestion {}", message, id);
        }
        Ok(suggestion)
    }

    async fn has_awaiting_review(&self, guild: GuildId) -> StoreResult<bool> {
        for entry in self.suggestions.scan_prefix(guild.key_bytes()) {
            let (_, data) = entry?;
            let suggestion: Suggestion = decode("suggestion", &data)?;
            if suggestion.is_awaiting_review() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn next_suggestion_id(&self, guild: GuildId) -> StoreResult<u64> {
        match self.suggestions.scan_prefix(guild.key_bytes()).next_back() {
            Some(entry) => {
                let (key, _) = entry?;
                Ok(id_from_key(&key)? + 1)
            }
            None => Ok(1),
        }
    }
}
