//! # Suggester Core
//!
//! Platform-independent heart of the Suggester bot.
//!
//! This crate owns the persisted data model (per-server configuration and
//! suggestions), the document store, self-healing validation of stored
//! role and channel references, reaction interpretation against a
//! suggestion's snapshot emojis, and rendering of every suggestion card.
//! Nothing here talks to the chat platform directly; the commands crate
//! converts between platform types and the snapshot types in [`snapshot`].

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod author;
pub mod config;
pub mod emoji;
pub mod healing;
pub mod render;
pub mod snapshot;
pub mod store;
pub mod suggestion;
pub mod votes;

pub use author::{AuthorTable, FetchError, UserDirectory, UserIdentity};
pub use config::{ChannelSettings, Mode, RoleSet, RoleSettings, ServerConfig, DEFAULT_PREFIX};
pub use emoji::{EmojiIdentity, EmojiRef, VoteEmojis, VoteSlot};
pub use healing::{validate, ConfigIssue, ConfigItem, IssueKind, Validation};
pub use render::{EmbedDocument, EmbedField, RenderContext};
pub use snapshot::{BotCapabilities, ChannelInfo, ChannelKind, CustomEmoji, GuildSnapshot, RoleInfo};
pub use store::{ConfigStore, SledStore, Store, StoreError, StoreResult, SuggestionStore};
pub use suggestion::{Comment, DisplayStatus, LifecycleError, Status, Suggestion};
pub use votes::{ReactionCount, ReactionEvent, ReactionVerdict, VoteTally};

#[cfg(any(test, feature = "testing"))]
pub use author::MockUserDirectory;
#[cfg(any(test, feature = "testing"))]
pub use store::memory::MemoryStore;
