//! Per-server configuration record.

use crate::emoji::VoteEmojis;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use suggester_common::{ChannelId, RoleId};

/// Prefix used by servers that never set one.
pub const DEFAULT_PREFIX: &str = ".";

/// How new suggestions enter the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Held in the review channel until staff approve them.
    #[default]
    Review,
    /// Posted to the feed immediately.
    Autoapprove,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Review => "review",
            Self::Autoapprove => "autoapprove",
        })
    }
}

/// An insertion-ordered set of role ids.
///
/// Older documents stored a single id string where a list is expected; both
/// shapes deserialize into a set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RoleSet(Vec<RoleId>);

impl RoleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, role: RoleId) -> bool {
        self.0.contains(&role)
    }

    /// Appends `role`. Returns `false` if it was already present.
    pub fn insert(&mut self, role: RoleId) -> bool {
        if self.contains(role) {
            return false;
        }
        self.0.push(role);
        true
    }

    /// Removes `role`. Returns `false` if it was absent.
    pub fn remove(&mut self, role: RoleId) -> bool {
        let before = self.0.len();
        self.0.retain(|r| *r != role);
        self.0.len() != before
    }

    /// Keeps only the roles for which `keep` returns true, returning the
    /// removed ones in order.
    pub fn retain_resolvable(&mut self, mut keep: impl FnMut(RoleId) -> bool) -> Vec<RoleId> {
        let (kept, removed) = self.0.iter().partition(|role| keep(**role));
        self.0 = kept;
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = RoleId> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<RoleId> for RoleSet {
    fn from_iter<I: IntoIterator<Item = RoleId>>(iter: I) -> Self {
        let mut set = Self::new();
        for role in iter {
            set.insert(role);
        }
        set
    }
}

impl<'de> Deserialize<'de> for RoleSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Many(Vec<LenientId>),
            One(LenientId),
        }

        let ids = match Repr::deserialize(deserializer)? {
            Repr::Many(ids) => ids,
            Repr::One(id) => vec![id],
        };
        Ok(ids.into_iter().filter_map(|id| id.0).map(RoleId).collect())
    }
}

/// An id written as a number, a numeric string, an empty string, or null.
#[derive(Debug, Clone, Copy)]
struct LenientId(Option<u64>);

impl<'de> Deserialize<'de> for LenientId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(u64),
            Text(String),
            Null(()),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(id) => Ok(Self(Some(id))),
            Repr::Text(text) if text.trim().is_empty() => Ok(Self(None)),
            Repr::Text(text) => text
                .trim()
                .parse()
                .map(|id| Self(Some(id)))
                .map_err(serde::de::Error::custom),
            Repr::Null(()) => Ok(Self(None)),
        }
    }
}

fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<u64>,
{
    Ok(Option::<LenientId>::deserialize(deserializer)?
        .and_then(|id| id.0)
        .map(T::from))
}

/// Role configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleSettings {
    pub admin: RoleSet,
    pub staff: RoleSet,
    pub allowed: RoleSet,
    pub blocked: RoleSet,
    #[serde(deserialize_with = "lenient_option")]
    pub approved_role: Option<RoleId>,
    #[serde(deserialize_with = "lenient_option")]
    pub ping_role: Option<RoleId>,
}

/// Channel configuration. `staff` is the review channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelSettings {
    #[serde(deserialize_with = "lenient_option")]
    pub suggestions: Option<ChannelId>,
    #[serde(deserialize_with = "lenient_option")]
    pub staff: Option<ChannelId>,
    #[serde(deserialize_with = "lenient_option")]
    pub denied: Option<ChannelId>,
    #[serde(deserialize_with = "lenient_option")]
    pub log: Option<ChannelId>,
    #[serde(deserialize_with = "lenient_option")]
    pub archive: Option<ChannelId>,
    #[serde(deserialize_with = "lenient_option")]
    pub commands: Option<ChannelId>,
}

/// Settings record for one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub prefix: String,
    pub mode: Mode,
    pub roles: RoleSettings,
    pub channels: ChannelSettings,
    pub emojis: VoteEmojis,
    /// Add vote reactions to new feed posts.
    pub react: bool,
    /// DM members about their suggestions by default.
    pub notify: bool,
    /// Delete the member's command message after a suggestion is submitted.
    pub clean_suggestion_command: bool,
    pub flags: Vec<String>,
    pub locale: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            mode: Mode::default(),
            roles: RoleSettings::default(),
            channels: ChannelSettings::default(),
            emojis: VoteEmojis::default(),
            react: true,
            notify: true,
            clean_suggestion_command: false,
            flags: Vec::new(),
            locale: None,
        }
    }
}

impl ServerConfig {
    /// A fresh record using the bot's default prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }
}
