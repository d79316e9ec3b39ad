//! Reaction emoji references and vote slots.
//!
//! A stored [`EmojiRef`] is one of three shapes: disabled (`none`), a unicode
//! emoji, or a guild custom emoji. Custom emojis are stored as `name:id` or
//! `a:name:id`; the `<:name:id>` markup form is accepted on input too.

use crate::snapshot::CustomEmoji;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use suggester_common::EmojiId;
use unicode_segmentation::UnicodeSegmentation;

/// Stored value of a disabled slot.
pub const DISABLED: &str = "none";

static CUSTOM_EMOJI_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<?(?:(a):|:)?([A-Za-z0-9_~]{1,32}):(\d{1,20})>?$")
        .expect("Invalid custom emoji regex pattern")
});

/// One configured reaction emoji.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EmojiRef {
    /// The slot is turned off.
    Disabled,
    /// A unicode emoji, stored as the raw string.
    Unicode(String),
    /// A guild custom emoji.
    Custom {
        name: String,
        id: EmojiId,
        animated: bool,
    },
}

impl EmojiRef {
    /// Reads a stored value. Never fails: anything that is neither `none` nor
    /// a custom reference is kept verbatim as unicode.
    pub fn parse_stored(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(DISABLED) {
            return Self::Disabled;
        }
        parse_custom(raw).unwrap_or_else(|| Self::Unicode(raw.to_string()))
    }

    /// Identity used to match reactions against this reference.
    pub fn identity(&self) -> Option<EmojiIdentity> {
        match self {
            Self::Disabled => None,
            Self::Unicode(raw) => Some(EmojiIdentity::Unicode(raw.clone())),
            Self::Custom { id, .. } => Some(EmojiIdentity::Custom(*id)),
        }
    }

    /// Chat markup, e.g. `<:name:id>`. `None` when disabled.
    pub fn markup(&self) -> Option<String> {
        match self {
            Self::Disabled => None,
            Self::Unicode(raw) => Some(raw.clone()),
            Self::Custom {
                name,
                id,
                animated: true,
            } => Some(format!("<a:{name}:{id}>")),
            Self::Custom { name, id, .. } => Some(format!("<:{name}:{id}>")),
        }
    }

    pub const fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }
}

impl From<String> for EmojiRef {
    fn from(raw: String) -> Self {
        Self::parse_stored(&raw)
    }
}

impl From<EmojiRef> for String {
    fn from(emoji: EmojiRef) -> Self {
        emoji.to_string()
    }
}

impl fmt::Display for EmojiRef {
    /// Stored form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str(DISABLED),
            Self::Unicode(raw) => f.write_str(raw),
            Self::Custom {
                name,
                id,
                animated: true,
            } => write!(f, "a:{name}:{id}"),
            Self::Custom { name, id, .. } => write!(f, "{name}:{id}"),
        }
    }
}

fn parse_custom(raw: &str) -> Option<EmojiRef> {
    let caps = CUSTOM_EMOJI_REGEX.captures(raw)?;
    let id = caps.get(3)?.as_str().parse().ok()?;
    Some(EmojiRef::Custom {
        name: caps.get(2)?.as_str().to_string(),
        id: EmojiId(id),
        animated: caps.get(1).is_some(),
    })
}

/// What a reaction is compared by: the id for custom emojis, the raw
/// string for unicode ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EmojiIdentity {
    Custom(EmojiId),
    Unicode(String),
}

/// Whether `input` is exactly one unicode emoji grapheme.
pub fn is_unicode_emoji(input: &str) -> bool {
    let mut graphemes = input.graphemes(true);
    match (graphemes.next(), graphemes.next()) {
        (Some(grapheme), None) => {
            !grapheme.is_ascii() && !grapheme.chars().any(char::is_alphabetic)
        }
        _ => false,
    }
}

/// Resolves user input for the emoji setting.
///
/// Accepts a single unicode emoji, or a custom emoji of this guild given as
/// markup, bare id, or name. Returns `None` when nothing matches.
pub fn resolve_emoji_input(input: &str, guild_emojis: &[CustomEmoji]) -> Option<EmojiRef> {
    let input = input.trim();

    if let Some(EmojiRef::Custom { id, .. }) = parse_custom(input) {
        return guild_emojis.iter().find(|e| e.id == id).map(CustomEmoji::to_ref);
    }

    if let Ok(id) = input.parse::<u64>() {
        return guild_emojis
            .iter()
            .find(|e| e.id == EmojiId(id))
            .map(CustomEmoji::to_ref);
    }

    if is_unicode_emoji(input) {
        return Some(EmojiRef::Unicode(input.to_string()));
    }

    let name = input.trim_matches(':');
    guild_emojis
        .iter()
        .find(|e| e.name == name)
        .or_else(|| guild_emojis.iter().find(|e| e.name.eq_ignore_ascii_case(name)))
        .map(CustomEmoji::to_ref)
}

/// The three vote positions on a feed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteSlot {
    Up,
    Mid,
    Down,
}

impl VoteSlot {
    pub const ALL: [Self; 3] = [Self::Up, Self::Mid, Self::Down];

    /// Built-in emoji for the slot.
    pub const fn default_emoji(self) -> &'static str {
        match self {
            Self::Up => "👍",
            Self::Mid => "🤷",
            Self::Down => "👎",
        }
    }
}

impl fmt::Display for VoteSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Mid => "mid",
            Self::Down => "down",
        })
    }
}

/// The emoji set for the three vote slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoteEmojis {
    pub up: EmojiRef,
    pub mid: EmojiRef,
    pub down: EmojiRef,
}

impl Default for VoteEmojis {
    fn default() -> Self {
        Self {
            up: EmojiRef::Unicode(VoteSlot::Up.default_emoji().to_string()),
            mid: EmojiRef::Unicode(VoteSlot::Mid.default_emoji().to_string()),
            down: EmojiRef::Unicode(VoteSlot::Down.default_emoji().to_string()),
        }
    }
}

impl VoteEmojis {
    pub const fn get(&self, slot: VoteSlot) -> &EmojiRef {
        match slot {
            VoteSlot::Up => &self.up,
            VoteSlot::Mid => &self.mid,
            VoteSlot::Down => &self.down,
        }
    }

    pub fn set(&mut self, slot: VoteSlot, emoji: EmojiRef) {
        match slot {
            VoteSlot::Up => self.up = emoji,
            VoteSlot::Mid => self.mid = emoji,
            VoteSlot::Down => self.down = emoji,
        }
    }

    /// First slot whose emoji has this identity.
    pub fn slot_of(&self, identity: &EmojiIdentity) -> Option<VoteSlot> {
        VoteSlot::ALL
            .into_iter()
            .find(|slot| self.get(*slot).identity().as_ref() == Some(identity))
    }

    /// Enabled slots with their emoji, in up/mid/down order.
    pub fn enabled(&self) -> impl Iterator<Item = (VoteSlot, &EmojiRef)> {
        VoteSlot::ALL
            .into_iter()
            .map(|slot| (slot, self.get(slot)))
            .filter(|(_, emoji)| !emoji.is_disabled())
    }
}
