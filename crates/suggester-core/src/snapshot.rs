//! Point-in-time view of a guild, built from the platform cache.
//!
//! Reference validation and config input lookups read only this view, so
//! they stay pure and testable without a gateway connection.

use crate::emoji::EmojiRef;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use suggester_common::{ChannelId, EmojiId, GuildId, RoleId, UserId};

static ROLE_MENTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<@&(\d+)>$").expect("Invalid role mention regex pattern"));

static CHANNEL_MENTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<#(\d+)>$").expect("Invalid channel mention regex pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleInfo {
    pub id: RoleId,
    pub name: String,
    pub position: u16,
    /// Owned by an integration; cannot be assigned by bots.
    pub managed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Text,
    Voice,
    Category,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub id: ChannelId,
    pub name: String,
    pub kind: ChannelKind,
}

impl ChannelInfo {
    pub fn is_text(&self) -> bool {
        self.kind == ChannelKind::Text
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomEmoji {
    pub id: EmojiId,
    pub name: String,
    pub animated: bool,
}

impl CustomEmoji {
    pub fn to_ref(&self) -> EmojiRef {
        EmojiRef::Custom {
            name: self.name.clone(),
            id: self.id,
            animated: self.animated,
        }
    }
}

/// What the bot itself may do in the guild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BotCapabilities {
    pub user_id: UserId,
    pub manage_roles: bool,
    pub mention_everyone: bool,
    pub manage_messages: bool,
    /// Position of the bot's highest role.
    pub top_role_position: u16,
    /// Display names of every permission the bot holds.
    pub permission_names: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct GuildSnapshot {
    pub id: GuildId,
    pub name: String,
    pub icon_url: Option<String>,
    pub roles: HashMap<RoleId, RoleInfo>,
    pub channels: HashMap<ChannelId, ChannelInfo>,
    pub emojis: Vec<CustomEmoji>,
    pub bot: BotCapabilities,
}

impl GuildSnapshot {
    pub fn role(&self, id: RoleId) -> Option<&RoleInfo> {
        self.roles.get(&id)
    }

    /// A channel that exists and accepts text messages.
    pub fn text_channel(&self, id: ChannelId) -> Option<&ChannelInfo> {
        self.channels.get(&id).filter(|channel| channel.is_text())
    }

    /// Finds a role by mention, id, or case-insensitive name.
    pub fn find_role(&self, input: &str) -> Option<&RoleInfo> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let by_id = ROLE_MENTION_REGEX
            .captures(input)
            .and_then(|caps| caps.get(1))
            .map_or(input, |m| m.as_str())
            .parse::<RoleId>()
            .ok()
            .and_then(|id| self.role(id));
        if by_id.is_some() {
            return by_id;
        }

        let name = input.strip_prefix('@').unwrap_or(input);
        self.roles
            .values()
            .filter(|role| {
                role.name.eq_ignore_ascii_case(name)
                    || role.name.trim_start_matches('@').eq_ignore_ascii_case(name)
            })
            .min_by_key(|role| std::cmp::Reverse(role.position))
    }

    /// Finds a text channel by mention, id, or case-insensitive name.
    pub fn find_text_channel(&self, input: &str) -> Option<&ChannelInfo> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let by_id = CHANNEL_MENTION_REGEX
            .captures(input)
            .and_then(|caps| caps.get(1))
            .map_or(input, |m| m.as_str())
            .parse::<ChannelId>()
            .ok()
            .and_then(|id| self.text_channel(id));
        if by_id.is_some() {
            return by_id;
        }

        let name = input.strip_prefix('#').unwrap_or(input);
        self.channels
            .values()
            .filter(|channel| channel.is_text() && channel.name.eq_ignore_ascii_case(name))
            .min_by_key(|channel| channel.id)
    }

    /// Whether the bot can hand `role` out to members.
    pub fn bot_can_assign(&self, role: &RoleInfo) -> bool {
        self.bot.manage_roles && !role.managed && role.position < self.bot.top_role_position
    }

    pub fn is_everyone_role(&self, role: RoleId) -> bool {
        role == self.id.everyone_role()
    }
}

/// Small guild used by tests across the workspace.
#[cfg(any(test, feature = "testing"))]
pub mod fixtures {
    use super::*;

    pub const GUILD: GuildId = GuildId(1_000);
    pub const ADMIN_ROLE: RoleId = RoleId(11);
    pub const STAFF_ROLE: RoleId = RoleId(12);
    pub const BOT_ROLE: RoleId = RoleId(13);
    pub const FEED_CHANNEL: ChannelId = ChannelId(21);
    pub const REVIEW_CHANNEL: ChannelId = ChannelId(22);
    pub const VOICE_CHANNEL: ChannelId = ChannelId(23);

    pub fn role(id: RoleId, name: &str, position: u16, managed: bool) -> RoleInfo {
        RoleInfo {
            id,
            name: name.to_string(),
            position,
            managed,
        }
    }

    pub fn channel(id: ChannelId, name: &str, kind: ChannelKind) -> ChannelInfo {
        ChannelInfo {
            id,
            name: name.to_string(),
            kind,
        }
    }

    /// A guild with admin/staff roles, feed/review text channels and a
    /// voice channel.
    pub fn guild() -> GuildSnapshot {
        let roles = [
            role(GUILD.everyone_role(), "@everyone", 0, false),
            role(ADMIN_ROLE, "Admins", 5, false),
            role(STAFF_ROLE, "Staff", 4, false),
            role(BOT_ROLE, "Suggester", 6, true),
        ];
        let channels = [
            channel(FEED_CHANNEL, "suggestions", ChannelKind::Text),
            channel(REVIEW_CHANNEL, "staff-review", ChannelKind::Text),
            channel(VOICE_CHANNEL, "General", ChannelKind::Voice),
        ];

        GuildSnapshot {
            id: GUILD,
            name: "Test Server".to_string(),
            icon_url: None,
            roles: roles.into_iter().map(|r| (r.id, r)).collect(),
            channels: channels.into_iter().map(|c| (c.id, c)).collect(),
            emojis: Vec::new(),
            bot: BotCapabilities {
                user_id: UserId(99),
                manage_roles: true,
                mention_everyone: true,
                manage_messages: true,
                top_role_position: 6,
                permission_names: vec!["Send Messages".to_string()],
            },
        }
    }
}
