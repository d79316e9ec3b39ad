//! Conversions between serenity models and the core snapshot types.

use poise::serenity_prelude as serenity;
use std::num::NonZeroU64;
use suggester_common::{ChannelId, EmojiId, GuildId, MessageId, RoleId, UserId};
use suggester_core::snapshot::{
    BotCapabilities, ChannelInfo, ChannelKind, CustomEmoji, GuildSnapshot, RoleInfo,
};
use suggester_core::{EmbedDocument, EmojiIdentity, ReactionCount};

macro_rules! id_conversion {
    ($id:ident, $from:ident, $to:ident) => {
        pub fn $from(id: serenity::$id) -> $id {
            $id(id.get())
        }

        /// `None` for zero, which the platform never issues.
        pub fn $to(id: $id) -> Option<serenity::$id> {
            NonZeroU64::new(id.get()).map(serenity::$id::from)
        }
    };
}

id_conversion!(GuildId, guild_id, to_serenity_guild);
id_conversion!(ChannelId, channel_id, to_serenity_channel);
id_conversion!(MessageId, message_id, to_serenity_message);
id_conversion!(RoleId, role_id, to_serenity_role);
id_conversion!(UserId, user_id, to_serenity_user);
id_conversion!(EmojiId, emoji_id, to_serenity_emoji);

fn channel_kind(kind: serenity::ChannelType) -> ChannelKind {
    match kind {
        serenity::ChannelType::Text | serenity::ChannelType::News => ChannelKind::Text,
        serenity::ChannelType::Voice | serenity::ChannelType::Stage => ChannelKind::Voice,
        serenity::ChannelType::Category => ChannelKind::Category,
        _ => ChannelKind::Other,
    }
}

/// Builds a snapshot of a cached guild. `None` when the bot is not in it.
pub fn guild_snapshot(cache: &serenity::Cache, id: GuildId) -> Option<GuildSnapshot> {
    let bot_id = cache.current_user().id;
    let guild = cache.guild(to_serenity_guild(id)?)?;

    let roles = guild
        .roles
        .values()
        .map(|role| {
            let info = RoleInfo {
                id: role_id(role.id),
                name: role.name.clone(),
                position: role.position,
                managed: role.managed,
            };
            (info.id, info)
        })
        .collect();

    let channels = guild
        .channels
        .values()
        .map(|channel| {
            let info = ChannelInfo {
                id: channel_id(channel.id),
                name: channel.name.clone(),
                kind: channel_kind(channel.kind),
            };
            (info.id, info)
        })
        .collect();

    let mut emojis: Vec<CustomEmoji> = guild
        .emojis
        .values()
        .map(|emoji| CustomEmoji {
            id: emoji_id(emoji.id),
            name: emoji.name.clone(),
            animated: emoji.animated,
        })
        .collect();
    emojis.sort_by(|a, b| a.name.cmp(&b.name));

    let bot = match guild.members.get(&bot_id) {
        Some(member) => {
            let permissions = guild.member_permissions(member);
            let top_role_position = member
                .roles
                .iter()
                .filter_map(|role| guild.roles.get(role))
                .map(|role| role.position)
                .max()
                .unwrap_or(0);
            BotCapabilities {
                user_id: user_id(bot_id),
                manage_roles: permissions.manage_roles(),
                mention_everyone: permissions.mention_everyone(),
                manage_messages: permissions.manage_messages(),
                top_role_position,
                permission_names: permissions
                    .get_permission_names()
                    .into_iter()
                    .map(ToString::to_string)
                    .collect(),
            }
        }
        None => BotCapabilities {
            user_id: user_id(bot_id),
            ..BotCapabilities::default()
        },
    };

    Some(GuildSnapshot {
        id,
        name: guild.name.clone(),
        icon_url: guild.icon_url(),
        roles,
        channels,
        emojis,
        bot,
    })
}

/// Identity of a reaction emoji; `None` for kinds that cannot be votes.
pub fn emoji_identity(reaction: &serenity::ReactionType) -> Option<EmojiIdentity> {
    match reaction {
        serenity::ReactionType::Custom { id, .. } => Some(EmojiIdentity::Custom(emoji_id(*id))),
        serenity::ReactionType::Unicode(name) => Some(EmojiIdentity::Unicode(name.clone())),
        _ => None,
    }
}

pub fn reaction_counts(reactions: &[serenity::MessageReaction]) -> Vec<ReactionCount> {
    reactions
        .iter()
        .filter_map(|reaction| {
            Some(ReactionCount {
                emoji: emoji_identity(&reaction.reaction_type)?,
                count: reaction.count,
                me: reaction.me,
            })
        })
        .collect()
}

pub fn create_embed(document: &EmbedDocument) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new().color(document.color);

    if let Some(title) = &document.title {
        embed = embed.title(title);
    }
    if let Some(author) = &document.author {
        let mut block = serenity::CreateEmbedAuthor::new(&author.name);
        if let Some(icon) = &author.icon_url {
            block = block.icon_url(icon);
        }
        embed = embed.author(block);
    }
    if let Some(thumbnail) = &document.thumbnail {
        embed = embed.thumbnail(thumbnail);
    }
    if let Some(description) = &document.description {
        embed = embed.description(description);
    }
    if let Some(footer) = &document.footer {
        embed = embed.footer(serenity::CreateEmbedFooter::new(footer));
    }
    if let Some(timestamp) = document
        .timestamp
        .and_then(|ts| serenity::Timestamp::from_unix_timestamp(ts.timestamp()).ok())
    {
        embed = embed.timestamp(timestamp);
    }
    embed = embed.fields(
        document
            .fields
            .iter()
            .map(|field| (field.name.clone(), field.value.clone(), field.inline)),
    );
    if let Some(image) = &document.image {
        embed = embed.image(image);
    }
    embed
}
