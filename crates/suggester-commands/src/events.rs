//! Gateway event handling.

use crate::context::{CommandError, Data};
use crate::convert;
use crate::feed::{FeedUpdater, SerenityFeed};
use poise::serenity_prelude as serenity;
use suggester_core::votes::interpret_reaction;
use suggester_core::{ReactionEvent, ReactionVerdict, SuggestionStore};
use tracing::{debug, error, info, trace};

/// Central event handler for Discord events.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, CommandError>,
    data: &Data,
) -> Result<(), CommandError> {
    match event {
        serenity::FullEvent::ReactionAdd { add_reaction } => {
            handle_reaction(ctx, add_reaction, data).await;
        }
        serenity::FullEvent::ReactionRemove { removed_reaction } => {
            handle_reaction(ctx, removed_reaction, data).await;
        }
        serenity::FullEvent::GuildCreate { guild, is_new } => {
            if is_new.unwrap_or(false) {
                info!("Joined guild: {} (ID: {})", guild.name, guild.id);
            } else {
                debug!("Guild available: {} (ID: {})", guild.name, guild.id);
            }
        }
        serenity::FullEvent::Ready { data_about_bot } => {
            info!("Bot ready event received for: {}", data_about_bot.user.name);
        }
        _ => {}
    }
    Ok(())
}

/// Builds the platform-independent view of a reaction.
///
/// `None` outside guilds and for emoji kinds that cannot be votes.
pub fn reaction_event(reaction: &serenity::Reaction) -> Option<ReactionEvent> {
    Some(ReactionEvent {
        guild_id: convert::guild_id(reaction.guild_id?),
        channel_id: convert::channel_id(reaction.channel_id),
        message_id: convert::message_id(reaction.message_id),
        emoji: convert::emoji_identity(&reaction.emoji)?,
    })
}

async fn handle_reaction(ctx: &serenity::Context, reaction: &serenity::Reaction, data: &Data) {
    // The bot's own seed reactions are not votes
    if reaction.user_id == Some(ctx.cache.current_user().id) {
        return;
    }
    let Some(event) = reaction_event(reaction) else {
        return;
    };

    let feed = SerenityFeed::new(ctx, data);
    refresh_votes(data.store.as_ref(), &feed, &event).await;
}

/// Refreshes the vote counts of a feed post after a vote is cast or withdrawn.
///
/// Returns whether the post was re-rendered. Failures are logged; a reaction
/// never fails the event loop.
pub async fn refresh_votes<S, F>(store: &S, feed: &F, event: &ReactionEvent) -> bool
where
    S: SuggestionStore + ?Sized,
    F: FeedUpdater + ?Sized,
{
    let verdict = match interpret_reaction(store, event).await {
        Ok(verdict) => verdict,
        Err(e) => {
            error!(
                "Failed to look up message {} in guild {}: {}",
                event.message_id, event.guild_id, e
            );
            return false;
        }
    };

    let (suggestion, slot) = match verdict {
        ReactionVerdict::Vote { suggestion, slot } => (suggestion, slot),
        other => {
            trace!("Ignoring reaction on message {}: {:?}", event.message_id, other);
            return false;
        }
    };

    debug!(
        "Vote {} changed on suggestion {} in guild {}",
        slot, suggestion.suggestion_id, event.guild_id
    );
    if let Err(e) = feed.update(&suggestion, event.channel_id).await {
        error!(
            "Failed to update feed post for suggestion {} in guild {}: {}",
            suggestion.suggestion_id, event.guild_id, e
        );
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{FeedError, MockFeedUpdater};
    use suggester_common::test_utils::mock_timestamp;
    use suggester_common::{ChannelId, GuildId, MessageId, UserId};
    use suggester_core::{EmojiIdentity, EmojiRef, MemoryStore, Suggestion, VoteEmojis};

    const GUILD: GuildId = GuildId(1);
    const CHANNEL: ChannelId = ChannelId(2);
    const MESSAGE: MessageId = MessageId(500);

    fn event(message_id: MessageId, emoji: &str) -> ReactionEvent {
        ReactionEvent {
            guild_id: GUILD,
            channel_id: CHANNEL,
            message_id,
            emoji: EmojiIdentity::Unicode(emoji.to_string()),
        }
    }

    async fn store_with_post() -> MemoryStore {
        let mut suggestion = Suggestion::new(
            GUILD,
            4,
            UserId(7),
            Some("Weekly movie night".to_string()),
            None,
            mock_timestamp(2024, 3, 1, 18, 0, 0),
        );
        let snapshot = VoteEmojis {
            up: EmojiRef::Unicode("👍".to_string()),
            mid: EmojiRef::Disabled,
            down: EmojiRef::Unicode("👎".to_string()),
        };
        suggestion.approve(MESSAGE, snapshot).unwrap();

        let store = MemoryStore::new();
        store.put_suggestion(&suggestion).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_vote_updates_feed_once() {
        let store = store_with_post().await;
        let mut feed = MockFeedUpdater::new();
        feed.expect_update()
            .withf(|suggestion, channel| suggestion.suggestion_id == 4 && *channel == CHANNEL)
            .times(1)
            .returning(|_, _| Ok(()));

        assert!(refresh_votes(&store, &feed, &event(MESSAGE, "👎")).await);
    }

    #[tokio::test]
    async fn test_unknown_message_is_not_updated() {
        let store = store_with_post().await;
        let mut feed = MockFeedUpdater::new();
        feed.expect_update().never();

        assert!(!refresh_votes(&store, &feed, &event(MessageId(501), "👍")).await);
    }

    #[tokio::test]
    async fn test_non_vote_emoji_is_not_updated() {
        let store = store_with_post().await;
        let mut feed = MockFeedUpdater::new();
        feed.expect_update().never();

        // Disabled middle slot and an unrelated emoji
        assert!(!refresh_votes(&store, &feed, &event(MESSAGE, "🤷")).await);
        assert!(!refresh_votes(&store, &feed, &event(MESSAGE, "🎉")).await);
    }

    #[tokio::test]
    async fn test_feed_failure_is_swallowed() {
        let store = store_with_post().await;
        let mut feed = MockFeedUpdater::new();
        feed.expect_update()
            .times(1)
            .returning(|suggestion, _| Err(FeedError::NotPosted(suggestion.suggestion_id)));

        assert!(refresh_votes(&store, &feed, &event(MESSAGE, "👍")).await);
    }
}
