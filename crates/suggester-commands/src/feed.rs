//! Keeping feed posts in step with their suggestion.

use crate::context::Data;
use crate::convert;
use crate::directory::SerenityDirectory;
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use suggester_common::ChannelId;
use suggester_core::render::feed_card;
use suggester_core::store::config_or_default;
use suggester_core::{AuthorTable, StoreError, Suggestion, VoteTally};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Suggestion {0} has no feed post")]
    NotPosted(u64),

    #[error("Feed post of suggestion {0} has an invalid channel or message id")]
    InvalidId(u64),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Discord request failed: {0}")]
    Discord(#[from] serenity::Error),
}

/// Re-renders feed posts after a vote changes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedUpdater: Send + Sync {
    async fn update(&self, suggestion: &Suggestion, channel: ChannelId) -> Result<(), FeedError>;
}

/// Edits feed posts through the Discord API.
pub struct SerenityFeed<'a> {
    ctx: &'a serenity::Context,
    data: &'a Data,
}

impl<'a> SerenityFeed<'a> {
    pub const fn new(ctx: &'a serenity::Context, data: &'a Data) -> Self {
        Self { ctx, data }
    }
}

#[async_trait]
impl FeedUpdater for SerenityFeed<'_> {
    async fn update(&self, suggestion: &Suggestion, channel: ChannelId) -> Result<(), FeedError> {
        update_feed_message(self.ctx, self.data, suggestion, channel).await
    }
}

/// Re-renders the feed post of `suggestion` in `channel`.
///
/// Vote counts are read from the post's current reactions.
pub async fn update_feed_message(
    ctx: &serenity::Context,
    data: &Data,
    suggestion: &Suggestion,
    channel: ChannelId,
) -> Result<(), FeedError> {
    let sid = suggestion.suggestion_id;
    let message_id = suggestion.message_id.ok_or(FeedError::NotPosted(sid))?;
    let (Some(channel_id), Some(message_id)) = (
        convert::to_serenity_channel(channel),
        convert::to_serenity_message(message_id),
    ) else {
        return Err(FeedError::InvalidId(sid));
    };

    let mut message = channel_id.message(ctx, message_id).await?;

    let server =
        config_or_default(data.store.as_ref(), suggestion.guild_id, data.default_prefix()).await?;
    let locale = data.locale_for(&server);
    let render = data.render_context(&locale);

    let tally = VoteTally::from_reactions(
        &suggestion.emojis,
        &convert::reaction_counts(&message.reactions),
    );
    let directory = SerenityDirectory::new(ctx);
    let authors = AuthorTable::for_suggestion(&directory, suggestion, render.unknown_user()).await;
    let card = feed_card(&render, suggestion, &authors, Some(&tally));

    message
        .edit(ctx, serenity::EditMessage::new().embed(convert::create_embed(&card)))
        .await?;
    debug!(
        "Updated feed post {} of suggestion {} in guild {} (score {})",
        message.id,
        sid,
        suggestion.guild_id,
        tally.score()
    );
    Ok(())
}
