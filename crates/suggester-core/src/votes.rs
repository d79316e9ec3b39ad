//! Reaction interpretation and live vote tallies.

use crate::emoji::{EmojiIdentity, VoteEmojis, VoteSlot};
use crate::store::{StoreResult, SuggestionStore};
use crate::suggestion::Suggestion;
use suggester_common::{ChannelId, GuildId, MessageId};
use tracing::trace;

/// A reaction added to or removed from a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEvent {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub emoji: EmojiIdentity,
}

/// Outcome of interpreting a reaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionVerdict {
    /// The reaction is one of the suggestion's vote emojis.
    Vote {
        suggestion: Box<Suggestion>,
        slot: VoteSlot,
    },
    /// The message is not a feed post.
    UnknownMessage,
    /// The emoji is not part of the suggestion's snapshot.
    NotAVote,
}

impl ReactionVerdict {
    pub const fn is_vote(&self) -> bool {
        matches!(self, Self::Vote { .. })
    }
}

/// Matches `emoji` against the snapshot stored on the suggestion.
///
/// The live server emoji config is never consulted: a post keeps the
/// emojis it was published with.
pub fn classify(suggestion: Suggestion, emoji: &EmojiIdentity) -> ReactionVerdict {
    match suggestion.emojis.slot_of(emoji) {
        Some(slot) => ReactionVerdict::Vote {
            suggestion: Box::new(suggestion),
            slot,
        },
        None => ReactionVerdict::NotAVote,
    }
}

/// Looks up the suggestion posted as the event's message and classifies
/// the reaction.
pub async fn interpret_reaction<S>(store: &S, event: &ReactionEvent) -> StoreResult<ReactionVerdict>
where
    S: SuggestionStore + ?Sized,
{
    let Some(suggestion) = store
        .find_by_message(event.guild_id, event.message_id)
        .await?
    else {
        trace!(message = %event.message_id, "Reaction on a message that is not a feed post");
        return Ok(ReactionVerdict::UnknownMessage);
    };

    let verdict = classify(suggestion, &event.emoji);
    if !verdict.is_vote() {
        trace!(message = %event.message_id, emoji = ?event.emoji, "Reaction is not a vote emoji");
    }
    Ok(verdict)
}

/// One reaction entry on a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionCount {
    pub emoji: EmojiIdentity,
    pub count: u64,
    /// Whether the bot itself reacted.
    pub me: bool,
}

/// Vote counts computed from a feed message's current reactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteTally {
    pub up: u64,
    pub mid: u64,
    pub down: u64,
}

impl VoteTally {
    /// Counts reactions matching the snapshot, excluding the bot's own.
    pub fn from_reactions(snapshot: &VoteEmojis, reactions: &[ReactionCount]) -> Self {
        let mut tally = Self::default();
        for reaction in reactions {
            if let Some(slot) = snapshot.slot_of(&reaction.emoji) {
                let votes = reaction.count.saturating_sub(u64::from(reaction.me));
                *tally.slot_mut(slot) += votes;
            }
        }
        tally
    }

    pub const fn get(&self, slot: VoteSlot) -> u64 {
        match slot {
            VoteSlot::Up => self.up,
            VoteSlot::Mid => self.mid,
            VoteSlot::Down => self.down,
        }
    }

    /// Upvotes minus downvotes.
    pub fn score(&self) -> i64 {
        i64::try_from(self.up)
            .unwrap_or(i64::MAX)
            .saturating_sub(i64::try_from(self.down).unwrap_or(i64::MAX))
    }

    fn slot_mut(&mut self, slot: VoteSlot) -> &mut u64 {
        match slot {
            VoteSlot::Up => &mut self.up,
            VoteSlot::Mid => &mut self.mid,
            VoteSlot::Down => &mut self.down,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emoji::EmojiRef;
    use crate::store::memory::MemoryStore;
    use crate::store::SuggestionStore;
    use proptest::prelude::*;
    use suggester_common::test_utils::mock_timestamp;
    use suggester_common::{EmojiId, UserId};

    const GUILD: GuildId = GuildId(1);
    const MESSAGE: MessageId = MessageId(500);

    fn unicode(raw: &str) -> EmojiIdentity {
        EmojiIdentity::Unicode(raw.to_string())
    }

    fn event(emoji: EmojiIdentity) -> ReactionEvent {
        ReactionEvent {
            guild_id: GUILD,
            channel_id: ChannelId(2),
            message_id: MESSAGE,
            emoji,
        }
    }

    fn posted(snapshot: VoteEmojis) -> Suggestion {
        let mut suggestion = Suggestion::new(
            GUILD,
            1,
            UserId(7),
            Some("More emotes".to_string()),
            None,
            mock_timestamp(2024, 1, 1, 0, 0, 0),
        );
        suggestion.approve(MESSAGE, snapshot).unwrap();
        suggestion
    }

    fn thumbs_none_down() -> VoteEmojis {
        VoteEmojis {
            up: EmojiRef::Unicode("👍".to_string()),
            mid: EmojiRef::Disabled,
            down: EmojiRef::Unicode("👎".to_string()),
        }
    }

    #[tokio::test]
    async fn test_unknown_message_is_ignored() {
        let store = MemoryStore::new();
        let verdict = interpret_reaction(&store, &event(unicode("👍"))).await.unwrap();
        assert_eq!(verdict, ReactionVerdict::UnknownMessage);
    }

    #[tokio::test]
    async fn test_snapshot_wins_over_live_config() {
        let store = MemoryStore::new();
        store.put_suggestion(&posted(thumbs_none_down())).await.unwrap();

        // The server now uses a custom upvote, but the post keeps 👍
        let mut live = thumbs_none_down();
        live.up = EmojiRef::parse_stored("upvote:42");
        let mut config = crate::config::ServerConfig::default();
        config.emojis = live;
        crate::store::ConfigStore::write_config(&store, GUILD, &config)
            .await
            .unwrap();

        let verdict = interpret_reaction(&store, &event(unicode("👍"))).await.unwrap();
        assert!(matches!(verdict, ReactionVerdict::Vote { slot: VoteSlot::Up, .. }));

        let custom = interpret_reaction(&store, &event(EmojiIdentity::Custom(EmojiId(42))))
            .await
            .unwrap();
        assert_eq!(custom, ReactionVerdict::NotAVote);
    }

    #[tokio::test]
    async fn test_disabled_slot_never_matches() {
        let store = MemoryStore::new();
        store.put_suggestion(&posted(thumbs_none_down())).await.unwrap();

        let verdict = interpret_reaction(&store, &event(unicode("🤷"))).await.unwrap();
        assert_eq!(verdict, ReactionVerdict::NotAVote);
    }

    #[test]
    fn test_tally_excludes_bot_reactions() {
        let reactions = [
            ReactionCount {
                emoji: unicode("👍"),
                count: 5,
                me: true,
            },
            ReactionCount {
                emoji: unicode("👎"),
                count: 2,
                me: false,
            },
            ReactionCount {
                emoji: unicode("🎉"),
                count: 9,
                me: false,
            },
        ];
        let tally = VoteTally::from_reactions(&thumbs_none_down(), &reactions);
        assert_eq!(
            tally,
            VoteTally {
                up: 4,
                mid: 0,
                down: 2
            }
        );
        assert_eq!(tally.score(), 2);
    }

    fn identity_strategy() -> impl Strategy<Value = EmojiIdentity> {
        prop_oneof![
            (1u64..1_000).prop_map(|id| EmojiIdentity::Custom(EmojiId(id))),
            prop::sample::select(vec!["👍", "👎", "🤷", "🎉", "❤️"])
                .prop_map(|raw| EmojiIdentity::Unicode(raw.to_string())),
        ]
    }

    fn emoji_ref_strategy() -> impl Strategy<Value = EmojiRef> {
        prop_oneof![
            Just(EmojiRef::Disabled),
            identity_strategy().prop_map(|identity| match identity {
                EmojiIdentity::Custom(id) => EmojiRef::Custom {
                    name: "custom".to_string(),
                    id,
                    animated: false,
                },
                EmojiIdentity::Unicode(raw) => EmojiRef::Unicode(raw),
            }),
        ]
    }

    proptest! {
        #[test]
        fn test_only_snapshot_identities_are_votes(
            up in emoji_ref_strategy(),
            mid in emoji_ref_strategy(),
            down in emoji_ref_strategy(),
            emoji in identity_strategy(),
        ) {
            let snapshot = VoteEmojis { up, mid, down };
            let expected = [&snapshot.up, &snapshot.mid, &snapshot.down]
                .iter()
                .any(|e| e.identity().as_ref() == Some(&emoji));

            let verdict = classify(posted(snapshot), &emoji);
            prop_assert_eq!(verdict.is_vote(), expected);
        }
    }
}
