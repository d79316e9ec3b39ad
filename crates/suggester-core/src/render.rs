//! Suggestion card rendering.
//!
//! Every view is a pure function from a suggestion (plus pre-resolved
//! authors) to an [`EmbedDocument`], a platform-neutral embed description.
//! Text is clamped to the platform's embed limits.

use crate::author::{AuthorTable, UserIdentity};
use crate::emoji::VoteEmojis;
use crate::suggestion::{DisplayStatus, Status, Suggestion};
use crate::votes::VoteTally;
use chrono::{DateTime, Utc};
use suggester_common::{format_utc_string, truncate_string, ChannelId};
use suggester_config::{Palette, PaletteColor};
use suggester_i18n::{args, Catalog, Locale};

pub const MAX_TITLE_LENGTH: usize = 256;
pub const MAX_DESCRIPTION_LENGTH: usize = 4096;
pub const MAX_FIELD_NAME_LENGTH: usize = 256;
pub const MAX_FIELD_VALUE_LENGTH: usize = 1024;
pub const MAX_FOOTER_LENGTH: usize = 2048;
pub const MAX_FIELDS: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedAuthor {
    pub name: String,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// A rendered embed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedDocument {
    pub title: Option<String>,
    pub author: Option<EmbedAuthor>,
    pub thumbnail: Option<String>,
    pub description: Option<String>,
    pub footer: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub image: Option<String>,
}

impl EmbedDocument {
    pub fn new(color: u32) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    pub fn title(mut self, title: impl AsRef<str>) -> Self {
        self.title = Some(truncate_string(title.as_ref(), MAX_TITLE_LENGTH));
        self
    }

    pub fn author(mut self, name: impl AsRef<str>, icon_url: Option<String>) -> Self {
        self.author = Some(EmbedAuthor {
            name: truncate_string(name.as_ref(), MAX_TITLE_LENGTH),
            icon_url,
        });
        self
    }

    pub fn description(mut self, description: impl AsRef<str>) -> Self {
        self.description = Some(truncate_string(description.as_ref(), MAX_DESCRIPTION_LENGTH));
        self
    }

    pub fn footer(mut self, footer: impl AsRef<str>) -> Self {
        self.footer = Some(truncate_string(footer.as_ref(), MAX_FOOTER_LENGTH));
        self
    }

    pub const fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Appends a field; ignored once the field limit is reached.
    pub fn field(mut self, name: impl AsRef<str>, value: impl AsRef<str>, inline: bool) -> Self {
        if self.fields.len() < MAX_FIELDS {
            self.fields.push(EmbedField {
                name: truncate_string(name.as_ref(), MAX_FIELD_NAME_LENGTH),
                value: truncate_string(value.as_ref(), MAX_FIELD_VALUE_LENGTH),
                inline,
            });
        }
        self
    }
}

/// Everything a view needs besides the suggestion.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub catalog: &'a Catalog,
    pub locale: &'a Locale,
    pub palette: &'a Palette,
}

impl<'a> RenderContext<'a> {
    pub const fn new(catalog: &'a Catalog, locale: &'a Locale, palette: &'a Palette) -> Self {
        Self {
            catalog,
            locale,
            palette,
        }
    }

    fn text(&self, key: &str) -> String {
        self.catalog.text(self.locale, key)
    }

    fn format(&self, key: &str, args: &[(&str, String)]) -> String {
        self.catalog.format(self.locale, key, args)
    }

    /// The localized placeholder identity.
    pub fn unknown_user(&self) -> UserIdentity {
        UserIdentity::unknown(self.text("unknown-user"))
    }
}

/// Public feed card.
pub fn feed_card(
    ctx: &RenderContext<'_>,
    suggestion: &Suggestion,
    authors: &AuthorTable,
    tally: Option<&VoteTally>,
) -> EmbedDocument {
    let suggester = authors.get(&suggestion.suggester);
    let sid = suggestion.suggestion_id;

    let mut embed = EmbedDocument::new(ctx.palette.get(PaletteColor::Default))
        .author(
            ctx.format("suggestion-from-title", &args!["user" => suggester.tag]),
            suggester.avatar_url.clone(),
        )
        .footer(ctx.format("suggestion-footer", &args!["id" => sid]))
        .timestamp(suggestion.submitted);
    embed.thumbnail.clone_from(&suggester.avatar_url);

    if let Some(body) = &suggestion.suggestion {
        embed = embed.description(body);
    }

    let status = match suggestion.display_status {
        DisplayStatus::Implemented => Some((PaletteColor::Green, "status-implemented")),
        DisplayStatus::Working => Some((PaletteColor::Orange, "status-progress")),
        DisplayStatus::No => Some((PaletteColor::Gray, "status-no")),
        DisplayStatus::Default => None,
    };
    if let Some((color, key)) = status {
        embed.color = ctx.palette.get(color);
        embed = embed.field(ctx.text("info-public-status-header"), ctx.text(key), false);
    }

    for comment in suggestion.visible_comments() {
        let author = authors.get(&comment.author);
        let comment_id = format!("{sid}_{}", comment.id);
        let mut title = if author.is_unknown() {
            format!("{} (ID {comment_id})", ctx.text("comment-title-anonymous"))
        } else {
            ctx.format(
                "comment-title",
                &args!["user" => author.tag, "id" => comment_id],
            )
        };
        if let Some(created) = comment.created {
            title.push_str(" • ");
            title.push_str(&format_utc_string(created));
        }
        embed = embed.field(title, &comment.comment, false);
    }

    if let Some(tally) = tally {
        if let Some(summary) = tally_summary(&suggestion.emojis, tally) {
            embed = embed.field(ctx.text("votes-header"), summary, false);
        }
    }

    embed.image.clone_from(&suggestion.attachment);
    embed
}

fn tally_summary(emojis: &VoteEmojis, tally: &VoteTally) -> Option<String> {
    let parts: Vec<String> = emojis
        .enabled()
        .filter_map(|(slot, emoji)| Some(format!("{} {}", emoji.markup()?, tally.get(slot))))
        .collect();
    (!parts.is_empty()).then(|| parts.join(" · "))
}

/// Extra field shown on a DM card, such as a denial reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasonField {
    pub header: String,
    pub text: String,
}

/// Caller-chosen parts of a DM card.
#[derive(Debug, Clone)]
pub struct DmCard<'a> {
    /// Catalog key of the title; receives `server`.
    pub title_key: &'a str,
    pub server_name: &'a str,
    pub color: u32,
    /// Feed channel of the server, for the post link.
    pub feed_channel: Option<ChannelId>,
    pub include_image: bool,
    pub reason: Option<ReasonField>,
}

/// Link to a message in a guild channel.
pub fn message_link(suggestion: &Suggestion, channel: ChannelId) -> Option<String> {
    suggestion.message_id.map(|message| {
        format!(
            "https://discord.com/channels/{}/{}/{}",
            suggestion.guild_id, channel, message
        )
    })
}

/// Direct message sent to the submitter.
pub fn dm_card(ctx: &RenderContext<'_>, suggestion: &Suggestion, card: &DmCard<'_>) -> EmbedDocument {
    let mut description = suggestion
        .suggestion
        .clone()
        .unwrap_or_else(|| ctx.text("no-suggestion-content"));

    if suggestion.status == Status::Approved {
        if let Some(link) = card
            .feed_channel
            .and_then(|channel| message_link(suggestion, channel))
        {
            description.push_str(&format!("\n[{}]({link})", ctx.text("suggestion-feed-link")));
        }
    }

    let mut embed = EmbedDocument::new(card.color)
        .title(ctx.format(card.title_key, &args!["server" => card.server_name]))
        .footer(ctx.format("suggestion-footer", &args!["id" => suggestion.suggestion_id]))
        .description(description)
        .timestamp(suggestion.submitted);

    if card.include_image {
        embed.image.clone_from(&suggestion.attachment);
    }
    if let Some(reason) = &card.reason {
        embed = embed.field(&reason.header, &reason.text, false);
    }
    embed
}

/// Card posted to the staff review channel.
pub fn review_card(
    ctx: &RenderContext<'_>,
    suggestion: &Suggestion,
    submitter: &UserIdentity,
    color: u32,
    change: Option<&str>,
) -> EmbedDocument {
    let submitter_id = submitter
        .id
        .map_or_else(|| suggestion.suggester.clone(), |id| id.to_string());

    let mut embed = EmbedDocument::new(color)
        .title(ctx.format(
            "suggestion-review-embed-title",
            &args!["id" => suggestion.suggestion_id],
        ))
        .author(
            ctx.format(
                "user-info-header",
                &args!["user" => submitter.tag, "id" => submitter_id],
            ),
            submitter.avatar_url.clone(),
        )
        .footer(ctx.format("suggestion-footer", &args!["id" => suggestion.suggestion_id]))
        .timestamp(suggestion.submitted);

    if let Some(body) = &suggestion.suggestion {
        embed = embed.description(body);
    }
    if let Some(change) = change {
        embed = embed.field(ctx.text("suggestion-change-review-embed"), change, false);
    }
    if let Some(attachment) = &suggestion.attachment {
        embed = embed.field(ctx.text("with-attachment-header"), attachment, false);
        embed.image = Some(attachment.clone());
    }
    embed
}

/// Entry for the server's log channel. The suggestion body is not repeated.
pub fn log_entry(
    ctx: &RenderContext<'_>,
    suggestion: &Suggestion,
    actor: &UserIdentity,
    title_key: &str,
    color: u32,
    now: DateTime<Utc>,
) -> EmbedDocument {
    let actor_id = actor.id.map_or_else(|| "0".to_string(), |id| id.to_string());

    EmbedDocument::new(color)
        .author(
            ctx.format(
                title_key,
                &args!["user" => actor.tag, "id" => suggestion.suggestion_id],
            ),
            actor.avatar_url.clone(),
        )
        .footer(ctx.format(
            "log-suggestion-submitted-footer",
            &args!["id" => suggestion.suggestion_id, "user" => actor_id],
        ))
        .timestamp(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emoji::EmojiRef;
    use suggester_common::test_utils::mock_timestamp;
    use suggester_common::{GuildId, MessageId, UserId};

    struct Fixture {
        catalog: Catalog,
        locale: Locale,
        palette: Palette,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                catalog: Catalog::bundled(&Locale::default()).unwrap(),
                locale: Locale::default(),
                palette: Palette::default(),
            }
        }

        fn ctx(&self) -> RenderContext<'_> {
            RenderContext::new(&self.catalog, &self.locale, &self.palette)
        }
    }

    fn approved() -> Suggestion {
        let mut suggestion = Suggestion::new(
            GuildId(10),
            42,
            UserId(5),
            Some("Add a poll command".to_string()),
            Some("https://cdn.example/image.png".to_string()),
            mock_timestamp(2024, 2, 3, 4, 5, 6),
        );
        suggestion
            .approve(MessageId(900), VoteEmojis::default())
            .unwrap();
        suggestion
    }

    fn known_authors(ctx: &RenderContext<'_>) -> AuthorTable {
        let mut table = AuthorTable::empty(ctx.unknown_user());
        table.insert(
            "5",
            UserIdentity::new(UserId(5), "Ana#0001", Some("https://cdn.example/ana.png".into())),
        );
        table
    }

    #[test]
    fn test_feed_card_basics() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let embed = feed_card(&ctx, &approved(), &known_authors(&ctx), None);

        let author = embed.author.unwrap();
        assert_eq!(author.name, "Suggestion from Ana#0001");
        assert_eq!(author.icon_url.as_deref(), Some("https://cdn.example/ana.png"));
        assert_eq!(embed.thumbnail.as_deref(), Some("https://cdn.example/ana.png"));
        assert_eq!(embed.description.as_deref(), Some("Add a poll command"));
        assert_eq!(embed.footer.as_deref(), Some("Suggestion ID: 42"));
        assert_eq!(embed.timestamp, Some(mock_timestamp(2024, 2, 3, 4, 5, 6)));
        assert_eq!(embed.color, fixture.palette.default.0);
        assert_eq!(embed.image.as_deref(), Some("https://cdn.example/image.png"));
        assert!(embed.fields.is_empty());
    }

    #[test]
    fn test_feed_card_status_colors() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let authors = known_authors(&ctx);

        for (status, color, text) in [
            (DisplayStatus::Implemented, fixture.palette.green.0, "This suggestion was implemented!"),
            (DisplayStatus::Working, fixture.palette.orange.0, "This suggestion is currently in progress."),
            (DisplayStatus::No, fixture.palette.gray.0, "This suggestion will not be implemented."),
        ] {
            let mut suggestion = approved();
            suggestion.set_display_status(status).unwrap();
            let embed = feed_card(&ctx, &suggestion, &authors, None);
            assert_eq!(embed.color, color);
            assert_eq!(embed.fields[0].name, "Public Status");
            assert_eq!(embed.fields[0].value, text);
        }
    }

    #[test]
    fn test_feed_card_comments() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut suggestion = approved();
        let created = mock_timestamp(2020, 6, 2, 8, 5, 9);
        suggestion.add_comment(UserId(5), "Planned", created).unwrap();
        suggestion.add_comment(UserId(6), "Hidden", created).unwrap();
        suggestion.add_comment(UserId(404), "From a ghost", created).unwrap();
        suggestion.delete_comment(2).unwrap();
        suggestion.comments[2].created = None;

        let embed = feed_card(&ctx, &suggestion, &known_authors(&ctx), None);

        assert_eq!(embed.fields.len(), 2);
        assert_eq!(
            embed.fields[0].name,
            "Comment from Ana#0001 (ID 42_1) • Tue, 02 Jun 2020 08:05:09 GMT"
        );
        assert_eq!(embed.fields[0].value, "Planned");
        assert_eq!(embed.fields[1].name, "Staff Comment (ID 42_3)");
    }

    #[test]
    fn test_feed_card_with_unresolvable_author() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut suggestion = approved();
        suggestion.suggester = "not-a-user".to_string();

        let embed = feed_card(&ctx, &suggestion, &AuthorTable::empty(ctx.unknown_user()), None);
        assert_eq!(embed.author.unwrap().name, "Suggestion from Unknown User#0000");
        assert_eq!(embed.thumbnail, None);
    }

    #[test]
    fn test_feed_card_votes_field() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut suggestion = approved();
        suggestion.emojis.mid = EmojiRef::Disabled;
        suggestion.emojis.down = EmojiRef::parse_stored("nope:77");

        let tally = VoteTally {
            up: 3,
            mid: 0,
            down: 1,
        };
        let embed = feed_card(&ctx, &suggestion, &known_authors(&ctx), Some(&tally));
        let votes = embed.fields.last().unwrap();
        assert_eq!(votes.name, "Votes");
        assert_eq!(votes.value, "👍 3 · <:nope:77> 1");
    }

    #[test]
    fn test_dm_card_link_only_when_approved() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let card = DmCard {
            title_key: "approved-dm-title",
            server_name: "Test Server",
            color: 0x00ff00,
            feed_channel: Some(ChannelId(20)),
            include_image: false,
            reason: None,
        };

        let embed = dm_card(&ctx, &approved(), &card);
        assert_eq!(
            embed.title.as_deref(),
            Some("Your suggestion was approved in **Test Server**!")
        );
        assert_eq!(
            embed.description.as_deref(),
            Some("Add a poll command\n[Suggestions Feed Post](https://discord.com/channels/10/20/900)")
        );
        assert_eq!(embed.image, None);

        let mut denied = Suggestion::new(
            GuildId(10),
            43,
            UserId(5),
            None,
            None,
            mock_timestamp(2024, 2, 3, 4, 5, 6),
        );
        denied.deny().unwrap();
        let reason = ReasonField {
            header: "Reason Given".to_string(),
            text: "Duplicate".to_string(),
        };
        let embed = dm_card(
            &ctx,
            &denied,
            &DmCard {
                title_key: "denied-dm-title",
                reason: Some(reason),
                ..card
            },
        );
        assert_eq!(embed.description.as_deref(), Some("[No Suggestion Content]"));
        assert_eq!(embed.fields[0].value, "Duplicate");
    }

    #[test]
    fn test_review_card() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let submitter = UserIdentity::new(UserId(5), "Ana#0001", None);

        let embed = review_card(&ctx, &approved(), &submitter, 0x123456, Some("Typo fixed"));
        assert_eq!(
            embed.title.as_deref(),
            Some("Suggestion Awaiting Review (#42)")
        );
        assert_eq!(embed.author.unwrap().name, "Ana#0001 (ID: 5)");
        assert_eq!(embed.fields[0].name, "Changes");
        assert_eq!(embed.fields[1].name, "With Attachment");
        assert_eq!(embed.image.as_deref(), Some("https://cdn.example/image.png"));
        assert_eq!(embed.color, 0x123456);
    }

    #[test]
    fn test_log_entry() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let actor = UserIdentity::new(UserId(8), "Mod#0008", None);
        let now = mock_timestamp(2024, 9, 9, 9, 9, 9);

        let embed = log_entry(&ctx, &approved(), &actor, "approved-log", 0x00ff00, now);
        assert_eq!(embed.author.unwrap().name, "Mod#0008 approved #42");
        assert_eq!(
            embed.footer.as_deref(),
            Some("Suggestion ID: 42 | User ID: 8")
        );
        assert_eq!(embed.description, None);
        assert_eq!(embed.timestamp, Some(now));
    }

    #[test]
    fn test_field_limits_are_enforced() {
        let mut embed = EmbedDocument::new(0);
        for i in 0..30 {
            embed = embed.field(format!("f{i}"), "x".repeat(2000), false);
        }
        assert_eq!(embed.fields.len(), MAX_FIELDS);
        assert_eq!(embed.fields[0].value.chars().count(), MAX_FIELD_VALUE_LENGTH);
    }
}
