//! Suggestion records and their lifecycle.

use crate::emoji::VoteEmojis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use suggester_common::{GuildId, MessageId, UserId};
use thiserror::Error;

/// Review state of a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    AwaitingReview,
    Approved,
    Denied,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AwaitingReview => "awaiting_review",
            Self::Approved => "approved",
            Self::Denied => "denied",
        })
    }
}

/// Public status marker shown on an approved suggestion's feed card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStatus {
    #[default]
    Default,
    Implemented,
    Working,
    No,
}

/// A staff comment on a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// 1-based, unique within the suggestion.
    pub id: u64,
    /// User reference of the commenter.
    pub author: String,
    pub comment: String,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted: bool,
}

/// Errors for transitions a suggestion cannot make.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("suggestion is {0}, not awaiting review")]
    NotAwaitingReview(Status),

    #[error("suggestion is {0}, not approved")]
    NotApproved(Status),

    #[error("suggestion already has that status")]
    DisplayStatusUnchanged,

    #[error("comment {0} does not exist")]
    CommentNotFound(u64),

    #[error("comment {0} is already deleted")]
    CommentAlreadyDeleted(u64),
}

/// One submitted suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub guild_id: GuildId,
    pub suggestion_id: u64,
    /// User reference of the submitter (id or mention).
    pub suggester: String,
    #[serde(default)]
    pub suggestion: Option<String>,
    #[serde(default)]
    pub attachment: Option<String>,
    pub submitted: DateTime<Utc>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub display_status: DisplayStatus,
    /// Id of the feed message, set once the suggestion is posted.
    #[serde(default)]
    pub message_id: Option<MessageId>,
    /// Emoji set captured when the feed message was posted.
    #[serde(default)]
    pub emojis: VoteEmojis,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Suggestion {
    /// A new suggestion awaiting review.
    pub fn new(
        guild_id: GuildId,
        suggestion_id: u64,
        suggester: UserId,
        suggestion: Option<String>,
        attachment: Option<String>,
        submitted: DateTime<Utc>,
    ) -> Self {
        Self {
            guild_id,
            suggestion_id,
            suggester: suggester.to_string(),
            suggestion,
            attachment,
            submitted,
            status: Status::AwaitingReview,
            display_status: DisplayStatus::Default,
            message_id: None,
            emojis: VoteEmojis::default(),
            comments: Vec::new(),
        }
    }

    /// Marks the suggestion approved and records its feed post.
    pub fn approve(
        &mut self,
        message_id: MessageId,
        snapshot: VoteEmojis,
    ) -> Result<(), LifecycleError> {
        self.require_awaiting()?;
        self.status = Status::Approved;
        self.message_id = Some(message_id);
        self.emojis = snapshot;
        Ok(())
    }

    pub fn deny(&mut self) -> Result<(), LifecycleError> {
        self.require_awaiting()?;
        self.status = Status::Denied;
        Ok(())
    }

    pub fn set_display_status(&mut self, status: DisplayStatus) -> Result<(), LifecycleError> {
        if self.status != Status::Approved {
            return Err(LifecycleError::NotApproved(self.status));
        }
        if self.display_status == status {
            return Err(LifecycleError::DisplayStatusUnchanged);
        }
        self.display_status = status;
        Ok(())
    }

    /// Appends a comment and returns its id.
    pub fn add_comment(
        &mut self,
        author: UserId,
        text: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<u64, LifecycleError> {
        if self.status != Status::Approved {
            return Err(LifecycleError::NotApproved(self.status));
        }
        let id = self.comments.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        self.comments.push(Comment {
            id,
            author: author.to_string(),
            comment: text.into(),
            created: Some(now),
            deleted: false,
        });
        Ok(id)
    }

    /// Soft-deletes a comment; it stays stored but is no longer rendered.
    pub fn delete_comment(&mut self, id: u64) -> Result<(), LifecycleError> {
        let comment = self
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(LifecycleError::CommentNotFound(id))?;
        if comment.deleted {
            return Err(LifecycleError::CommentAlreadyDeleted(id));
        }
        comment.deleted = true;
        Ok(())
    }

    /// Comments that are still shown, in stored order.
    pub fn visible_comments(&self) -> impl Iterator<Item = &Comment> {
        self.comments.iter().filter(|c| !c.deleted)
    }

    pub const fn is_awaiting_review(&self) -> bool {
        matches!(self.status, Status::AwaitingReview)
    }

    fn require_awaiting(&self) -> Result<(), LifecycleError> {
        if self.is_awaiting_review() {
            Ok(())
        } else {
            Err(LifecycleError::NotAwaitingReview(self.status))
        }
    }
}
