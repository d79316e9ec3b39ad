//! Resolving stored user references to display identities.
//!
//! Suggestions and comments store their author as a loose reference: a bare
//! id or a mention. Resolution tries the cache, then a live fetch, and falls
//! back to a placeholder; it never fails.

use crate::suggestion::Suggestion;
use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use suggester_common::UserId;
use tracing::debug;

static USER_MENTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<@!?(\d+)>$").expect("Invalid user mention regex pattern"));

/// How a user is displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    /// `None` for the placeholder.
    pub id: Option<UserId>,
    /// `name#discriminator` or the bare username.
    pub tag: String,
    pub avatar_url: Option<String>,
}

impl UserIdentity {
    pub fn new(id: UserId, tag: impl Into<String>, avatar_url: Option<String>) -> Self {
        Self {
            id: Some(id),
            tag: tag.into(),
            avatar_url,
        }
    }

    /// Placeholder shown when the user cannot be found.
    pub fn unknown(label: impl Into<String>) -> Self {
        Self {
            id: None,
            tag: label.into(),
            avatar_url: None,
        }
    }

    pub const fn is_unknown(&self) -> bool {
        self.id.is_none()
    }
}

/// Failure to fetch a user.
#[derive(Debug, thiserror::Error)]
#[error("Failed to fetch user {id}: {reason}")]
pub struct FetchError {
    pub id: UserId,
    pub reason: String,
}

/// Source of user identities.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// A cached identity, without network access.
    fn cached(&self, id: UserId) -> Option<UserIdentity>;

    /// Fetches the user from the platform.
    async fn fetch(&self, id: UserId) -> Result<UserIdentity, FetchError>;
}

/// Extracts the user id from a bare id or a `<@id>`/`<@!id>` mention.
pub fn parse_user_reference(reference: &str) -> Option<UserId> {
    let reference = reference.trim();
    USER_MENTION_REGEX
        .captures(reference)
        .and_then(|caps| caps.get(1))
        .map_or(reference, |m| m.as_str())
        .parse()
        .ok()
}

/// Resolves a stored reference; the placeholder is returned for anything
/// missing, malformed, or unfetchable.
pub async fn resolve_author<D>(
    directory: &D,
    reference: Option<&str>,
    unknown: &UserIdentity,
) -> UserIdentity
where
    D: UserDirectory + ?Sized,
{
    let Some(id) = reference.and_then(parse_user_reference) else {
        return unknown.clone();
    };

    if let Some(identity) = directory.cached(id) {
        return identity;
    }

    match directory.fetch(id).await {
        Ok(identity) => identity,
        Err(e) => {
            debug!("{}", e);
            unknown.clone()
        }
    }
}

/// Identities for every author a suggestion's cards mention.
#[derive(Debug, Clone)]
pub struct AuthorTable {
    by_reference: HashMap<String, UserIdentity>,
    unknown: UserIdentity,
}

impl AuthorTable {
    /// A table holding only the placeholder.
    pub fn empty(unknown: UserIdentity) -> Self {
        Self {
            by_reference: HashMap::new(),
            unknown,
        }
    }

    /// Resolves the submitter and the authors of visible comments.
    pub async fn for_suggestion<D>(
        directory: &D,
        suggestion: &Suggestion,
        unknown: UserIdentity,
    ) -> Self
    where
        D: UserDirectory + ?Sized,
    {
        let mut table = Self::empty(unknown);
        let references = std::iter::once(suggestion.suggester.as_str())
            .chain(suggestion.visible_comments().map(|c| c.author.as_str()));

        for reference in references {
            if table.by_reference.contains_key(reference) {
                continue;
            }
            let identity = resolve_author(directory, Some(reference), &table.unknown).await;
            table.by_reference.insert(reference.to_string(), identity);
        }
        table
    }

    pub fn insert(&mut self, reference: impl Into<String>, identity: UserIdentity) {
        self.by_reference.insert(reference.into(), identity);
    }

    /// The identity for `reference`, or the placeholder.
    pub fn get(&self, reference: &str) -> &UserIdentity {
        self.by_reference.get(reference).unwrap_or(&self.unknown)
    }
}
