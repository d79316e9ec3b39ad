//! User lookups through the serenity cache and HTTP client.

use crate::convert;
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use suggester_common::UserId;
use suggester_core::{FetchError, UserDirectory, UserIdentity};

/// [`UserDirectory`] backed by the gateway cache, falling back to the API.
#[derive(Clone)]
pub struct SerenityDirectory {
    cache: Arc<serenity::Cache>,
    http: Arc<serenity::Http>,
}

impl SerenityDirectory {
    pub fn new(ctx: &serenity::Context) -> Self {
        Self {
            cache: ctx.cache.clone(),
            http: ctx.http.clone(),
        }
    }
}

fn identity(user: &serenity::User) -> UserIdentity {
    UserIdentity::new(convert::user_id(user.id), user.tag(), Some(user.face()))
}

#[async_trait]
impl UserDirectory for SerenityDirectory {
    fn cached(&self, id: UserId) -> Option<UserIdentity> {
        let user = self.cache.user(convert::to_serenity_user(id)?)?;
        Some(identity(&user))
    }

    async fn fetch(&self, id: UserId) -> Result<UserIdentity, FetchError> {
        let Some(target) = convert::to_serenity_user(id) else {
            return Err(FetchError {
                id,
                reason: "zero is not a user id".to_string(),
            });
        };
        self.http
            .get_user(target)
            .await
            .map(|user| identity(&user))
            .map_err(|e| FetchError {
                id,
                reason: e.to_string(),
            })
    }
}
