//! The `config` command.

pub mod execute;
pub mod parse;

use crate::context::{CommandError, Context};
use crate::convert;
use crate::permissions::{caller_level, require_server_admin};
use crate::reply::{self, Reply};
use execute::{execute, ConfigEnv, Executed, Outcome};
use poise::serenity_prelude as serenity;
use std::time::Instant;
use suggester_common::GuildId;
use suggester_config::ControlEmojis;
use suggester_core::store::{config_or_default, StoreResult};
use suggester_core::{validate, ConfigStore, IssueKind, Validation};
use tracing::{debug, info};

/// View or change this server's configuration.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    aliases("serverconfig", "cfg", "configure"),
    check = "require_server_admin",
    user_cooldown = 5,
    required_bot_permissions = "VIEW_CHANNEL | SEND_MESSAGES | EMBED_LINKS | USE_EXTERNAL_EMOJIS",
    category = "Configuration"
)]
pub async fn config(
    ctx: Context<'_>,
    #[description = "Setting and value, e.g. `prefix !`"]
    #[rest]
    args: Option<String>,
) -> Result<(), CommandError> {
    let start_time = Instant::now();
    let data = ctx.data();
    let Some(invoked_in) = ctx.guild_id() else {
        return Ok(());
    };

    let level = caller_level(ctx).await?;
    let raw = args.unwrap_or_default();
    let (guild_id, rest) = match parse::split_target(&raw) {
        (Some(target), rest) if level.is_privileged() && is_cached(ctx.cache(), target) => {
            (target, rest)
        }
        _ => (convert::guild_id(invoked_in), raw.as_str()),
    };

    let Some(guild) = convert::guild_snapshot(ctx.cache(), guild_id) else {
        let locale = data.default_locale();
        reply::send(ctx, &Reply::Error(data.catalog.text(locale, "error"))).await?;
        return Ok(());
    };

    let server = config_or_default(data.store.as_ref(), guild_id, data.default_prefix()).await?;
    let validation = validate(&server, &guild);
    let locale = data.locale_for(&server);
    let env = ConfigEnv {
        render: data.render_context(&locale),
        controls: data.controls(),
        guild: &guild,
        privileged: level.is_privileged(),
    };
    let command = parse::parse(rest);
    debug!("Config command in guild {}: {:?}", guild_id, command);

    let mut executed = execute(&env, data.store.as_ref(), &validation, &command, false).await?;
    if let Outcome::Confirm { prompt } = &executed.outcome {
        executed = if confirm(ctx, data.controls(), prompt).await? {
            execute(&env, data.store.as_ref(), &validation, &command, true).await?
        } else {
            Executed {
                outcome: Outcome::Reply(Reply::Info(data.catalog.text(&locale, "cancelled"))),
                config: validation.config.clone(),
                dirty: false,
            }
        };
    }

    persist(data.store.as_ref(), guild_id, &validation, &executed).await?;

    if let Outcome::Reply(answer) = &executed.outcome {
        reply::send(ctx, answer).await?;
    }

    debug!(
        "Config command for guild {} finished in {:?}",
        guild_id,
        start_time.elapsed()
    );
    Ok(())
}

/// Writes the config back when the command changed it or validation healed it.
/// Returns whether a write happened.
pub async fn persist<S: ConfigStore + ?Sized>(
    store: &S,
    guild_id: GuildId,
    validation: &Validation,
    executed: &Executed,
) -> StoreResult<bool> {
    if !executed.dirty && !validation.changed() {
        return Ok(false);
    }

    store.write_config(guild_id, &executed.config).await?;
    info!(
        "Saved configuration for guild {} ({} stale references dropped)",
        guild_id,
        validation
            .issues
            .iter()
            .filter(|issue| matches!(issue.kind, IssueKind::Stale { .. }))
            .count()
    );
    Ok(true)
}

fn is_cached(cache: &serenity::Cache, guild: GuildId) -> bool {
    convert::to_serenity_guild(guild).is_some_and(|id| cache.guild(id).is_some())
}

fn button(
    id: String,
    control: &str,
    label: &str,
    style: serenity::ButtonStyle,
) -> serenity::CreateButton {
    let button = serenity::CreateButton::new(id).style(style);
    match serenity::ReactionType::try_from(control) {
        Ok(emoji) => button.emoji(emoji),
        Err(_) => button.label(label),
    }
}

/// Asks the invoking user to accept or cancel. Times out as a cancel.
async fn confirm(
    ctx: Context<'_>,
    controls: &ControlEmojis,
    prompt: &str,
) -> Result<bool, CommandError> {
    let confirm_id = format!("{}confirm", ctx.id());
    let cancel_id = format!("{}cancel", ctx.id());
    let buttons = vec![
        button(confirm_id.clone(), &controls.check, "Confirm", serenity::ButtonStyle::Success),
        button(cancel_id, &controls.x, "Cancel", serenity::ButtonStyle::Danger),
    ];

    let handle = ctx
        .send(
            poise::CreateReply::default()
                .content(prompt)
                .components(vec![serenity::CreateActionRow::Buttons(buttons)]),
        )
        .await?;

    let prefix = ctx.id().to_string();
    let timeout = ctx.data().config.discord.confirm_timeout();
    let press = serenity::ComponentInteractionCollector::new(ctx)
        .author_id(ctx.author().id)
        .channel_id(ctx.channel_id())
        .timeout(timeout)
        .filter(move |press| press.data.custom_id.starts_with(&prefix))
        .await;

    let accepted = match press {
        Some(press) => {
            press
                .create_response(
                    ctx.serenity_context(),
                    serenity::CreateInteractionResponse::Acknowledge,
                )
                .await?;
            press.data.custom_id == confirm_id
        }
        None => {
            debug!("Confirmation for {} timed out", ctx.author().id);
            false
        }
    };

    handle
        .edit(
            ctx,
            poise::CreateReply::default()
                .content(prompt)
                .components(Vec::new()),
        )
        .await?;
    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use suggester_common::ChannelId;
    use suggester_core::snapshot::fixtures::{self, FEED_CHANNEL, GUILD};
    use suggester_core::{MemoryStore, ServerConfig};

    fn executed(config: ServerConfig, dirty: bool) -> Executed {
        Executed {
            outcome: Outcome::Reply(Reply::Info(String::new())),
            config,
            dirty,
        }
    }

    #[tokio::test]
    async fn test_clean_read_is_not_written() {
        let store = MemoryStore::new();
        let validation = validate(&ServerConfig::default(), &fixtures::guild());

        let wrote = persist(&store, GUILD, &validation, &executed(validation.config.clone(), false))
            .await
            .unwrap();
        assert!(!wrote);
        assert!(store.read_config(GUILD).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_command_change_is_written() {
        let store = MemoryStore::new();
        let validation = validate(&ServerConfig::default(), &fixtures::guild());
        let mut changed = validation.config.clone();
        changed.prefix = "!".to_string();

        assert!(persist(&store, GUILD, &validation, &executed(changed, true)).await.unwrap());
        assert_eq!(store.read_config(GUILD).await.unwrap().unwrap().prefix, "!");
    }

    #[tokio::test]
    async fn test_healed_config_is_written_without_changes() {
        let store = MemoryStore::new();
        let mut server = ServerConfig::default();
        server.channels.suggestions = Some(FEED_CHANNEL);
        server.channels.log = Some(ChannelId(777));
        let validation = validate(&server, &fixtures::guild());
        assert!(validation.changed());

        assert!(
            persist(&store, GUILD, &validation, &executed(validation.config.clone(), false))
                .await
                .unwrap()
        );
        let stored = store.read_config(GUILD).await.unwrap().unwrap();
        assert_eq!(stored.channels.log, None);
        assert_eq!(stored.channels.suggestions, Some(FEED_CHANNEL));
    }
}
