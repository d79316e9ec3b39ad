//! Poise framework setup and command registration logic.

use crate::context::{CommandError, Data};
use crate::convert;
use crate::events::event_handler;
use crate::reply::{self, Reply};
use suggester_core::ConfigStore;
use tracing::{debug, error, warn};

/// Every command the bot registers.
pub fn commands() -> Vec<poise::Command<Data, CommandError>> {
    vec![crate::config::config()]
}

/// Creates a new Poise framework.
///
/// The caller supplies `setup`, which builds [`Data`] once the bot is
/// connected.
pub fn create_framework() -> poise::FrameworkBuilder<Data, CommandError> {
    poise::Framework::builder().options(poise::FrameworkOptions {
        commands: commands(),
        on_error: |error| Box::pin(on_error(error)),
        event_handler: |ctx, event, framework, data| {
            Box::pin(event_handler(ctx, event, framework, data))
        },
        prefix_options: poise::PrefixFrameworkOptions {
            dynamic_prefix: Some(|ctx| Box::pin(dynamic_prefix(ctx))),
            mention_as_prefix: true,
            ..Default::default()
        },
        ..Default::default()
    })
}

/// The guild's configured prefix, or the bot default.
async fn dynamic_prefix(
    ctx: poise::PartialContext<'_, Data, CommandError>,
) -> Result<Option<String>, CommandError> {
    let data = ctx.data;
    let Some(guild_id) = ctx.guild_id else {
        return Ok(Some(data.default_prefix().to_string()));
    };

    match data.store.read_config(convert::guild_id(guild_id)).await {
        Ok(Some(config)) => Ok(Some(config.prefix)),
        Ok(None) => Ok(Some(data.default_prefix().to_string())),
        Err(e) => {
            warn!("Failed to read prefix for guild {}: {}", guild_id, e);
            Ok(Some(data.default_prefix().to_string()))
        }
    }
}

/// Global error handler for the framework.
pub async fn on_error(error: poise::FrameworkError<'_, Data, CommandError>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command '{}': {:?}", ctx.command().name, error);
            let data = ctx.data();
            let message = data.catalog.text(data.default_locale(), "error");
            if let Err(e) = reply::send(ctx, &Reply::Error(message)).await {
                error!("Failed to report command error: {}", e);
            }
        }
        poise::FrameworkError::EventHandler { error, event, .. } => {
            error!(
                "Error in event handler for {:?}: {:?}",
                event.snake_case_name(),
                error
            );
        }
        poise::FrameworkError::GuildOnly { ctx, .. } => {
            let data = ctx.data();
            let message = data.catalog.text(data.default_locale(), "command-server-only");
            if let Err(e) = reply::send(ctx, &Reply::Error(message)).await {
                error!("Failed to send guild-only notice: {}", e);
            }
        }
        poise::FrameworkError::CommandCheckFailed {
            error: None, ctx, ..
        } => {
            debug!(
                "Check failed for '{}' run by {}",
                ctx.command().name,
                ctx.author().id
            );
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poise::serenity_prelude as serenity;

    #[test]
    fn test_config_command_registration() {
        let commands = commands();
        assert_eq!(commands.len(), 1);

        let config = &commands[0];
        assert_eq!(config.name, "config");
        assert!(config.guild_only);
        assert!(config.prefix_action.is_some());
        assert!(config.slash_action.is_some());
        for alias in ["serverconfig", "cfg", "configure"] {
            assert!(config.aliases.iter().any(|a| a == alias), "missing alias {alias}");
        }
        assert_eq!(config.category.as_deref(), Some("Configuration"));
    }

    #[test]
    fn test_config_command_limits() {
        let commands = commands();
        let config = &commands[0];

        let cooldowns = config.cooldown_config.read().unwrap();
        assert_eq!(cooldowns.user, Some(std::time::Duration::from_secs(5)));

        let required = serenity::Permissions::VIEW_CHANNEL
            | serenity::Permissions::SEND_MESSAGES
            | serenity::Permissions::EMBED_LINKS
            | serenity::Permissions::USE_EXTERNAL_EMOJIS;
        assert_eq!(config.required_bot_permissions, required);
    }
}
