//! Permission levels for bot commands.
//!
//! Lower levels are more privileged. Bot administrators and global staff
//! come from the bot config; server admins and staff from the server's
//! role lists (or the Manage Server permission).

use crate::context::{CommandError, Context};
use crate::convert;
use crate::reply::{self, Reply};
use suggester_common::{RoleId, UserId};
use suggester_config::Config;
use suggester_core::store::config_or_default;
use suggester_core::ServerConfig;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PermissionLevel {
    BotAdmin,
    GlobalStaff,
    ServerAdmin,
    ServerStaff,
    AllUsers,
}

impl PermissionLevel {
    /// Numeric level as shown to users.
    pub const fn level(self) -> u8 {
        match self {
            Self::BotAdmin => 0,
            Self::GlobalStaff => 1,
            Self::ServerAdmin => 2,
            Self::ServerStaff => 3,
            Self::AllUsers => 10,
        }
    }

    /// Catalog key of the level's name.
    pub const fn message_key(self) -> &'static str {
        match self {
            Self::BotAdmin => "bot-admin-permission",
            Self::GlobalStaff => "global-staff-permission",
            Self::ServerAdmin => "server-admin-permission",
            Self::ServerStaff => "server-staff-permission",
            Self::AllUsers => "all-users-permission",
        }
    }

    pub fn satisfies(self, required: Self) -> bool {
        self <= required
    }

    /// Bot administrators and global staff.
    pub fn is_privileged(self) -> bool {
        self <= Self::GlobalStaff
    }
}

/// Level of a member given their roles and server permissions.
pub fn permission_level(
    bot: &Config,
    server: &ServerConfig,
    user: UserId,
    roles: &[RoleId],
    manages_server: bool,
) -> PermissionLevel {
    if bot.is_owner(user) {
        PermissionLevel::BotAdmin
    } else if bot.is_global_staff(user) {
        PermissionLevel::GlobalStaff
    } else if manages_server || roles.iter().any(|role| server.roles.admin.contains(*role)) {
        PermissionLevel::ServerAdmin
    } else if roles.iter().any(|role| server.roles.staff.contains(*role)) {
        PermissionLevel::ServerStaff
    } else {
        PermissionLevel::AllUsers
    }
}

/// Level of the invoking user in the invoking guild.
pub async fn caller_level(ctx: Context<'_>) -> Result<PermissionLevel, CommandError> {
    let data = ctx.data();
    let user = convert::user_id(ctx.author().id);

    let Some(guild_id) = ctx.guild_id() else {
        return Ok(permission_level(
            &data.config,
            &ServerConfig::default(),
            user,
            &[],
            false,
        ));
    };

    let server =
        config_or_default(data.store.as_ref(), convert::guild_id(guild_id), data.default_prefix())
            .await?;

    let (roles, manages_server) = match ctx.author_member().await {
        Some(member) => {
            let manages_server = ctx.guild().is_some_and(|guild| {
                let permissions = guild.member_permissions(&member);
                permissions.administrator() || permissions.manage_guild()
            });
            let roles: Vec<RoleId> = member.roles.iter().map(|id| convert::role_id(*id)).collect();
            (roles, manages_server)
        }
        None => (Vec::new(), false),
    };

    Ok(permission_level(
        &data.config,
        &server,
        user,
        &roles,
        manages_server,
    ))
}

/// Command check requiring the server admin level.
pub async fn require_server_admin(ctx: Context<'_>) -> Result<bool, CommandError> {
    let level = caller_level(ctx).await?;
    if level.satisfies(PermissionLevel::ServerAdmin) {
        return Ok(true);
    }

    debug!(
        "User {} (level {}) denied access to {}",
        ctx.author().id,
        level.level(),
        ctx.command().name
    );
    let data = ctx.data();
    let locale = data.default_locale().clone();
    let required = data
        .catalog
        .text(&locale, PermissionLevel::ServerAdmin.message_key());
    let message = data.catalog.format(
        &locale,
        "permission-error",
        &suggester_i18n::args!["level" => required],
    );
    reply::send(ctx, &Reply::Error(message)).await?;
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bot_config() -> Config {
        let mut config = Config::default();
        config.discord.owner_ids = vec![UserId(1)];
        config.discord.global_staff_ids = vec![UserId(2)];
        config
    }

    fn server() -> ServerConfig {
        let mut server = ServerConfig::default();
        server.roles.admin.insert(RoleId(10));
        server.roles.staff.insert(RoleId(20));
        server
    }

    #[test]
    fn test_levels() {
        let bot = bot_config();
        let server = server();

        assert_eq!(
            permission_level(&bot, &server, UserId(1), &[], false),
            PermissionLevel::BotAdmin
        );
        assert_eq!(
            permission_level(&bot, &server, UserId(2), &[], false),
            PermissionLevel::GlobalStaff
        );
        assert_eq!(
            permission_level(&bot, &server, UserId(3), &[RoleId(20), RoleId(10)], false),
            PermissionLevel::ServerAdmin
        );
        assert_eq!(
            permission_level(&bot, &server, UserId(3), &[], true),
            PermissionLevel::ServerAdmin
        );
        assert_eq!(
            permission_level(&bot, &server, UserId(3), &[RoleId(20)], false),
            PermissionLevel::ServerStaff
        );
        assert_eq!(
            permission_level(&bot, &server, UserId(3), &[RoleId(30)], false),
            PermissionLevel::AllUsers
        );
    }

    #[test]
    fn test_ordering() {
        assert!(PermissionLevel::BotAdmin.satisfies(PermissionLevel::ServerAdmin));
        assert!(!PermissionLevel::ServerStaff.satisfies(PermissionLevel::ServerAdmin));
        assert!(PermissionLevel::GlobalStaff.is_privileged());
        assert!(!PermissionLevel::ServerAdmin.is_privileged());
        assert_eq!(PermissionLevel::AllUsers.level(), 10);
    }
}
