//! Reference validation for server configs.
//!
//! [`validate`] checks every stored role and channel id against a
//! [`GuildSnapshot`]. Ids that no longer resolve are dropped from the
//! returned config and reported; the caller decides whether to persist the
//! cleaned record (see [`Validation::changed`]).

use crate::config::{Mode, RoleSet, ServerConfig};
use crate::snapshot::GuildSnapshot;
use std::fmt;
use suggester_common::ChannelId;
use tracing::debug;

/// A configurable role or channel item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigItem {
    AdminRoles,
    StaffRoles,
    AllowedRoles,
    BlockedRoles,
    ApprovedRole,
    PingRole,
    SuggestionsChannel,
    ReviewChannel,
    DeniedChannel,
    LogChannel,
    ArchiveChannel,
    CommandsChannel,
}

impl ConfigItem {
    pub const ROLES: [Self; 6] = [
        Self::AdminRoles,
        Self::StaffRoles,
        Self::AllowedRoles,
        Self::BlockedRoles,
        Self::ApprovedRole,
        Self::PingRole,
    ];

    pub const CHANNELS: [Self; 6] = [
        Self::SuggestionsChannel,
        Self::ReviewChannel,
        Self::DeniedChannel,
        Self::LogChannel,
        Self::ArchiveChannel,
        Self::CommandsChannel,
    ];

    /// Whether the bot cannot work in this server while the item is unset.
    pub fn required(self, mode: Mode) -> bool {
        match self {
            Self::AdminRoles | Self::StaffRoles | Self::SuggestionsChannel => true,
            Self::ReviewChannel => mode == Mode::Review,
            _ => false,
        }
    }
}

impl fmt::Display for ConfigItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AdminRoles => "admin roles",
            Self::StaffRoles => "staff roles",
            Self::AllowedRoles => "allowed roles",
            Self::BlockedRoles => "blocked roles",
            Self::ApprovedRole => "approved role",
            Self::PingRole => "ping role",
            Self::SuggestionsChannel => "suggestions channel",
            Self::ReviewChannel => "review channel",
            Self::DeniedChannel => "denied channel",
            Self::LogChannel => "log channel",
            Self::ArchiveChannel => "archive channel",
            Self::CommandsChannel => "commands channel",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// Stored ids that did not resolve and were removed.
    Stale { removed: usize },
    /// Nothing usable is configured.
    NotConfigured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigIssue {
    pub item: ConfigItem,
    pub kind: IssueKind,
    /// Set only on `NotConfigured` issues of required items.
    pub fatal: bool,
}

/// Result of [`validate`].
#[derive(Debug, Clone)]
pub struct Validation {
    /// The config with every stale reference removed.
    pub config: ServerConfig,
    pub issues: Vec<ConfigIssue>,
}

impl Validation {
    /// Whether any stale reference was removed.
    pub fn changed(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| matches!(issue.kind, IssueKind::Stale { .. }))
    }

    pub fn has_fatal(&self) -> bool {
        self.issues.iter().any(|issue| issue.fatal)
    }

    pub fn fatal_count(&self) -> usize {
        self.issues.iter().filter(|issue| issue.fatal).count()
    }

    pub fn is_configured(&self, item: ConfigItem) -> bool {
        !self
            .issues
            .iter()
            .any(|issue| issue.item == item && issue.kind == IssueKind::NotConfigured)
    }

    /// Whether `item` is unset and required.
    pub fn is_fatal(&self, item: ConfigItem) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.item == item && issue.fatal)
    }
}

/// Drops unresolvable references from `config` and reports every item that
/// is stale or unset.
///
/// Running this again on the returned config yields no `Stale` issues.
pub fn validate(config: &ServerConfig, guild: &GuildSnapshot) -> Validation {
    let mut cleaned = config.clone();
    let mut issues = Vec::new();
    let mode = cleaned.mode;

    let mut report = |item: ConfigItem, removed: usize, configured: bool| {
        if removed > 0 {
            debug!(guild = %guild.id, %item, removed, "Removing stale references");
            issues.push(ConfigIssue {
                item,
                kind: IssueKind::Stale { removed },
                fatal: false,
            });
        }
        if !configured {
            issues.push(ConfigIssue {
                item,
                kind: IssueKind::NotConfigured,
                fatal: item.required(mode),
            });
        }
    };

    let roles = &mut cleaned.roles;
    for (item, set) in [
        (ConfigItem::AdminRoles, &mut roles.admin),
        (ConfigItem::StaffRoles, &mut roles.staff),
        (ConfigItem::AllowedRoles, &mut roles.allowed),
        (ConfigItem::BlockedRoles, &mut roles.blocked),
    ] {
        let removed = clean_role_set(set, guild);
        report(item, removed, !set.is_empty());
    }

    for (item, slot) in [
        (ConfigItem::ApprovedRole, &mut roles.approved_role),
        (ConfigItem::PingRole, &mut roles.ping_role),
    ] {
        let removed = usize::from(slot.take_if(|role| guild.role(*role).is_none()).is_some());
        report(item, removed, slot.is_some());
    }

    let channels = &mut cleaned.channels;
    for (item, slot) in [
        (ConfigItem::SuggestionsChannel, &mut channels.suggestions),
        (ConfigItem::ReviewChannel, &mut channels.staff),
        (ConfigItem::DeniedChannel, &mut channels.denied),
        (ConfigItem::LogChannel, &mut channels.log),
        (ConfigItem::ArchiveChannel, &mut channels.archive),
        (ConfigItem::CommandsChannel, &mut channels.commands),
    ] {
        let removed = usize::from(clean_channel(slot, guild));
        report(item, removed, slot.is_some());
    }

    Validation {
        config: cleaned,
        issues,
    }
}

fn clean_role_set(set: &mut RoleSet, guild: &GuildSnapshot) -> usize {
    set.retain_resolvable(|role| guild.role(role).is_some()).len()
}

fn clean_channel(slot: &mut Option<ChannelId>, guild: &GuildSnapshot) -> bool {
    slot.take_if(|channel| guild.text_channel(*channel).is_none())
        .is_some()
}
