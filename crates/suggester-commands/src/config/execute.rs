//! Applying a [`ConfigCommand`] to a server's configuration.
//!
//! The executor works on a guild snapshot and an already validated config,
//! so it never touches the platform. It returns the reply and the possibly
//! modified config; the caller persists it when [`Executed::dirty`] is set.

use super::parse::{
    is_disable_word, ChannelSlot, ConfigCommand, EmojiAction, ModeArg, RoleList, RoleListAction,
    Setting, SingleRole, Toggle,
};
use crate::reply::Reply;
use suggester_common::{escape_markdown, ChannelId, RoleId};
use suggester_config::{ControlEmojis, PaletteColor};
use suggester_core::emoji::resolve_emoji_input;
use suggester_core::render::RenderContext;
use suggester_core::store::{StoreResult, SuggestionStore};
use suggester_core::{
    ConfigItem, EmbedDocument, EmojiRef, GuildSnapshot, Mode, RoleSet, ServerConfig, Validation,
    VoteEmojis, VoteSlot,
};
use suggester_i18n::args;
use tracing::debug;

/// Longest accepted prefix, in characters.
pub const MAX_PREFIX_LENGTH: usize = 20;

/// Everything the executor reads besides the config.
#[derive(Debug, Clone, Copy)]
pub struct ConfigEnv<'a> {
    pub render: RenderContext<'a>,
    pub controls: &'a ControlEmojis,
    pub guild: &'a GuildSnapshot,
    /// Bot administrator or global staff.
    pub privileged: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Reply(Reply),
    /// The change needs an explicit confirmation; nothing was modified.
    Confirm { prompt: String },
}

#[derive(Debug, Clone)]
pub struct Executed {
    pub outcome: Outcome,
    pub config: ServerConfig,
    /// Whether `config` differs from the validated input.
    pub dirty: bool,
}

/// Runs `command` against the validated config.
///
/// `confirmed` is set when the user accepted a previous
/// [`Outcome::Confirm`] for the same command.
pub async fn execute<S>(
    env: &ConfigEnv<'_>,
    store: &S,
    validation: &Validation,
    command: &ConfigCommand,
    confirmed: bool,
) -> StoreResult<Executed>
where
    S: SuggestionStore + ?Sized,
{
    let mut run = Run {
        env,
        config: validation.config.clone(),
        dirty: false,
    };

    let outcome = match command {
        ConfigCommand::Help => Outcome::Reply(run.help()),
        ConfigCommand::List { flags } => Outcome::Reply(run.list(validation, *flags)),
        ConfigCommand::RoleList { list, action } => run.role_list(*list, action, confirmed),
        ConfigCommand::Role { role, setting } => Outcome::Reply(run.single_role(*role, setting)),
        ConfigCommand::Channel { slot, setting } => Outcome::Reply(run.channel(*slot, setting)),
        ConfigCommand::Prefix(input) => Outcome::Reply(run.prefix(input.as_deref())),
        ConfigCommand::Mode(arg) => Outcome::Reply(run.mode(store, *arg).await?),
        ConfigCommand::Emoji(action) => Outcome::Reply(run.emoji(action)),
        ConfigCommand::Notify(toggle) => Outcome::Reply(run.notify(*toggle)),
        ConfigCommand::Clean(toggle) => Outcome::Reply(run.clean(*toggle)),
        ConfigCommand::Unknown => Outcome::Reply(Reply::Error(run.text("cfg-no-params-error"))),
    };

    if run.dirty {
        debug!("Config command changed settings for guild {}", env.guild.id);
    }
    Ok(Executed {
        outcome,
        config: run.config,
        dirty: run.dirty,
    })
}

struct RoleListKeys {
    title: &'static str,
    already: &'static str,
    added: &'static str,
    missing: &'static str,
    removed: &'static str,
}

const fn role_list_keys(list: RoleList) -> RoleListKeys {
    match list {
        RoleList::Admin => RoleListKeys {
            title: "cfg-admin-roles-title",
            already: "cfg-already-admin-role-error",
            added: "cfg-admin-role-add-success",
            missing: "cfg-not-admin-role-error",
            removed: "cfg-admin-role-remove-success",
        },
        RoleList::Staff => RoleListKeys {
            title: "cfg-staff-roles-title",
            already: "cfg-already-staff-role-error",
            added: "cfg-staff-role-add-success",
            missing: "cfg-not-staff-role-error",
            removed: "cfg-staff-role-remove-success",
        },
        RoleList::Allowed => RoleListKeys {
            title: "cfg-allowed-roles-title",
            already: "cfg-already-allowed-role-error",
            added: "cfg-allowed-role-add-success",
            missing: "cfg-not-allowed-role-error",
            removed: "cfg-allowed-role-remove-success",
        },
        RoleList::Blocked => RoleListKeys {
            title: "cfg-blocked-roles-title",
            already: "cfg-already-blocked-role-error",
            added: "cfg-blocked-role-add-success",
            missing: "cfg-not-blocked-role-error",
            removed: "cfg-blocked-role-remove-success",
        },
    }
}

struct ChannelKeys {
    title: &'static str,
    set: &'static str,
    /// `None` for channels that cannot be cleared.
    reset: Option<&'static str>,
}

const fn channel_keys(slot: ChannelSlot) -> ChannelKeys {
    match slot {
        ChannelSlot::Review => ChannelKeys {
            title: "cfg-review-channel-title",
            set: "cfg-review-set-success",
            reset: None,
        },
        ChannelSlot::Suggestions => ChannelKeys {
            title: "cfg-suggestion-channel-title",
            set: "cfg-suggestions-set-success",
            reset: None,
        },
        ChannelSlot::Denied => ChannelKeys {
            title: "cfg-denied-channel-title",
            set: "cfg-denied-set-success",
            reset: Some("cfg-denied-reset-success"),
        },
        ChannelSlot::Log => ChannelKeys {
            title: "cfg-log-channel-title",
            set: "cfg-log-set-success",
            reset: Some("cfg-log-reset-success"),
        },
        ChannelSlot::Commands => ChannelKeys {
            title: "cfg-commands-channel-title",
            set: "cfg-commands-set-success",
            reset: Some("cfg-commands-reset-success"),
        },
        ChannelSlot::Archive => ChannelKeys {
            title: "cfg-archive-channel-title",
            set: "cfg-archive-set-success",
            reset: Some("cfg-archive-reset-success"),
        },
    }
}

struct ToggleKeys {
    enabled: &'static str,
    disabled: &'static str,
    already_enabled: &'static str,
    already_disabled: &'static str,
}

const FEED_REACTION_KEYS: ToggleKeys = ToggleKeys {
    enabled: "cfg-feed-reactions-enabled",
    disabled: "cfg-feed-reactions-disabled",
    already_enabled: "cfg-feed-reactions-already-enabled",
    already_disabled: "cfg-feed-reactions-already-disabled",
};

const NOTIFY_KEYS: ToggleKeys = ToggleKeys {
    enabled: "guild-notifications-enabled",
    disabled: "guild-notifications-disabled",
    already_enabled: "guild-notifications-already-enabled",
    already_disabled: "guild-notifications-already-disabled",
};

const CLEAN_KEYS: ToggleKeys = ToggleKeys {
    enabled: "cfg-clean-commands-enabled",
    disabled: "cfg-clean-commands-disabled",
    already_enabled: "cfg-clean-commands-already-enabled",
    already_disabled: "cfg-clean-commands-already-disabled",
};

const fn slot_keys(slot: VoteSlot) -> (&'static str, &'static str, &'static str, &'static str) {
    // (title, disabled label, disable success, set success)
    match slot {
        VoteSlot::Up => (
            "cfg-emoji-upvote-title",
            "cfg-upvote-reaction-disabled",
            "cfg-emoji-up-disable-success",
            "cfg-emoji-up-set-success",
        ),
        VoteSlot::Mid => (
            "cfg-emoji-mid-title",
            "cfg-mid-reaction-disabled",
            "cfg-emoji-mid-disable-success",
            "cfg-emoji-mid-set-success",
        ),
        VoteSlot::Down => (
            "cfg-emoji-downvote-title",
            "cfg-downvote-reaction-disabled",
            "cfg-emoji-down-disable-success",
            "cfg-emoji-down-set-success",
        ),
    }
}

struct Run<'e, 'a> {
    env: &'e ConfigEnv<'a>,
    config: ServerConfig,
    dirty: bool,
}

impl Run<'_, '_> {
    fn text(&self, key: &str) -> String {
        self.env
            .render
            .catalog
            .text(self.env.render.locale, key)
    }

    fn format(&self, key: &str, args: &[(&str, String)]) -> String {
        self.env
            .render
            .catalog
            .format(self.env.render.locale, key, args)
    }

    fn bot_mention(&self) -> String {
        format!("<@{}>", self.env.guild.bot.user_id)
    }

    fn role_mention(&self, role: RoleId) -> String {
        if self.env.guild.is_everyone_role(role) {
            "@everyone".to_string()
        } else {
            format!("<@&{role}>")
        }
    }

    fn roles_value(&self, roles: &RoleSet) -> String {
        if roles.is_empty() {
            return self.text("none-configured");
        }
        roles
            .iter()
            .map(|role| self.role_mention(role))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn optional_role_value(&self, role: Option<RoleId>) -> String {
        role.map_or_else(|| self.text("none-configured"), |id| self.role_mention(id))
    }

    fn channel_value(&self, channel: Option<ChannelId>) -> String {
        channel.map_or_else(|| self.text("none-configured"), |id| format!("<#{id}>"))
    }

    fn on_off(&self, value: bool) -> String {
        self.text(if value { "enabled" } else { "disabled" })
    }

    /// Custom emojis deleted from the guild show as the slot's default.
    fn emoji_value(&self, emojis: &VoteEmojis, slot: VoteSlot, disabled_key: &str) -> String {
        match emojis.get(slot) {
            EmojiRef::Disabled => self.text(disabled_key),
            EmojiRef::Custom { id, .. } if !self.env.guild.emojis.iter().any(|e| e.id == *id) => {
                slot.default_emoji().to_string()
            }
            emoji => emoji.markup().unwrap_or_default(),
        }
    }

    fn help(&self) -> Reply {
        Reply::Info(self.format(
            "config-help",
            &args!["prefix" => escape_markdown(&self.config.prefix)],
        ))
    }

    fn role_list(&mut self, list: RoleList, action: &RoleListAction, confirmed: bool) -> Outcome {
        let keys = role_list_keys(list);
        let guild = self.env.guild;

        let reply = match action {
            RoleListAction::Show => {
                let roles = self.roles_of(list);
                let mut value = self.roles_value(roles);
                if list == RoleList::Allowed && roles.is_empty() {
                    value.push(' ');
                    value.push_str(&self.text("cfg-allowed-roles-append"));
                }
                Reply::Info(format!("**{}**\n{value}", self.text(keys.title)))
            }
            RoleListAction::Invalid => Reply::Error(self.text("cfg-invalid-role-param-error")),
            RoleListAction::Add(input) => {
                let Some(role) = guild.find_role(input) else {
                    return Outcome::Reply(Reply::Error(self.text("cfg-invalid-role-error")));
                };
                if self.roles_of(list).contains(role.id) {
                    return Outcome::Reply(Reply::Error(self.text(keys.already)));
                }
                let grants_access = matches!(list, RoleList::Admin | RoleList::Staff);
                if grants_access && guild.is_everyone_role(role.id) && !confirmed {
                    return Outcome::Confirm {
                        prompt: self.format(
                            "everyone-permission-warning",
                            &args!["check" => self.env.controls.check, "x" => self.env.controls.x],
                        ),
                    };
                }
                self.roles_of_mut(list).insert(role.id);
                self.dirty = true;
                Reply::Success(self.format(keys.added, &args!["role" => role.name]))
            }
            RoleListAction::Remove(input) => {
                let Some(role) = guild.find_role(input) else {
                    return Outcome::Reply(Reply::Error(self.text("cfg-invalid-role-error")));
                };
                if !self.roles_of_mut(list).remove(role.id) {
                    return Outcome::Reply(Reply::Error(self.text(keys.missing)));
                }
                self.dirty = true;
                Reply::Success(self.format(keys.removed, &args!["role" => role.name]))
            }
        };
        Outcome::Reply(reply)
    }

    const fn roles_of(&self, list: RoleList) -> &RoleSet {
        match list {
            RoleList::Admin => &self.config.roles.admin,
            RoleList::Staff => &self.config.roles.staff,
            RoleList::Allowed => &self.config.roles.allowed,
            RoleList::Blocked => &self.config.roles.blocked,
        }
    }

    fn roles_of_mut(&mut self, list: RoleList) -> &mut RoleSet {
        match list {
            RoleList::Admin => &mut self.config.roles.admin,
            RoleList::Staff => &mut self.config.roles.staff,
            RoleList::Allowed => &mut self.config.roles.allowed,
            RoleList::Blocked => &mut self.config.roles.blocked,
        }
    }

    fn single_role(&mut self, kind: SingleRole, setting: &Setting) -> Reply {
        let guild = self.env.guild;
        let (title, current) = match kind {
            SingleRole::Approved => ("cfg-approved-role-title", self.config.roles.approved_role),
            SingleRole::Ping => ("cfg-ping-role-title", self.config.roles.ping_role),
        };

        match setting {
            Setting::Show => Reply::Info(format!(
                "**{}** {}",
                self.text(title),
                self.optional_role_value(current)
            )),
            Setting::Reset => {
                let key = match kind {
                    SingleRole::Approved => {
                        self.config.roles.approved_role = None;
                        "cfg-reset-approved-role-success"
                    }
                    SingleRole::Ping => {
                        self.config.roles.ping_role = None;
                        "cfg-reset-ping-role-success"
                    }
                };
                self.dirty = true;
                Reply::Success(self.text(key))
            }
            Setting::Set(input) => match kind {
                SingleRole::Approved => {
                    if !guild.bot.manage_roles {
                        return Reply::Error(self.format(
                            "cfg-no-manage-roles-error",
                            &args!["bot" => self.bot_mention()],
                        ));
                    }
                    let Some(role) = guild.find_role(input) else {
                        return Reply::Error(self.text("cfg-invalid-role-error"));
                    };
                    if current == Some(role.id) {
                        return Reply::Error(self.text("cfg-already-approved-role-error"));
                    }
                    if !guild.bot_can_assign(role) {
                        return Reply::Error(self.format(
                            "cfg-unmanageable-role-error",
                            &args!["role" => role.name],
                        ));
                    }
                    self.config.roles.approved_role = Some(role.id);
                    self.dirty = true;
                    Reply::Success(self.format("cfg-approved-role-success", &args!["role" => role.name]))
                }
                SingleRole::Ping => {
                    if !guild.bot.mention_everyone {
                        return Reply::Error(self.format(
                            "cfg-no-mention-everyone-error",
                            &args!["bot" => self.bot_mention()],
                        ));
                    }
                    let Some(role) = guild.find_role(input) else {
                        return Reply::Error(self.text("cfg-invalid-role-error"));
                    };
                    if current == Some(role.id) {
                        return Reply::Error(self.text("cfg-already-ping-role-error"));
                    }
                    self.config.roles.ping_role = Some(role.id);
                    self.dirty = true;
                    Reply::Success(self.format("cfg-ping-role-success", &args!["role" => role.name]))
                }
            },
        }
    }

    fn channel_slot(&mut self, slot: ChannelSlot) -> &mut Option<ChannelId> {
        let channels = &mut self.config.channels;
        match slot {
            ChannelSlot::Review => &mut channels.staff,
            ChannelSlot::Suggestions => &mut channels.suggestions,
            ChannelSlot::Denied => &mut channels.denied,
            ChannelSlot::Log => &mut channels.log,
            ChannelSlot::Commands => &mut channels.commands,
            ChannelSlot::Archive => &mut channels.archive,
        }
    }

    fn channel_line(&self, slot: ChannelSlot, current: Option<ChannelId>) -> String {
        let mut value = self.channel_value(current);
        let append = match slot {
            ChannelSlot::Review if self.config.mode == Mode::Autoapprove => {
                Some("cfg-review-not-necessary-append")
            }
            ChannelSlot::Commands if current.is_none() => Some("cfg-commands-channel-append"),
            _ => None,
        };
        if let Some(key) = append {
            value.push(' ');
            value.push_str(&self.text(key));
        }
        value
    }

    fn channel(&mut self, slot: ChannelSlot, setting: &Setting) -> Reply {
        let keys = channel_keys(slot);
        match setting {
            Setting::Show => {
                let current = *self.channel_slot(slot);
                Reply::Info(format!(
                    "**{}** {}",
                    self.text(keys.title),
                    self.channel_line(slot, current)
                ))
            }
            Setting::Reset => {
                let Some(reset) = keys.reset else {
                    return Reply::Error(self.text("cfg-channel-reset-not-allowed-error"));
                };
                *self.channel_slot(slot) = None;
                self.dirty = true;
                Reply::Success(self.text(reset))
            }
            Setting::Set(input) => {
                let Some(channel) = self.env.guild.find_text_channel(input) else {
                    return Reply::Error(self.text("cfg-invalid-channel-error"));
                };
                let id = channel.id;
                *self.channel_slot(slot) = Some(id);
                self.dirty = true;
                Reply::Success(self.format(keys.set, &args!["channel" => format!("<#{id}>")]))
            }
        }
    }

    fn prefix(&mut self, input: Option<&str>) -> Reply {
        let Some(input) = input else {
            return Reply::Info(format!(
                "**{}** {}",
                self.text("cfg-prefix-title"),
                escape_markdown(&self.config.prefix)
            ));
        };

        if input.chars().count() > MAX_PREFIX_LENGTH {
            return Reply::Error(self.text("cfg-prefix-too-long-error"));
        }
        let prefix = input.to_lowercase();
        let reserved = [
            "suggester:".to_string(),
            format!("{}:", self.env.guild.bot.user_id),
        ];
        if reserved.contains(&prefix) {
            return Reply::Error(self.text("cfg-prefix-disallowed-error"));
        }

        self.config.prefix.clone_from(&prefix);
        self.dirty = true;
        Reply::Success(self.format(
            "cfg-prefix-set-success",
            &args!["prefix" => escape_markdown(&prefix)],
        ))
    }

    async fn mode<S>(&mut self, store: &S, arg: Option<ModeArg>) -> StoreResult<Reply>
    where
        S: SuggestionStore + ?Sized,
    {
        let reply = match arg {
            None => {
                let key = match self.config.mode {
                    Mode::Review => "cfg-mode-review",
                    Mode::Autoapprove => "cfg-mode-autoapprove",
                };
                Reply::Info(format!("**{}** {}", self.text("cfg-mode-title"), self.text(key)))
            }
            Some(ModeArg::Review) => {
                self.config.mode = Mode::Review;
                self.dirty = true;
                Reply::Success(self.text("cfg-mode-review-set-success"))
            }
            Some(ModeArg::Autoapprove) => {
                if store.has_awaiting_review(self.env.guild.id).await? {
                    Reply::Error(self.text("cfg-suggestions-awaiting-review-error"))
                } else {
                    self.config.mode = Mode::Autoapprove;
                    self.dirty = true;
                    Reply::Success(self.text("cfg-mode-autoapprove-set-success"))
                }
            }
            Some(ModeArg::Invalid) => Reply::Error(self.text("cfg-mode-invalid-error")),
        };
        Ok(reply)
    }

    fn emoji_summary(&self) -> EmbedDocument {
        let palette = self.env.render.palette;
        let color = if self.config.react {
            PaletteColor::Default
        } else {
            PaletteColor::Orange
        };

        let mut embed = EmbedDocument::new(palette.get(color))
            .title(self.text("cfg-reaction-emojis-title"))
            .description(self.text(if self.config.react {
                "cfg-feed-reactions-enabled"
            } else {
                "cfg-feed-reactions-disabled"
            }));
        for slot in VoteSlot::ALL {
            let (title, disabled, _, _) = slot_keys(slot);
            embed = embed.field(
                self.text(title),
                self.emoji_value(&self.config.emojis, slot, disabled),
                true,
            );
        }
        embed
    }

    fn emoji(&mut self, action: &EmojiAction) -> Reply {
        match action {
            EmojiAction::Show => Reply::Embed(Box::new(self.emoji_summary())),
            EmojiAction::Invalid => Reply::Error(self.text("cfg-emoji-invalid-setting-error")),
            EmojiAction::Feed(toggle) => {
                let mut react = self.config.react;
                let reply = self.apply_toggle(&mut react, *toggle, &FEED_REACTION_KEYS);
                self.config.react = react;
                reply
            }
            EmojiAction::Set { input: None, .. } => Reply::Error(self.text("cfg-no-emoji-error")),
            EmojiAction::Set {
                slot,
                input: Some(input),
            } => {
                let (_, _, disable_success, set_success) = slot_keys(*slot);
                let current = self.config.emojis.get(*slot);

                if is_disable_word(input) {
                    if current.is_disabled() {
                        return Reply::Error(self.text("cfg-emoji-disabled-error"));
                    }
                    self.config.emojis.set(*slot, EmojiRef::Disabled);
                    self.dirty = true;
                    return Reply::Success(self.text(disable_success));
                }

                let Some(emoji) = resolve_emoji_input(input, &self.env.guild.emojis) else {
                    return Reply::Error(self.text("cfg-emoji-not-found-error"));
                };
                if emoji == *current {
                    return Reply::Error(self.text("cfg-emoji-already-set-error"));
                }
                let markup = emoji.markup().unwrap_or_default();
                self.config.emojis.set(*slot, emoji);
                self.dirty = true;
                Reply::Success(self.format(set_success, &args!["emote" => markup]))
            }
        }
    }

    fn apply_toggle(&mut self, value: &mut bool, toggle: Toggle, keys: &ToggleKeys) -> Reply {
        let target = match toggle {
            Toggle::On => true,
            Toggle::Off => false,
            Toggle::Flip => !*value,
            Toggle::Invalid => return Reply::Error(self.text("on-off-toggle-error")),
        };
        if target == *value {
            let key = if target {
                keys.already_enabled
            } else {
                keys.already_disabled
            };
            return Reply::Error(self.text(key));
        }
        *value = target;
        self.dirty = true;
        Reply::Success(self.text(if target { keys.enabled } else { keys.disabled }))
    }

    fn notify(&mut self, toggle: Option<Toggle>) -> Reply {
        let Some(toggle) = toggle else {
            return Reply::Info(format!(
                "**{}** {}",
                self.text("cfg-notifications-title"),
                self.on_off(self.config.notify)
            ));
        };
        let mut notify = self.config.notify;
        let reply = self.apply_toggle(&mut notify, toggle, &NOTIFY_KEYS);
        self.config.notify = notify;
        reply
    }

    fn clean(&mut self, toggle: Option<Toggle>) -> Reply {
        let current = self.config.clean_suggestion_command;
        let Some(toggle) = toggle else {
            return Reply::Info(format!(
                "**{}** {}",
                self.text("cfg-clean-commands-title"),
                self.on_off(current)
            ));
        };

        let enabling = match toggle {
            Toggle::On => true,
            Toggle::Flip => !current,
            Toggle::Off | Toggle::Invalid => false,
        };
        if enabling && !current && !self.env.guild.bot.manage_messages {
            return Reply::Error(self.text("cfg-clean-commands-no-manage-messages"));
        }

        let mut clean = current;
        let reply = self.apply_toggle(&mut clean, toggle, &CLEAN_KEYS);
        self.config.clean_suggestion_command = clean;
        reply
    }

    fn marked(&self, validation: &Validation, item: ConfigItem, line: String) -> String {
        if validation.is_fatal(item) {
            format!("{} {line}", self.env.controls.x)
        } else {
            line
        }
    }

    fn list(&self, validation: &Validation, flags: bool) -> Reply {
        let env = self.env;
        let config = &self.config;
        let palette = env.render.palette;
        let color = if validation.has_fatal() {
            PaletteColor::Red
        } else {
            PaletteColor::Green
        };

        let line = |title: &str, value: String| format!("**{}** {value}", self.text(title));

        let mut allowed = self.roles_value(&config.roles.allowed);
        if config.roles.allowed.is_empty() {
            allowed.push(' ');
            allowed.push_str(&self.text("cfg-allowed-roles-append"));
        }

        let roles = [
            self.marked(
                validation,
                ConfigItem::AdminRoles,
                line("cfg-admin-roles-title", self.roles_value(&config.roles.admin)),
            ),
            self.marked(
                validation,
                ConfigItem::StaffRoles,
                line("cfg-staff-roles-title", self.roles_value(&config.roles.staff)),
            ),
            line("cfg-allowed-roles-title", allowed),
            line("cfg-blocked-roles-title", self.roles_value(&config.roles.blocked)),
            line(
                "cfg-approved-role-title",
                self.optional_role_value(config.roles.approved_role),
            ),
            line("cfg-ping-role-title", self.optional_role_value(config.roles.ping_role)),
        ]
        .join("\n");

        let channels = [
            (ChannelSlot::Suggestions, ConfigItem::SuggestionsChannel, config.channels.suggestions),
            (ChannelSlot::Review, ConfigItem::ReviewChannel, config.channels.staff),
            (ChannelSlot::Denied, ConfigItem::DeniedChannel, config.channels.denied),
            (ChannelSlot::Log, ConfigItem::LogChannel, config.channels.log),
            (ChannelSlot::Archive, ConfigItem::ArchiveChannel, config.channels.archive),
            (ChannelSlot::Commands, ConfigItem::CommandsChannel, config.channels.commands),
        ]
        .into_iter()
        .map(|(slot, item, current)| {
            let title = channel_keys(slot).title;
            self.marked(validation, item, line(title, self.channel_line(slot, current)))
        })
        .collect::<Vec<_>>()
        .join("\n");

        let emojis = VoteSlot::ALL
            .into_iter()
            .map(|slot| {
                let (_, disabled, _, _) = slot_keys(slot);
                self.emoji_value(&config.emojis, slot, disabled)
            })
            .collect::<Vec<_>>()
            .join(", ");
        let mode_key = match config.mode {
            Mode::Review => "cfg-mode-review",
            Mode::Autoapprove => "cfg-mode-autoapprove",
        };
        let other = [
            line("cfg-prefix-title", escape_markdown(&config.prefix)),
            line("cfg-mode-title", self.text(mode_key)),
            line("cfg-reaction-emojis-title", emojis),
            line("cfg-notifications-title", self.on_off(config.notify)),
            line("cfg-clean-commands-title", self.on_off(config.clean_suggestion_command)),
        ]
        .join("\n");

        let status = self.text(if validation.has_fatal() {
            "cfg-status-bad"
        } else {
            "cfg-status-good"
        });

        let mut embed = EmbedDocument::new(palette.get(color))
            .title(self.format(
                "server-configuration-title",
                &args!["server" => env.guild.name],
            ))
            .field(self.text("role-configuration-title"), roles, false)
            .field(self.text("channel-configuration-title"), channels, false)
            .field(self.text("other-configuration-title"), other, false)
            .field(self.text("cfg-status-title"), status, false);
        embed.thumbnail.clone_from(&env.guild.icon_url);

        if flags && env.privileged {
            let permissions = if env.guild.bot.permission_names.is_empty() {
                self.text("none")
            } else {
                env.guild.bot.permission_names.join(", ")
            };
            let server_flags = if config.flags.is_empty() {
                self.text("none")
            } else {
                config.flags.join(", ")
            };
            embed = embed
                .field(self.text("cfg-permissions-title"), permissions, false)
                .field(self.text("cfg-flags-title"), server_flags, false);
        }

        Reply::Embed(Box::new(embed))
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse::parse;
    use super::*;
    use suggester_common::test_utils::mock_timestamp;
    use suggester_common::{EmojiId, UserId};
    use suggester_config::Palette;
    use suggester_core::snapshot::fixtures::{self, ADMIN_ROLE, FEED_CHANNEL, GUILD, REVIEW_CHANNEL};
    use suggester_core::store::SuggestionStore;
    use suggester_core::{validate, CustomEmoji, MemoryStore, Suggestion};
    use suggester_i18n::{Catalog, Locale};

    struct Harness {
        catalog: Catalog,
        locale: Locale,
        palette: Palette,
        controls: ControlEmojis,
        guild: GuildSnapshot,
        store: MemoryStore,
    }

    impl Harness {
        fn new() -> Self {
            let mut guild = fixtures::guild();
            guild.emojis.push(CustomEmoji {
                id: EmojiId(300),
                name: "yes".to_string(),
                animated: false,
            });
            Self {
                catalog: Catalog::bundled(&Locale::default()).unwrap(),
                locale: Locale::default(),
                palette: Palette::default(),
                controls: ControlEmojis::default(),
                guild,
                store: MemoryStore::new(),
            }
        }

        fn env(&self, privileged: bool) -> ConfigEnv<'_> {
            ConfigEnv {
                render: RenderContext::new(&self.catalog, &self.locale, &self.palette),
                controls: &self.controls,
                guild: &self.guild,
                privileged,
            }
        }

        async fn run_as(&self, config: &ServerConfig, args: &str, confirmed: bool, privileged: bool) -> Executed {
            let validation = validate(config, &self.guild);
            execute(&self.env(privileged), &self.store, &validation, &parse(args), confirmed)
                .await
                .unwrap()
        }

        async fn run(&self, config: &ServerConfig, args: &str) -> Executed {
            self.run_as(config, args, false, false).await
        }
    }

    fn reply(executed: &Executed) -> &Reply {
        match &executed.outcome {
            Outcome::Reply(reply) => reply,
            Outcome::Confirm { prompt } => panic!("unexpected confirmation: {prompt}"),
        }
    }

    fn configured() -> ServerConfig {
        let mut config = ServerConfig::default();
        config.roles.admin.insert(ADMIN_ROLE);
        config.roles.staff.insert(fixtures::STAFF_ROLE);
        config.channels.suggestions = Some(FEED_CHANNEL);
        config.channels.staff = Some(REVIEW_CHANNEL);
        config
    }

    #[tokio::test]
    async fn test_autoapprove_blocked_by_pending_review() {
        let harness = Harness::new();
        harness
            .store
            .put_suggestion(&Suggestion::new(
                GUILD,
                1,
                UserId(5),
                Some("Pending".to_string()),
                None,
                mock_timestamp(2024, 1, 1, 0, 0, 0),
            ))
            .await
            .unwrap();

        let executed = harness.run(&configured(), "mode autoapprove").await;
        assert_eq!(
            reply(&executed),
            &Reply::Error(
                "All suggestions awaiting review must be cleared before the autoapprove mode is set."
                    .to_string()
            )
        );
        assert!(!executed.dirty);
        assert_eq!(executed.config.mode, Mode::Review);

        let other_guild = Harness::new();
        let executed = other_guild.run(&configured(), "mode auto").await;
        assert!(executed.dirty);
        assert_eq!(executed.config.mode, Mode::Autoapprove);
    }

    #[tokio::test]
    async fn test_reserved_prefixes_rejected() {
        let harness = Harness::new();
        for prefix in ["suggester:", "SUGGESTER:", "99:"] {
            let executed = harness.run(&configured(), &format!("prefix {prefix}")).await;
            assert_eq!(
                reply(&executed),
                &Reply::Error("This prefix is not allowed.".to_string())
            );
            assert!(!executed.dirty);
        }

        let executed = harness.run(&configured(), "prefix 123456789012345678901").await;
        assert!(reply(&executed).is_error());

        let executed = harness.run(&configured(), "prefix SB!").await;
        assert_eq!(executed.config.prefix, "sb!");
        assert!(executed.dirty);
    }

    #[tokio::test]
    async fn test_prefix_markdown_is_escaped() {
        let harness = Harness::new();

        let set = harness.run(&configured(), "prefix `*").await;
        assert_eq!(
            reply(&set),
            &Reply::Success("Successfully set this server's prefix to **\\`\\***".to_string())
        );
        assert_eq!(set.config.prefix, "`*");

        let shown = harness.run(&set.config, "prefix").await;
        assert_eq!(reply(&shown), &Reply::Info("**Prefix:** \\`\\*".to_string()));
    }

    #[tokio::test]
    async fn test_deleted_custom_emoji_shows_default() {
        let mut harness = Harness::new();
        let custom = harness.run(&configured(), "emoji up yes").await;
        harness.guild.emojis.clear();

        let summary = harness.run(&custom.config, "emoji").await;
        let Reply::Embed(embed) = reply(&summary) else {
            panic!("expected embed");
        };
        assert_eq!(embed.fields[0].value, "👍");

        let listed = harness.run(&custom.config, "list").await;
        let Reply::Embed(embed) = reply(&listed) else {
            panic!("expected embed");
        };
        assert!(embed.fields.iter().all(|field| !field.value.contains("<:yes:300>")));
    }

    #[tokio::test]
    async fn test_everyone_admin_requires_confirmation() {
        let harness = Harness::new();
        let config = configured();

        let first = harness.run(&config, "admin add @everyone").await;
        assert!(matches!(first.outcome, Outcome::Confirm { .. }));
        assert!(!first.dirty);
        assert!(!first.config.roles.admin.contains(GUILD.everyone_role()));

        let accepted = harness.run_as(&config, "admin add @everyone", true, false).await;
        assert!(accepted.dirty);
        assert_eq!(
            accepted.config.roles.admin.iter().collect::<Vec<_>>(),
            vec![ADMIN_ROLE, GUILD.everyone_role()]
        );

        // Allowed roles grant no extra access, so no prompt
        let allowed = harness.run(&config, "allowed add everyone").await;
        assert!(matches!(allowed.outcome, Outcome::Reply(Reply::Success(_))));
    }

    #[tokio::test]
    async fn test_role_list_errors() {
        let harness = Harness::new();
        let config = configured();

        let duplicate = harness.run(&config, "admin add Admins").await;
        assert_eq!(
            reply(&duplicate),
            &Reply::Error("This role has already been added as an admin role!".to_string())
        );

        let missing = harness.run(&config, "staff remove Admins").await;
        assert!(reply(&missing).is_error());

        let unknown = harness.run(&config, "blocked add Nobody").await;
        assert!(reply(&unknown).is_error());

        let removed = harness.run(&config, "staff - staff").await;
        assert!(removed.dirty);
        assert!(removed.config.roles.staff.is_empty());
    }

    #[tokio::test]
    async fn test_approved_role_checks_bot_capabilities() {
        let mut harness = Harness::new();
        let config = configured();

        let managed = harness.run(&config, "approvedrole Suggester").await;
        assert!(reply(&managed).is_error());

        let ok = harness.run(&config, "approvedrole Staff").await;
        assert_eq!(ok.config.roles.approved_role, Some(fixtures::STAFF_ROLE));

        harness.guild.bot.manage_roles = false;
        let denied = harness.run(&config, "approverole Staff").await;
        assert_eq!(
            reply(&denied),
            &Reply::Error(
                "<@99> does not have the **Manage Roles** permission, which is needed to give members a role."
                    .to_string()
            )
        );

        harness.guild.bot.mention_everyone = false;
        let ping = harness.run(&config, "ping Staff").await;
        assert!(reply(&ping).is_error());
        assert!(!ping.dirty);
    }

    #[tokio::test]
    async fn test_channels() {
        let harness = Harness::new();
        let config = configured();

        let voice = harness.run(&config, "log General").await;
        assert!(reply(&voice).is_error());

        let set = harness.run(&config, "logs #staff-review").await;
        assert_eq!(set.config.channels.log, Some(REVIEW_CHANNEL));

        let required = harness.run(&config, "suggestions reset").await;
        assert_eq!(
            reply(&required),
            &Reply::Error("This channel is required and cannot be reset.".to_string())
        );

        let mut autoapprove = configured();
        autoapprove.mode = Mode::Autoapprove;
        let shown = harness.run(&autoapprove, "review").await;
        let Reply::Info(text) = reply(&shown) else {
            panic!("expected info reply");
        };
        assert!(text.ends_with("(Not necessary when the mode is set to autoapprove)"));
    }

    #[tokio::test]
    async fn test_emoji_settings() {
        let harness = Harness::new();
        let config = configured();

        let custom = harness.run(&config, "emoji up yes").await;
        assert_eq!(
            reply(&custom),
            &Reply::Success(
                "Successfully set the upvote emoji for this server to <:yes:300>".to_string()
            )
        );
        assert_eq!(
            custom.config.emojis.up,
            EmojiRef::Custom {
                name: "yes".to_string(),
                id: EmojiId(300),
                animated: false,
            }
        );

        let same = harness.run(&custom.config, "emoji upvote <:yes:300>").await;
        assert!(reply(&same).is_error());

        let disabled = harness.run(&config, "emoji mid off").await;
        assert!(disabled.config.emojis.mid.is_disabled());
        let again = harness.run(&disabled.config, "emoji mid none").await;
        assert_eq!(
            reply(&again),
            &Reply::Error("This emoji is already disabled.".to_string())
        );

        let missing = harness.run(&config, "emoji down notanemoji").await;
        assert!(reply(&missing).is_error());

        let feed = harness.run(&config, "emoji enable").await;
        assert_eq!(
            reply(&feed),
            &Reply::Error(
                "Automatic reactions on suggestion feed posts are already enabled!".to_string()
            )
        );

        let summary = harness.run(&disabled.config, "emojis").await;
        let Reply::Embed(embed) = reply(&summary) else {
            panic!("expected embed");
        };
        assert_eq!(embed.fields[1].value, "Shrug/No Opinion reaction disabled");
        assert_eq!(embed.color, harness.palette.default.0);
    }

    #[tokio::test]
    async fn test_toggles() {
        let mut harness = Harness::new();
        let config = configured();

        let flipped = harness.run(&config, "notify toggle").await;
        assert!(!flipped.config.notify);
        let already = harness.run(&flipped.config, "notifications off").await;
        assert!(reply(&already).is_error());

        let cleaned = harness.run(&config, "clean on").await;
        assert!(cleaned.config.clean_suggestion_command);

        harness.guild.bot.manage_messages = false;
        let refused = harness.run(&config, "clean toggle").await;
        assert_eq!(
            reply(&refused),
            &Reply::Error(
                "I need the **Manage Messages** permission to remove suggestion commands."
                    .to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_list_reports_fatal_items() {
        let harness = Harness::new();

        let healthy = harness.run(&configured(), "list").await;
        let Reply::Embed(embed) = reply(&healthy) else {
            panic!("expected embed");
        };
        assert_eq!(embed.color, harness.palette.green.0);
        assert_eq!(embed.fields.len(), 4);
        assert_eq!(embed.title.as_deref(), Some("Server Configuration for Test Server"));

        let empty = harness.run_as(&ServerConfig::default(), "list --flags", false, true).await;
        let Reply::Embed(embed) = reply(&empty) else {
            panic!("expected embed");
        };
        assert_eq!(embed.color, harness.palette.red.0);
        assert!(embed.fields[0].value.starts_with("❌ **Admin Roles:**"));
        assert_eq!(embed.fields[4].name, "Bot Permissions");
        assert_eq!(embed.fields[5].value, "None");

        let unprivileged = harness.run(&ServerConfig::default(), "list --flags").await;
        let Reply::Embed(embed) = reply(&unprivileged) else {
            panic!("expected embed");
        };
        assert_eq!(embed.fields.len(), 4);
    }

    #[tokio::test]
    async fn test_stale_references_are_dropped() {
        let harness = Harness::new();
        let mut config = configured();
        config.roles.admin.insert(RoleId(404));

        let executed = harness.run(&config, "admin").await;
        assert!(!executed.dirty);
        assert_eq!(
            executed.config.roles.admin.iter().collect::<Vec<_>>(),
            vec![ADMIN_ROLE]
        );
    }
}
