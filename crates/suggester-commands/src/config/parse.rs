//! Parsing of `config` arguments into a [`ConfigCommand`].
//!
//! Parsing never fails: unrecognized input becomes a variant the executor
//! answers with the matching error message.

use suggester_common::GuildId;
use suggester_core::VoteSlot;

/// One of the four role lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleList {
    Admin,
    Staff,
    Allowed,
    Blocked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleListAction {
    Show,
    Add(String),
    Remove(String),
    Invalid,
}

/// Roles holding a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleRole {
    Approved,
    Ping,
}

/// Channel settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSlot {
    Review,
    Suggestions,
    Denied,
    Log,
    Commands,
    Archive,
}

/// Show, clear, or set an optional value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setting {
    Show,
    Reset,
    Set(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Review,
    Autoapprove,
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
    Flip,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmojiAction {
    Show,
    /// Change one vote emoji. `None` when no emoji followed the slot.
    Set {
        slot: VoteSlot,
        input: Option<String>,
    },
    /// Switch automatic feed reactions.
    Feed(Toggle),
    Invalid,
}

/// A parsed `config` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    Help,
    List { flags: bool },
    RoleList { list: RoleList, action: RoleListAction },
    Role { role: SingleRole, setting: Setting },
    Channel { slot: ChannelSlot, setting: Setting },
    Prefix(Option<String>),
    Mode(Option<ModeArg>),
    Emoji(EmojiAction),
    Notify(Option<Toggle>),
    Clean(Option<Toggle>),
    Unknown,
}

/// Words that clear an optional setting.
const RESET_WORDS: [&str; 2] = ["none", "reset"];

/// Words that disable a vote emoji.
const DISABLE_WORDS: [&str; 3] = ["none", "off", "disable"];

pub fn parse(input: &str) -> ConfigCommand {
    let mut words = input.split_whitespace();
    let Some(setting) = words.next() else {
        return ConfigCommand::Help;
    };
    let rest: Vec<&str> = words.collect();

    match setting.to_lowercase().as_str() {
        "admin" | "adminrole" => role_list(RoleList::Admin, &rest),
        "staff" | "staffrole" | "reviewrole" => role_list(RoleList::Staff, &rest),
        "allowed" | "allowedrole" | "suggestrole" => role_list(RoleList::Allowed, &rest),
        "blocked" | "blockedrole" | "blockedroles" | "blacklist" | "blacklistroles" => {
            role_list(RoleList::Blocked, &rest)
        }
        "approvedrole" | "approverole" => ConfigCommand::Role {
            role: SingleRole::Approved,
            setting: setting_of(&rest),
        },
        "pingrole" | "ping" => ConfigCommand::Role {
            role: SingleRole::Ping,
            setting: setting_of(&rest),
        },
        "review" | "reviewchannel" => channel(ChannelSlot::Review, &rest),
        "suggestions" | "suggestionschannel" => channel(ChannelSlot::Suggestions, &rest),
        "denied" | "deniedchannel" => channel(ChannelSlot::Denied, &rest),
        "log" | "logs" | "logchannel" => channel(ChannelSlot::Log, &rest),
        "commands" | "command" | "commandchannel" | "commandschannel" => {
            channel(ChannelSlot::Commands, &rest)
        }
        "archive" | "archivechannel" | "implementedchannel" | "implemented" => {
            channel(ChannelSlot::Archive, &rest)
        }
        "prefix" => ConfigCommand::Prefix(rest.first().map(ToString::to_string)),
        "mode" => ConfigCommand::Mode(rest.first().map(|word| mode_arg(word))),
        "emoji" | "emotes" | "emojis" | "emote" | "react" | "reactions" => {
            ConfigCommand::Emoji(emoji_action(&rest))
        }
        "notify" | "notifications" | "notification" | "notif" => {
            ConfigCommand::Notify(rest.first().map(|word| toggle(word)))
        }
        "clean" | "clear" | "cleancommands" | "cleancommand" => {
            ConfigCommand::Clean(rest.first().map(|word| toggle(word)))
        }
        "list" => ConfigCommand::List {
            flags: rest.last().is_some_and(|word| word.eq_ignore_ascii_case("--flags")),
        },
        _ => ConfigCommand::Unknown,
    }
}

/// Splits a leading guild id off the arguments.
///
/// Only numeric first words are returned; whether the caller may target
/// that guild is decided by the command.
pub fn split_target(input: &str) -> (Option<GuildId>, &str) {
    let trimmed = input.trim_start();
    let first = trimmed.split_whitespace().next().unwrap_or_default();
    if first.is_empty() || !first.bytes().all(|b| b.is_ascii_digit()) {
        return (None, input);
    }
    match first.parse() {
        Ok(guild) => (Some(guild), &trimmed[first.len()..]),
        Err(_) => (None, input),
    }
}

fn role_list(list: RoleList, rest: &[&str]) -> ConfigCommand {
    let action = match rest.split_first() {
        None => RoleListAction::Show,
        Some((verb, target)) => match verb.to_lowercase().as_str() {
            "add" | "+" => RoleListAction::Add(target.join(" ")),
            "remove" | "-" | "rm" | "delete" => RoleListAction::Remove(target.join(" ")),
            "list" => RoleListAction::Show,
            _ => RoleListAction::Invalid,
        },
    };
    ConfigCommand::RoleList { list, action }
}

fn channel(slot: ChannelSlot, rest: &[&str]) -> ConfigCommand {
    ConfigCommand::Channel {
        slot,
        setting: setting_of(rest),
    }
}

fn setting_of(rest: &[&str]) -> Setting {
    if rest.is_empty() {
        return Setting::Show;
    }
    let value = rest.join(" ");
    if RESET_WORDS.contains(&value.to_lowercase().as_str()) {
        Setting::Reset
    } else {
        Setting::Set(value)
    }
}

fn mode_arg(word: &str) -> ModeArg {
    match word.to_lowercase().as_str() {
        "review" => ModeArg::Review,
        "autoapprove" | "auto-approve" | "auto_approve" | "auto" => ModeArg::Autoapprove,
        _ => ModeArg::Invalid,
    }
}

fn toggle(word: &str) -> Toggle {
    match word.to_lowercase().as_str() {
        "enable" | "on" => Toggle::On,
        "disable" | "off" => Toggle::Off,
        "toggle" => Toggle::Flip,
        _ => Toggle::Invalid,
    }
}

fn emoji_action(rest: &[&str]) -> EmojiAction {
    let Some((first, tail)) = rest.split_first() else {
        return EmojiAction::Show;
    };
    let slot = match first.to_lowercase().as_str() {
        "up" | "upvote" | "yes" => VoteSlot::Up,
        "mid" | "middle" | "neutral" | "shrug" => VoteSlot::Mid,
        "down" | "downvote" | "no" => VoteSlot::Down,
        other => {
            return match toggle(other) {
                Toggle::Invalid => EmojiAction::Invalid,
                switch => EmojiAction::Feed(switch),
            }
        }
    };
    EmojiAction::Set {
        slot,
        input: tail.first().map(ToString::to_string),
    }
}

/// Whether an emoji argument disables the slot.
pub fn is_disable_word(input: &str) -> bool {
    DISABLE_WORDS.contains(&input.to_lowercase().as_str())
}
