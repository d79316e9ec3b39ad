//! Integration tests for suggester-common crate.

use chrono::{TimeZone, Utc};
use suggester_common::{
    escape_markdown, format_timestamp, truncate_string, ChannelId, GuildId, LoggingConfig,
    SuggesterError, UserId,
};

#[test]
fn test_ids_round_trip_through_strings() {
    let channel: ChannelId = "123456789".parse().unwrap();
    assert_eq!(channel, ChannelId(123_456_789));
    assert_eq!(format!("{}", UserId(987_654_321)), "987654321");
}

#[test]
fn test_everyone_role_matches_guild() {
    let guild = GuildId(42);
    assert_eq!(guild.everyone_role().get(), 42);
}

#[test]
fn test_format_timestamp() {
    let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    assert_eq!(format_timestamp(timestamp), "2024-01-01 12:00:00 UTC");
}

#[test]
fn test_string_helpers() {
    assert_eq!(truncate_string("abcdefgh", 6), "abc...");
    assert_eq!(escape_markdown("~~x~~"), "\\~\\~x\\~\\~");
}

#[test]
fn test_logging_config_from_yaml_like_json() {
    let config: LoggingConfig =
        serde_json::from_str(r#"{"level": "debug", "format": "compact"}"#).unwrap();
    assert_eq!(config.level, "debug");
    assert!(config.include_targets);
}

#[test]
fn test_error_constructors() {
    let err = SuggesterError::config_with_source(
        "Invalid log level filter",
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "bad"),
    );
    assert!(err.to_string().contains("Configuration error"));
}
