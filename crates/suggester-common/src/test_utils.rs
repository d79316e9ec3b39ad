//! Test utilities and shared test helpers for the Suggester workspace.
//!
//! Enabled for this crate's own tests and, for other crates, through the
//! `testing` feature.

use crate::{ChannelId, GuildId, MessageId, RoleId, UserId};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging for tests. Safe to call multiple times.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));

        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init();
    });
}

/// Test fixture for creating a fixed timestamp.
pub fn mock_timestamp(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
        .unwrap()
}

/// Create a temporary directory for tests that automatically cleans up.
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Discord-related test ids.
pub mod discord_fixtures {
    use super::*;

    /// Test guild ID.
    pub fn test_guild_id() -> GuildId {
        GuildId(111_111_111_111_111_111)
    }

    /// Test channel ID.
    pub fn test_channel_id() -> ChannelId {
        ChannelId(123_456_789_012_345_678)
    }

    /// Test user ID.
    pub fn test_user_id() -> UserId {
        UserId(987_654_321_098_765_432)
    }

    /// Test role ID.
    pub fn test_role_id() -> RoleId {
        RoleId(555_555_555_555_555_555)
    }

    /// Test message ID.
    pub fn test_message_id() -> MessageId {
        MessageId(777_777_777_777_777_777)
    }
}

/// Property-based testing strategies.
pub mod property_testing {
    use crate::{EmojiId, RoleId};
    use proptest::prelude::*;

    /// Strategy for snowflake-sized values.
    pub fn snowflake_strategy() -> impl Strategy<Value = u64> {
        100_000_000_000_000_000u64..=999_999_999_999_999_999u64
    }

    /// Strategy for role IDs.
    pub fn role_id_strategy() -> impl Strategy<Value = RoleId> {
        snowflake_strategy().prop_map(RoleId)
    }

    /// Strategy for custom emoji IDs.
    pub fn emoji_id_strategy() -> impl Strategy<Value = EmojiId> {
        snowflake_strategy().prop_map(EmojiId)
    }

    /// Strategy for custom emoji names.
    pub fn emoji_name_strategy() -> impl Strategy<Value = String> {
        r"[a-zA-Z0-9_]{2,32}".prop_map(|s| s.to_string())
    }
}
