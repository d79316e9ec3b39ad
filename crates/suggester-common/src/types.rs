//! Snowflake newtype wrappers for domain modeling.
//!
//! These are deliberately independent of serenity's id types so the core
//! crates can be built and tested without the platform SDK.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Returns the raw numeric value.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }

            /// Big-endian key bytes, used for ordered store keys.
            #[must_use]
            pub const fn key_bytes(self) -> [u8; 8] {
                self.0.to_be_bytes()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

snowflake!(
    /// A Discord guild (server) ID.
    GuildId
);
snowflake!(
    /// A Discord channel ID.
    ChannelId
);
snowflake!(
    /// A Discord role ID.
    RoleId
);
snowflake!(
    /// A Discord user ID.
    UserId
);
snowflake!(
    /// A Discord message ID.
    MessageId
);
snowflake!(
    /// A Discord custom emoji ID.
    EmojiId
);

impl GuildId {
    /// The `@everyone` role of a guild shares the guild's id.
    #[must_use]
    pub const fn everyone_role(self) -> RoleId {
        RoleId(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let id: RoleId = " 42 ".parse().unwrap();
        assert_eq!(id, RoleId(42));
        assert_eq!(id.to_string(), "42");
        assert!("abc".parse::<ChannelId>().is_err());
    }

    #[test]
    fn test_key_bytes_are_ordered() {
        assert!(MessageId(1).key_bytes() < MessageId(256).key_bytes());
    }

    #[test]
    fn test_everyone_role() {
        assert_eq!(GuildId(7).everyone_role(), RoleId(7));
    }

    #[test]
    fn test_serializes_transparently() {
        let json = serde_json::to_string(&UserId(99)).unwrap();
        assert_eq!(json, "99");
    }
}
