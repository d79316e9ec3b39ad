//! Integration tests for the suggester-bot crate.
//!
//! These cover startup up to, but not including, the gateway connection.

use suggester_bot::{intents, BotError, SuggesterBot};
use suggester_config::{Config, ConfigLoader};
use suggester_core::{ConfigStore, ServerConfig};
use suggester_common::GuildId;

#[cfg(feature = "testing")]
use suggester_common::test_utils::init_test_logging;

fn config_in(dir: &tempfile::TempDir) -> Config {
    let mut config = Config::default();
    config.discord.token = "test.token.value".to_string();
    config.database.path = dir.path().join("db");
    config
}

#[test]
fn test_missing_token_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(&dir);
    config.discord.token = "   ".to_string();

    assert!(matches!(SuggesterBot::new(config), Err(BotError::MissingToken)));
}

#[tokio::test]
async fn test_bot_initialization() {
    #[cfg(feature = "testing")]
    init_test_logging();

    let dir = tempfile::tempdir().unwrap();
    let bot = SuggesterBot::new(config_in(&dir)).unwrap();

    let stats = bot.stats().unwrap();
    assert_eq!(stats.server_configs, 0);
    assert_eq!(stats.suggestions, 0);

    let data = bot.data().unwrap();
    assert_eq!(data.default_prefix(), ".");
    assert_eq!(data.default_locale().to_string(), "en-US");

    data.store
        .write_config(GuildId(5), &ServerConfig::with_prefix("!"))
        .await
        .unwrap();
    assert_eq!(bot.stats().unwrap().server_configs, 1);
}

#[test]
fn test_config_file_drives_startup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(
        &path,
        format!(
            "discord:\n  token: \"from.file.token\"\n  default_prefix: \"?\"\ndatabase:\n  path: {:?}\n",
            dir.path().join("db")
        ),
    )
    .unwrap();

    let config = ConfigLoader::parse_file(&path).unwrap();
    let bot = SuggesterBot::new(config).unwrap();
    assert_eq!(bot.data().unwrap().default_prefix(), "?");
}

#[test]
fn test_intents_include_reactions() {
    let intents = intents();
    assert!(intents.guild_message_reactions());
    assert!(intents.message_content());
    assert!(intents.guilds());
}
