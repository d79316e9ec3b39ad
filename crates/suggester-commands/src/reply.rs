//! Command replies.

use crate::context::{CommandError, Context};
use crate::convert;
use suggester_config::ControlEmojis;
use suggester_core::EmbedDocument;

/// What a command answers with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Prefixed with the check emoji.
    Success(String),
    /// Prefixed with the x emoji.
    Error(String),
    /// Sent as is.
    Info(String),
    Embed(Box<EmbedDocument>),
}

impl Reply {
    /// Message content for text replies.
    pub fn text(&self, controls: &ControlEmojis) -> Option<String> {
        match self {
            Self::Success(message) => Some(format!("{} {message}", controls.check)),
            Self::Error(message) => Some(format!("{} {message}", controls.x)),
            Self::Info(message) => Some(message.clone()),
            Self::Embed(_) => None,
        }
    }

    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

pub async fn send(ctx: Context<'_>, reply: &Reply) -> Result<(), CommandError> {
    let builder = match reply {
        Reply::Embed(embed) => poise::CreateReply::default().embed(convert::create_embed(embed)),
        text => poise::CreateReply::default()
            .content(text.text(ctx.data().controls()).unwrap_or_default()),
    };
    ctx.send(builder).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes() {
        let controls = ControlEmojis::default();
        assert_eq!(
            Reply::Success("Saved".into()).text(&controls).as_deref(),
            Some("✅ Saved")
        );
        assert_eq!(
            Reply::Error("Nope".into()).text(&controls).as_deref(),
            Some("❌ Nope")
        );
        assert_eq!(Reply::Info("Plain".into()).text(&controls).as_deref(), Some("Plain"));
        assert!(Reply::Embed(Box::default()).text(&controls).is_none());
        assert!(Reply::Error(String::new()).is_error());
    }
}
