//! Discord integration errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscordError {
    #[error("Invalid Discord configuration: {0}")]
    Config(String),

    #[error("Discord API error: {0}")]
    Api(#[from] serenity::Error),
}
