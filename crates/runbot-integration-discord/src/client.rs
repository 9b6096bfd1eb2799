//! Discord API client wrapper

use async_trait::async_trait;
use serenity::http::Http;
use serenity::model::id::ChannelId;
use std::sync::Arc;
use tracing::{debug, error};

use crate::config::DiscordConfig;
use crate::delivery::MessageSender;
use crate::error::DiscordError;

/// Discord API client
#[derive(Clone)]
pub struct DiscordClient {
    http: Arc<Http>,
}

impl DiscordClient {
    /// Create a new Discord client
    pub fn new(config: &DiscordConfig) -> Self {
        Self::from_http(Arc::new(Http::new(&config.token)))
    }

    /// Wrap an existing HTTP client, e.g. the one from an event context
    pub fn from_http(http: Arc<Http>) -> Self {
        Self { http }
    }

    /// Send a message to a channel
    pub async fn send_message(&self, channel_id: u64, content: &str) -> Result<(), DiscordError> {
        let channel = ChannelId::new(channel_id);
        debug!(channel_id = %channel_id, content_len = %content.len(), "Sending message to Discord");

        channel
            .say(&self.http, content)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to send Discord message"))?;

        Ok(())
    }

    /// Check the token by fetching the bot's own user
    pub async fn health_check(&self) -> bool {
        match self.http.get_current_user().await {
            Ok(user) => {
                debug!(user = %user.name, "Discord health check passed");
                true
            }
            Err(e) => {
                error!(error = %e, "Discord health check failed");
                false
            }
        }
    }

    /// Get the underlying HTTP client for advanced operations
    pub fn http(&self) -> &Arc<Http> {
        &self.http
    }
}

#[async_trait]
impl MessageSender for DiscordClient {
    async fn send(&self, channel_id: u64, content: &str) -> Result<(), DiscordError> {
        self.send_message(channel_id, content).await
    }
}
