//! Discord configuration

use serde::{Deserialize, Serialize};

use crate::error::DiscordError;

/// Tokens shorter than this are certainly not bot tokens
pub const MIN_TOKEN_LEN: usize = 10;

/// Notice sent once when delivering a reply fails
pub const DEFAULT_FALLBACK_NOTICE: &str = "Experienced error sending message...";

/// Configuration for Discord integration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Discord bot token
    pub token: String,
    /// Whether to respond to DMs
    pub respond_to_dms: bool,
    /// Channels to listen in; empty means every channel the bot can read
    #[serde(default)]
    pub allowed_channel_ids: Vec<u64>,
    /// Whether to show the typing indicator while code runs
    pub show_typing: bool,
    /// Sent once if a reply message cannot be delivered
    pub fallback_notice: String,
}

impl DiscordConfig {
    /// Create a new Discord configuration with just a token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Self::default()
        }
    }

    /// Restrict the bot to the given channels
    pub fn with_allowed_channels(mut self, channel_ids: impl IntoIterator<Item = u64>) -> Self {
        self.allowed_channel_ids = channel_ids.into_iter().collect();
        self
    }

    /// Enable or disable DMs
    pub fn with_dms(mut self, enable: bool) -> Self {
        self.respond_to_dms = enable;
        self
    }

    /// Enable or disable the typing indicator
    pub fn with_typing(mut self, enable: bool) -> Self {
        self.show_typing = enable;
        self
    }

    /// Check the token looks usable before connecting
    pub fn validate(&self) -> Result<(), DiscordError> {
        let token = self.token.trim();
        if token.is_empty() {
            return Err(DiscordError::Config("empty token".into()));
        }
        if token.len() < MIN_TOKEN_LEN {
            return Err(DiscordError::Config("token seems too short".into()));
        }
        Ok(())
    }

    /// Whether messages from `channel_id` should be handled
    pub fn accepts_channel(&self, channel_id: u64) -> bool {
        self.allowed_channel_ids.is_empty() || self.allowed_channel_ids.contains(&channel_id)
    }

    /// Whether a message should be handled at all.
    ///
    /// Bot authors (including this bot) are always ignored. DMs are
    /// subject to `respond_to_dms` and the channel allow-list alike.
    pub fn accepts_message(&self, from_bot: bool, is_dm: bool, channel_id: u64) -> bool {
        if from_bot {
            return false;
        }
        if is_dm && !self.respond_to_dms {
            return false;
        }
        self.accepts_channel(channel_id)
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            respond_to_dms: true,
            allowed_channel_ids: Vec::new(),
            show_typing: true,
            fallback_notice: DEFAULT_FALLBACK_NOTICE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = DiscordConfig::new("test-token-123")
            .with_allowed_channels([42, 43])
            .with_dms(false)
            .with_typing(false);

        assert_eq!(config.token, "test-token-123");
        assert_eq!(config.allowed_channel_ids, vec![42, 43]);
        assert!(!config.respond_to_dms);
        assert!(!config.show_typing);
        assert_eq!(config.fallback_notice, DEFAULT_FALLBACK_NOTICE);
    }

    #[test]
    fn test_validate_token() {
        assert!(DiscordConfig::new("").validate().is_err());
        assert!(DiscordConfig::new("   ").validate().is_err());
        assert!(DiscordConfig::new("short").validate().is_err());
        assert!(DiscordConfig::new("a-long-enough-token").validate().is_ok());
    }

    #[test]
    fn test_accepts_channel() {
        let open = DiscordConfig::new("token-token");
        assert!(open.accepts_channel(1));

        let restricted = open.with_allowed_channels([7]);
        assert!(restricted.accepts_channel(7));
        assert!(!restricted.accepts_channel(8));
    }

    #[test]
    fn test_accepts_message() {
        let config = DiscordConfig::new("token-token");
        assert!(config.accepts_message(false, false, 1));
        assert!(config.accepts_message(false, true, 1));
        assert!(!config.accepts_message(true, false, 1));
        assert!(!config.accepts_message(true, true, 1));
    }

    #[test]
    fn test_accepts_message_without_dms() {
        let config = DiscordConfig::new("token-token").with_dms(false);
        assert!(!config.accepts_message(false, true, 1));
        assert!(config.accepts_message(false, false, 1));
    }

    #[test]
    fn test_accepts_message_in_allowed_channels_only() {
        let config = DiscordConfig::new("token-token").with_allowed_channels([7, 9]);
        assert!(config.accepts_message(false, false, 7));
        assert!(config.accepts_message(false, true, 9));
        assert!(!config.accepts_message(false, false, 8));
        assert!(!config.accepts_message(true, false, 7));
    }

    #[test]
    fn test_deserialize_defaults_channels() {
        let config: DiscordConfig = serde_json::from_value(serde_json::json!({
            "token": "abcdefghijkl",
            "respond_to_dms": true,
            "show_typing": false,
            "fallback_notice": "oops"
        }))
        .unwrap();
        assert!(config.allowed_channel_ids.is_empty());
        assert_eq!(config.fallback_notice, "oops");
    }
}
