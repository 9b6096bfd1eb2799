//! Reply delivery
//!
//! Sends the messages of one reply in order. A failed send is logged,
//! followed by a single fallback notice, and the rest of the reply is
//! dropped.

use async_trait::async_trait;
use tracing::{error, warn};

use crate::error::DiscordError;

/// Anything that can post a text message to a channel
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, channel_id: u64, content: &str) -> Result<(), DiscordError>;
}

/// Deliver `messages` to `channel_id` strictly in order.
///
/// Returns how many messages were sent. On the first failure the fallback
/// notice is attempted once and the original error is returned.
pub async fn deliver<S: MessageSender + ?Sized>(
    sender: &S,
    channel_id: u64,
    messages: &[String],
    fallback_notice: &str,
) -> Result<usize, DiscordError> {
    for (index, message) in messages.iter().enumerate() {
        if let Err(err) = sender.send(channel_id, message).await {
            error!(
                error = %err,
                channel_id = %channel_id,
                fragment = index,
                total = messages.len(),
                "Received error while sending message"
            );

            if let Err(fallback_err) = sender.send(channel_id, fallback_notice).await {
                warn!(error = %fallback_err, channel_id = %channel_id, "Fallback notice failed too");
            }
            return Err(err);
        }
    }

    Ok(messages.len())
}
