//! Gateway event handler running chat messages through the run pipeline

use async_trait::async_trait;
use runbot::{CodeExecutor, RunService};
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::client::DiscordClient;
use crate::config::DiscordConfig;
use crate::delivery::deliver;
use crate::error::DiscordError;

/// Run service shared by every event task
pub type SharedRunService = Arc<RunService<dyn CodeExecutor>>;

/// Serenity event handler
///
/// Serenity dispatches each event on its own task, so a slow execution
/// only delays the reply to its own message.
pub struct RunHandler {
    service: SharedRunService,
    config: DiscordConfig,
}

impl RunHandler {
    pub fn new(service: SharedRunService, config: DiscordConfig) -> Self {
        Self { service, config }
    }

    /// Whether an incoming message should be looked at at all
    fn should_handle(&self, msg: &Message) -> bool {
        self.config
            .accepts_message(msg.author.bot, msg.guild_id.is_none(), msg.channel_id.get())
    }
}

#[async_trait]
impl EventHandler for RunHandler {
    async fn message(&self, ctx: Context, msg: Message) {
        if !self.should_handle(&msg) {
            return;
        }

        // Only messages addressed to us get a typing indicator and a reply
        let Some(prepared) = self.service.prepare(&msg.content).transpose() else {
            return;
        };

        info!(
            user = %msg.author.name,
            channel_id = %msg.channel_id,
            message_id = %msg.id,
            "Received run request"
        );

        let typing = self
            .config
            .show_typing
            .then(|| msg.channel_id.start_typing(&ctx.http));

        let reply = self.service.handle_prepared(prepared).await;

        if let Some(typing) = typing {
            typing.stop();
        }

        let client = DiscordClient::from_http(ctx.http.clone());
        match deliver(
            &client,
            msg.channel_id.get(),
            reply.messages(),
            &self.config.fallback_notice,
        )
        .await
        {
            Ok(sent) => debug!(channel_id = %msg.channel_id, sent = sent, "Reply delivered"),
            Err(e) => warn!(error = %e, channel_id = %msg.channel_id, "Reply delivery failed"),
        }
    }

    async fn ready(&self, _: Context, ready: Ready) {
        info!(
            user = %ready.user.name,
            guilds = ready.guilds.len(),
            languages = self.service.registry().len(),
            "Bot connected - listening for code"
        );
    }
}

/// Gateway intents needed to read message content in guilds and DMs
pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
}

/// Connect to Discord and serve messages until the gateway shuts down.
pub async fn run_bot(service: SharedRunService, config: DiscordConfig) -> Result<(), DiscordError> {
    config.validate()?;

    let token = config.token.trim().to_string();
    let handler = RunHandler::new(service, config);

    let mut client = Client::builder(&token, intents())
        .event_handler(handler)
        .await?;

    info!("Starting Discord gateway connection");
    client.start().await?;
    Ok(())
}
