//! runbot - runs fenced code blocks posted on Discord and replies with the
//! output.

use anyhow::{bail, Context, Result};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use runbot::services::PistonExecutor;
use runbot::{CodeExecutor, RunService};
use runbot_integration_discord::{run_bot, DiscordClient};

mod config;
mod registry;

use config::BotConfig;
use registry::load_registry;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the environment may already be set
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("🤖 runbot initializing...");

    let config = BotConfig::from_env()?;
    tracing::debug!(
        piston_url = %config.piston.base_url,
        run_timeout_ms = ?config.piston.run_timeout_ms,
        msg_char_limit = config.run.limit,
        output_mode = %config.run.mode,
        command_prefix = %config.run.command_prefix,
        code_blocks = config.run.code_blocks,
        registry = ?config.registry_source,
        "Configured settings"
    );

    let piston = Arc::new(
        PistonExecutor::new(config.piston.clone()).context("Failed to build Piston client")?,
    );
    tracing::info!("🔧 Piston backend: {}", piston.base_url());

    let registry = Arc::new(load_registry(config.registry_source, piston.as_ref()).await?);
    tracing::info!("📚 {} languages available", registry.len());

    let executor: Arc<dyn CodeExecutor> = piston;
    let service = Arc::new(RunService::new(registry, executor, config.run.clone())?);

    if !DiscordClient::new(&config.discord).health_check().await {
        bail!("Discord rejected the bot token");
    }

    tracing::info!("✅ runbot ready - press CTRL-C to exit");

    tokio::select! {
        result = run_bot(service, config.discord) => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("👋 Shutting down"),
    }

    Ok(())
}
