//! Bot configuration from the environment
//!
//! Values come from process environment variables, optionally seeded from a
//! `.env` file by `dotenvy` in `main`.

use anyhow::{bail, Context, Result};
use std::time::Duration;

use runbot::services::piston::{PistonConfig, DEFAULT_BASE_URL};
use runbot::{OutputMode, RunSettings};
use runbot_integration_discord::DiscordConfig;

/// Where the language registry comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrySource {
    /// Installed runtimes reported by the backend
    Piston,
    /// The static list compiled into the bot
    Builtin,
}

impl std::str::FromStr for RegistrySource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "piston" => Ok(RegistrySource::Piston),
            "builtin" => Ok(RegistrySource::Builtin),
            _ => Err(format!("Unknown registry source: {}", s)),
        }
    }
}

/// Full bot configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord: DiscordConfig,
    pub piston: PistonConfig,
    pub run: RunSettings,
    pub registry_source: RegistrySource,
}

impl BotConfig {
    /// Read configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let Some(token) = get("DISCORD_TOKEN").or_else(|| get("TOKEN")) else {
            bail!("DISCORD_TOKEN is not set");
        };

        let mut discord = DiscordConfig::new(token.trim());
        if let Some(value) = get("RUNBOT_RESPOND_TO_DMS") {
            discord = discord.with_dms(parse_bool("RUNBOT_RESPOND_TO_DMS", &value)?);
        }
        if let Some(value) = get("RUNBOT_SHOW_TYPING") {
            discord = discord.with_typing(parse_bool("RUNBOT_SHOW_TYPING", &value)?);
        }
        if let Some(value) = get("RUNBOT_ALLOWED_CHANNELS") {
            discord = discord.with_allowed_channels(parse_channel_ids(&value)?);
        }
        discord
            .validate()
            .context("DISCORD_TOKEN is not a usable bot token")?;

        let base_url = get("PISTON_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut piston = PistonConfig::new(base_url.trim());
        if let Some(value) = get("RUNBOT_RUN_TIMEOUT_MS") {
            let ms: u64 = value
                .trim()
                .parse()
                .with_context(|| format!("RUNBOT_RUN_TIMEOUT_MS is not a number: {}", value))?;
            piston = piston.with_run_timeout(Duration::from_millis(ms));
        }

        let mut run = RunSettings::default();
        if let Some(value) = get("RUNBOT_MSG_CHAR_LIMIT") {
            let limit: usize = value
                .trim()
                .parse()
                .with_context(|| format!("RUNBOT_MSG_CHAR_LIMIT is not a number: {}", value))?;
            run = run.with_limit(limit);
        }
        if let Some(value) = get("RUNBOT_OUTPUT_MODE") {
            let mode: OutputMode = value.parse().map_err(anyhow::Error::msg)?;
            run = run.with_mode(mode);
        }
        if let Some(value) = get("RUNBOT_COMMAND_PREFIX") {
            run = run.with_command_prefix(value.trim());
        }
        if let Some(value) = get("RUNBOT_CODE_BLOCKS") {
            run = run.with_code_blocks(parse_bool("RUNBOT_CODE_BLOCKS", &value)?);
        }
        if let Some(value) = get("RUNBOT_LIST_LANGUAGES") {
            run = run.with_list_languages(parse_bool("RUNBOT_LIST_LANGUAGES", &value)?);
        }
        if let Some(value) = get("RUNBOT_AVOID_SEPARATOR_SPLIT") {
            run = run.with_separator_avoidance(parse_bool("RUNBOT_AVOID_SEPARATOR_SPLIT", &value)?);
        }

        let registry_source = match get("RUNBOT_REGISTRY") {
            Some(value) => value.parse().map_err(anyhow::Error::msg)?,
            None => RegistrySource::Piston,
        };

        Ok(Self {
            discord,
            piston,
            run,
            registry_source,
        })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("{} must be a boolean, got '{}'", key, value),
    }
}

fn parse_channel_ids(value: &str) -> Result<Vec<u64>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse::<u64>()
                .with_context(|| format!("RUNBOT_ALLOWED_CHANNELS has an invalid channel id: {}", id))
        })
        .collect()
}
