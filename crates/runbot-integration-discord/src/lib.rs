//! Discord Integration for runbot
//!
//! This crate connects the runbot pipeline to Discord: every guild or DM
//! message is offered to the [`runbot::RunService`], and its reply is
//! posted back to the same channel in order.
//!
//! # Usage
//!
//! ```rust,ignore
//! use runbot_integration_discord::{run_bot, DiscordConfig};
//!
//! let config = DiscordConfig::new("your-bot-token");
//! run_bot(Arc::new(service), config).await?;
//! ```

mod client;
mod config;
mod delivery;
mod error;
mod handler;

pub use client::DiscordClient;
pub use config::{DiscordConfig, DEFAULT_FALLBACK_NOTICE, MIN_TOKEN_LEN};
pub use delivery::{deliver, MessageSender};
pub use error::DiscordError;
pub use handler::{intents, run_bot, RunHandler, SharedRunService};
