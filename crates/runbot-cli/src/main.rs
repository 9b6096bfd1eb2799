//! runbot CLI - try the bot pipeline without Discord
//!
//! Runs a message (or a plain source file) through the same parse, execute
//! and render steps the bot uses, and prints the messages it would post.

mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use runbot::services::{PistonConfig, PistonExecutor};
use runbot::{CodeExecutor, LanguageRegistry, OutputMode, RunService, RunSettings, RuntimeCatalog};

use config::Config;

#[derive(Parser)]
#[command(name = "runbot")]
#[command(about = "runbot CLI - run fenced code through the bot pipeline", long_about = None)]
#[command(version)]
struct Cli {
    /// Log pipeline and backend activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a message file, or a source file with --lang
    Run {
        /// File holding a chat message (or plain source with --lang)
        file: String,
        /// Treat the file as plain source in this language
        #[arg(short, long)]
        lang: Option<String>,
        /// Output mode: chunk, crop
        #[arg(short, long)]
        mode: Option<OutputMode>,
        /// Maximum characters per message
        #[arg(long)]
        limit: Option<usize>,
        /// Use the builtin language list instead of the backend's runtimes
        #[arg(long)]
        builtin: bool,
    },

    /// List supported languages
    Languages {
        /// Show the builtin list instead of the backend's runtimes
        #[arg(long)]
        builtin: bool,
    },

    /// Show or change configuration
    Config {
        /// Piston API root
        #[arg(long)]
        url: Option<String>,
        /// Default characters per message
        #[arg(long)]
        limit: Option<usize>,
        /// Default output mode: chunk, crop
        #[arg(long)]
        mode: Option<OutputMode>,
        /// Run timeout forwarded to the backend, in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Restore defaults
        #[arg(long)]
        reset: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("runbot=debug")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Run { file, lang, mode, limit, builtin } => {
            cmd_run(file, lang, mode, limit, builtin).await
        }
        Commands::Languages { builtin } => cmd_languages(builtin).await,
        Commands::Config { url, limit, mode, timeout_ms, reset } => {
            cmd_config(url, limit, mode, timeout_ms, reset)
        }
    }
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_run(
    file: String,
    lang: Option<String>,
    mode: Option<OutputMode>,
    limit: Option<usize>,
    builtin: bool,
) -> Result<()> {
    let config = Config::load()?;
    let content =
        fs::read_to_string(&file).with_context(|| format!("Failed to read file: {}", file))?;

    let message = match lang {
        Some(lang) => wrap_source(&lang, &content),
        None => content,
    };

    let mut settings = RunSettings::default();
    if let Some(limit) = limit.or(config.limit) {
        settings = settings.with_limit(limit);
    }
    if let Some(mode) = mode.or(config.mode) {
        settings = settings.with_mode(mode);
    }

    let piston = Arc::new(executor(&config)?);
    let registry = Arc::new(load_registry(piston.as_ref(), builtin).await);
    let executor: Arc<dyn CodeExecutor> = piston;
    let service = RunService::new(registry, executor, settings)?;

    let Some(reply) = service.handle(&message).await else {
        bail!(
            "Nothing to run. Put code in a ```<language> block, start with '{} <language>', or pass --lang",
            service.settings().command_prefix
        );
    };

    let total = reply.len();
    for (index, text) in reply.messages().iter().enumerate() {
        println!(
            "{}",
            format!(
                "── message {}/{} ({} chars) ──",
                index + 1,
                total,
                text.chars().count()
            )
            .dimmed()
        );
        println!("{}", text);
    }

    Ok(())
}

async fn cmd_languages(builtin: bool) -> Result<()> {
    let config = Config::load()?;
    let piston = executor(&config)?;
    let registry = load_registry(&piston, builtin).await;

    println!("{} ({})", "Languages:".bold(), registry.len());
    for entry in registry.entries() {
        let aliases = if entry.aliases.is_empty() {
            String::new()
        } else {
            entry.aliases.join(", ")
        };
        let version = entry.version.as_deref().unwrap_or("");

        println!("  {} {} {}", entry.name.cyan(), version.dimmed(), aliases.dimmed());
    }

    Ok(())
}

fn cmd_config(
    url: Option<String>,
    limit: Option<usize>,
    mode: Option<OutputMode>,
    timeout_ms: Option<u64>,
    reset: bool,
) -> Result<()> {
    let mut config = Config::load()?;
    let changed = reset || url.is_some() || limit.is_some() || mode.is_some() || timeout_ms.is_some();

    if reset {
        config.reset();
    }
    if let Some(url) = url {
        config.set_base_url(&url);
    }
    if limit.is_some() {
        config.limit = limit;
    }
    if mode.is_some() {
        config.mode = mode;
    }
    if timeout_ms.is_some() {
        config.run_timeout_ms = timeout_ms;
    }

    if changed {
        config.save()?;
        println!("{} Config saved to {:?}", "✓".green(), Config::config_path()?);
    }

    let defaults = RunSettings::default();
    println!("{}", "Configuration:".bold());
    println!("  Backend:  {}", config.base_url.cyan());
    println!(
        "  Limit:    {}",
        config.limit.unwrap_or(defaults.limit).to_string().cyan()
    );
    println!(
        "  Mode:     {}",
        config.mode.unwrap_or(defaults.mode).to_string().cyan()
    );
    match config.run_timeout_ms {
        Some(ms) => println!("  Timeout:  {}", format!("{} ms", ms).cyan()),
        None => println!("  Timeout:  {}", "backend default".dimmed()),
    }
    println!("\n{} {:?}", "Config file:".dimmed(), Config::config_path()?);

    Ok(())
}

// ============================================
// Helpers
// ============================================

fn executor(config: &Config) -> Result<PistonExecutor> {
    let mut piston = PistonConfig::new(config.base_url.as_str());
    if let Some(ms) = config.run_timeout_ms {
        piston = piston.with_run_timeout(Duration::from_millis(ms));
    }
    PistonExecutor::new(piston).context("Failed to build Piston client")
}

async fn load_registry<C: RuntimeCatalog + ?Sized>(catalog: &C, builtin: bool) -> LanguageRegistry {
    if builtin {
        return LanguageRegistry::builtin();
    }

    match catalog.runtimes().await {
        Ok(runtimes) => match LanguageRegistry::from_catalog(runtimes) {
            Ok(registry) => registry,
            Err(e) => {
                eprintln!("{} {} - using builtin list", "Warning:".yellow(), e);
                LanguageRegistry::builtin()
            }
        },
        Err(e) => {
            eprintln!("{} {} - using builtin list", "Warning:".yellow(), e);
            LanguageRegistry::builtin()
        }
    }
}

/// Wrap plain source in a fenced block tagged with `lang`
fn wrap_source(lang: &str, source: &str) -> String {
    format!("```{}\n{}\n```", lang.trim(), source.trim_end_matches(['\r', '\n']))
}
