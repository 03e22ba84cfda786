//! # Main Entry Point
//!
//! Wires the relay together: environment configuration, layered tracing
//! (console plus a session log file), the webhook components, and the
//! Discord gateway client.

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serenity::all::{Client, GatewayIntents};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::application::access::AccessGuard;
use crate::application::router::CommandRouter;
use crate::domain::config::AppConfig;
use crate::infrastructure::discord::Handler;
use crate::infrastructure::webhook::client::WebhookRelay;
use crate::infrastructure::webhook::token::TokenSigner;

#[tokio::main]
async fn main() -> Result<()> {
    // A .env next to the binary is a convenience for local runs; deployments
    // provide the real environment.
    dotenvy::dotenv().ok();

    // 1. Logging Setup
    if !Path::new("data").exists() {
        fs::create_dir("data").context("Failed to create data directory")?;
    }

    // Clear previous session log
    let session_log = Path::new("data/session.log");
    if session_log.exists() {
        let _ = fs::remove_file(session_log);
    }

    let file_appender = tracing_appender::rolling::never("data", "session.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(
            "info,serenity=warn,tungstenite=warn,hyper=warn,reqwest=warn,rustls=warn",
        )
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .init();

    tracing::info!("Starting Courier...");

    // 2. Load Configuration
    // Fail fast: the relay must not come up half-configured.
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let guard = AccessGuard::new(config.allowed_user_ids.clone());
    if guard.is_open() {
        tracing::warn!(
            "ALLOWED_USER_IDS is empty: open mode, every user may invoke commands"
        );
    } else {
        tracing::info!("Allowlist active with {} user(s)", config.allowed_user_ids.len());
    }
    tracing::info!(
        "Relaying to {} (prefix '{}', token ttl {}s, timeout {}s, assistant key {})",
        config.webhook_url,
        config.prefix,
        config.token_ttl_secs,
        config.webhook_timeout_secs,
        if config.chatgpt_api_key.is_some() { "set" } else { "unset" },
    );

    // 3. Relay Components
    let signer = TokenSigner::new(config.jwt_secret.clone(), config.token_ttl_secs);
    let relay = WebhookRelay::new(
        config.webhook_url.clone(),
        Duration::from_secs(config.webhook_timeout_secs),
    )
    .context("Failed to build webhook client")?;

    let router = Arc::new(CommandRouter::new(config.clone(), guard, signer, relay));

    // 4. Discord Gateway
    // The message-content intent is required to read commands at all.
    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(Handler::new(router))
        .await
        .context("Failed to create Discord client")?;

    client.start().await.context("Discord client stopped")?;

    Ok(())
}
