//! # Help Command

use anyhow::Result;

use crate::domain::config::AppConfig;
use crate::domain::traits::ChatProvider;
use crate::strings;

/// Send the command overview, rendered with the configured prefix.
pub async fn handle_help(config: &AppConfig, chat: &impl ChatProvider) -> Result<()> {
    chat.reply(&strings::help::render(&config.prefix))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to send help: {e}"))
}
