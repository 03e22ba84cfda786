//! # Miscellaneous Commands
//!
//! Local handlers that answer without touching the network.

use anyhow::Result;

use crate::domain::traits::ChatProvider;
use crate::strings::messages;

/// Liveness check.
pub async fn handle_ping(chat: &impl ChatProvider) -> Result<()> {
    chat.reply(messages::PONG)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to send pong: {e}"))
}
