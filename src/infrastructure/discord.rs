//! # Discord Service Adapter
//!
//! Implements `ChatProvider` on top of serenity and hosts the gateway event
//! handler that feeds inbound messages to the router. Nothing outside this
//! module touches serenity types.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{
    ChannelId, Context, CreateAttachment, CreateMessage, EventHandler, Http, Message, Ready,
};

use crate::application::router::CommandRouter;
use crate::domain::traits::ChatProvider;

/// `ChatProvider` bound to one Discord channel.
#[derive(Clone)]
pub struct DiscordChannel {
    http: Arc<Http>,
    channel: ChannelId,
}

impl DiscordChannel {
    pub fn new(http: Arc<Http>, channel: ChannelId) -> Self {
        Self { http, channel }
    }
}

#[async_trait]
impl ChatProvider for DiscordChannel {
    async fn reply(&self, content: &str) -> Result<(), String> {
        tracing::info!("Bot replying in {}: {}", self.channel, content);
        self.channel
            .say(&self.http, content)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    async fn send_document(
        &self,
        filename: &str,
        content: &[u8],
        caption: &str,
    ) -> Result<(), String> {
        let attachment = CreateAttachment::bytes(content.to_vec(), filename);
        let message = CreateMessage::new().content(caption).add_file(attachment);
        self.channel
            .send_message(&self.http, message)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    async fn typing(&self) -> Result<(), String> {
        self.channel.broadcast_typing(&self.http).await.map_err(|e| e.to_string())
    }

    fn channel_id(&self) -> String {
        self.channel.to_string()
    }
}

/// Gateway event handler: filters out bot traffic and hands the rest to the
/// router.
pub struct Handler {
    router: Arc<CommandRouter>,
}

impl Handler {
    pub fn new(router: Arc<CommandRouter>) -> Self {
        Self { router }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        tracing::info!("Logged in as {}", ready.user.name);
        tracing::info!("Bot is ready and listening for commands");
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Never react to ourselves or to other bots.
        if msg.author.bot || msg.content.is_empty() {
            return;
        }

        let sender = msg.author.id.get().to_string();
        tracing::debug!("Received message from {} in {}", sender, msg.channel_id);

        let chat = DiscordChannel::new(ctx.http.clone(), msg.channel_id);
        if let Err(e) = self.router.route(&chat, &msg.content, &sender).await {
            tracing::error!("Failed to handle message: {e:#}");
        }
    }
}
