//! # Command Router
//!
//! Parses inbound messages and dispatches them. Local commands answer
//! directly; relay commands pass the access guard, get a fresh signed token,
//! go out through the webhook relay, and the rendered outcome is delivered
//! back to the channel.
//!
//! One invocation runs synchronously to completion. The router holds only
//! immutable startup state, so concurrent deliveries from the gateway cannot
//! interleave anything per-invocation.

use anyhow::Result;

use crate::application::access::AccessGuard;
use crate::application::{delivery, formatter};
use crate::domain::config::AppConfig;
use crate::domain::traits::ChatProvider;
use crate::domain::types::CommandInvocation;
use crate::infrastructure::webhook::client::{WebhookPayload, WebhookRelay, WebhookRequest};
use crate::infrastructure::webhook::error::RelayError;
use crate::infrastructure::webhook::token::TokenSigner;
use crate::interface::commands;
use crate::strings::messages;

/// Commands forwarded to the automation webhook. The names mirror the
/// workflow's action families; everything else is local or unknown.
const RELAY_COMMANDS: [&str; 5] = ["ask", "email", "calendar", "note", "task"];

pub struct CommandRouter {
    config: AppConfig,
    guard: AccessGuard,
    signer: TokenSigner,
    relay: WebhookRelay,
}

impl CommandRouter {
    pub fn new(
        config: AppConfig,
        guard: AccessGuard,
        signer: TokenSigner,
        relay: WebhookRelay,
    ) -> Self {
        Self { config, guard, signer, relay }
    }

    /// Handle one inbound message end to end. Per-invocation failures are
    /// recovered here with a reply and a log line; only reply-channel
    /// breakage in local handlers propagates.
    pub async fn route<C>(&self, chat: &C, message: &str, sender: &str) -> Result<()>
    where
        C: ChatProvider,
    {
        let Some(invocation) = CommandInvocation::parse(&self.config.prefix, message, sender)
        else {
            // Not a command. The bot only speaks when spoken to.
            return Ok(());
        };

        tracing::info!(
            "Dispatching '{}' (args: '{}') from user {}",
            invocation.name,
            invocation.args,
            invocation.sender
        );
        tracing::debug!("Raw invocation in {}: {}", chat.channel_id(), invocation.raw);

        // Gate before any handler runs, local ones included.
        if !self.guard.is_allowed(&invocation.sender) {
            tracing::warn!(
                "Denied user {} attempting '{}' in channel {}",
                invocation.sender,
                invocation.name,
                chat.channel_id()
            );
            let _ = chat.reply(messages::AUTH_DENIED).await;
            return Ok(());
        }

        match invocation.name.as_str() {
            "help" => commands::help::handle_help(&self.config, chat).await?,
            "ping" => commands::misc::handle_ping(chat).await?,
            name if RELAY_COMMANDS.contains(&name) => {
                self.dispatch_relay(chat, &invocation).await;
            }
            _ => {
                let _ = chat.reply(messages::UNKNOWN_COMMAND).await;
            }
        }

        Ok(())
    }

    /// Sign, relay, render, deliver. Every failure ends in a user-visible
    /// message; none escapes the invocation.
    async fn dispatch_relay(&self, chat: &impl ChatProvider, invocation: &CommandInvocation) {
        let token = match self.signer.sign(&invocation.sender, chrono::Utc::now()) {
            Ok(token) => token,
            Err(e) => {
                tracing::error!("Failed to sign relay token: {e}");
                let _ = chat.reply(&messages::internal_error("token signing failed")).await;
                return;
            }
        };

        let request = WebhookRequest {
            token,
            payload: WebhookPayload {
                command: invocation.name.clone(),
                args: invocation.args.clone(),
            },
        };

        // The webhook can take a while; show the channel we are on it.
        let _ = chat.typing().await;

        match self.relay.relay(&request).await {
            Ok(response) => {
                tracing::info!("Webhook accepted '{}' with status {}", invocation.name, response.status);
                let rendered = formatter::format_response(&response.body);
                if let Err(e) = delivery::deliver(chat, &rendered).await {
                    // Reply channel may be gone mid-flight; drop, never escalate.
                    tracing::warn!("Dropping reply for '{}': {e}", invocation.name);
                }
            }
            Err(RelayError::Rejected { status, body }) => {
                tracing::error!("Webhook rejected '{}' with status {status}: {body}", invocation.name);
                let _ = chat.reply(&messages::relay_rejected(status)).await;
            }
            Err(e @ RelayError::Unreachable(_)) => {
                tracing::error!("Webhook unreachable for '{}': {e}", invocation.name);
                let _ = chat.reply(messages::RELAY_UNREACHABLE).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use httpmock::prelude::*;

    /// Chat double that records everything sent to the channel.
    #[derive(Default)]
    struct RecordingChat {
        replies: Mutex<Vec<String>>,
        documents: Mutex<Vec<String>>,
    }

    impl RecordingChat {
        fn replies(&self) -> Vec<String> {
            self.replies.lock().unwrap().clone()
        }

        fn documents(&self) -> Vec<String> {
            self.documents.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatProvider for RecordingChat {
        async fn reply(&self, content: &str) -> Result<(), String> {
            self.replies.lock().unwrap().push(content.to_string());
            Ok(())
        }

        async fn send_document(
            &self,
            filename: &str,
            _content: &[u8],
            caption: &str,
        ) -> Result<(), String> {
            self.documents.lock().unwrap().push(filename.to_string());
            self.replies.lock().unwrap().push(caption.to_string());
            Ok(())
        }

        async fn typing(&self) -> Result<(), String> {
            Ok(())
        }

        fn channel_id(&self) -> String {
            "chan-1".to_string()
        }
    }

    fn test_config(webhook_url: &str, allowed: &[&str]) -> AppConfig {
        AppConfig {
            discord_token: "gateway-token".to_string(),
            prefix: "/".to_string(),
            allowed_user_ids: allowed.iter().map(|id| id.to_string()).collect(),
            jwt_secret: "router-test-secret".to_string(),
            webhook_url: webhook_url.to_string(),
            chatgpt_api_key: None,
            token_ttl_secs: 60,
            webhook_timeout_secs: 5,
        }
    }

    fn build_router(config: AppConfig) -> CommandRouter {
        let guard = AccessGuard::new(config.allowed_user_ids.clone());
        let signer = TokenSigner::new(config.jwt_secret.clone(), config.token_ttl_secs);
        let relay = WebhookRelay::new(
            config.webhook_url.clone(),
            Duration::from_secs(config.webhook_timeout_secs),
        )
        .unwrap();
        CommandRouter::new(config, guard, signer, relay)
    }

    #[tokio::test]
    async fn allowed_user_command_is_relayed_and_the_reply_lands() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/hook")
                    .header_exists("authorization")
                    .json_body(serde_json::json!({"command": "ask", "args": "hello"}));
                then.status(200).body("{\"reply\":\"hi\"}");
            })
            .await;

        let router = build_router(test_config(&server.url("/hook"), &["42"]));
        let chat = RecordingChat::default();

        router.route(&chat, "/ask hello", "42").await.unwrap();

        mock.assert_async().await;
        assert_eq!(chat.replies(), vec!["hi".to_string()]);
    }

    #[tokio::test]
    async fn denied_user_gets_a_rejection_and_no_network_call() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/hook");
                then.status(200).body("{}");
            })
            .await;

        let router = build_router(test_config(&server.url("/hook"), &["42"]));
        let chat = RecordingChat::default();

        router.route(&chat, "/ask hello", "7").await.unwrap();

        assert_eq!(mock.hits_async().await, 0);
        assert_eq!(chat.replies(), vec![messages::AUTH_DENIED.to_string()]);
    }

    #[tokio::test]
    async fn empty_allowlist_lets_anyone_relay() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/hook");
                then.status(200).body("{\"reply\":\"sure\"}");
            })
            .await;

        let router = build_router(test_config(&server.url("/hook"), &[]));
        let chat = RecordingChat::default();

        router.route(&chat, "/ask anything", "999").await.unwrap();

        assert_eq!(mock.hits_async().await, 1);
        assert_eq!(chat.replies(), vec!["sure".to_string()]);
    }

    #[tokio::test]
    async fn rejected_relay_surfaces_the_status_to_the_user() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/hook");
                then.status(500).body("workflow error");
            })
            .await;

        let router = build_router(test_config(&server.url("/hook"), &["42"]));
        let chat = RecordingChat::default();

        router.route(&chat, "/email unread", "42").await.unwrap();

        assert_eq!(chat.replies(), vec![messages::relay_rejected(500)]);
    }

    #[tokio::test]
    async fn unreachable_relay_surfaces_a_failed_command_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/hook");
                then.status(200).delay(Duration::from_millis(500)).body("{}");
            })
            .await;

        // Deadline far shorter than the mock's delay.
        let config = test_config(&server.url("/hook"), &["42"]);
        let router = CommandRouter::new(
            config.clone(),
            AccessGuard::new(config.allowed_user_ids.clone()),
            TokenSigner::new(config.jwt_secret.clone(), config.token_ttl_secs),
            WebhookRelay::new(config.webhook_url.clone(), Duration::from_millis(50)).unwrap(),
        );
        let chat = RecordingChat::default();

        router.route(&chat, "/task remind me", "42").await.unwrap();

        assert_eq!(chat.replies(), vec![messages::RELAY_UNREACHABLE.to_string()]);
    }

    #[tokio::test]
    async fn unknown_command_is_answered_locally() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/hook");
                then.status(200).body("{}");
            })
            .await;

        let router = build_router(test_config(&server.url("/hook"), &["42"]));
        let chat = RecordingChat::default();

        router.route(&chat, "/frobnicate now", "42").await.unwrap();

        assert_eq!(mock.hits_async().await, 0);
        assert_eq!(chat.replies(), vec![messages::UNKNOWN_COMMAND.to_string()]);
    }

    #[tokio::test]
    async fn unprefixed_chatter_is_ignored() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/hook");
                then.status(200).body("{}");
            })
            .await;

        let router = build_router(test_config(&server.url("/hook"), &["42"]));
        let chat = RecordingChat::default();

        router.route(&chat, "just talking to a friend", "42").await.unwrap();

        assert_eq!(mock.hits_async().await, 0);
        assert!(chat.replies().is_empty());
    }

    #[tokio::test]
    async fn ping_answers_without_the_relay() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/hook");
                then.status(200).body("{}");
            })
            .await;

        let router = build_router(test_config(&server.url("/hook"), &["42"]));
        let chat = RecordingChat::default();

        router.route(&chat, "/ping", "42").await.unwrap();

        assert_eq!(mock.hits_async().await, 0);
        assert_eq!(chat.replies(), vec![messages::PONG.to_string()]);
    }

    #[tokio::test]
    async fn help_is_gated_too() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/hook");
                then.status(200).body("{}");
            })
            .await;

        let router = build_router(test_config(&server.url("/hook"), &["42"]));
        let chat = RecordingChat::default();

        router.route(&chat, "/help", "7").await.unwrap();

        assert_eq!(chat.replies(), vec![messages::AUTH_DENIED.to_string()]);
    }

    #[tokio::test]
    async fn oversized_webhook_reply_arrives_as_an_attachment() {
        let reply = "r".repeat(5000);
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/hook");
                then.status(200)
                    .body(serde_json::json!({"reply": reply}).to_string());
            })
            .await;

        let router = build_router(test_config(&server.url("/hook"), &["42"]));
        let chat = RecordingChat::default();

        router.route(&chat, "/ask essay please", "42").await.unwrap();

        assert_eq!(chat.documents(), vec!["response.txt".to_string()]);
        assert_eq!(chat.replies(), vec![messages::LONG_RESPONSE_CAPTION.to_string()]);
    }
}
