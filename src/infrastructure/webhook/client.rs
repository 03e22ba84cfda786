//! # Webhook Relay
//!
//! Sends gated commands to the automation endpoint. One authenticated POST
//! per invocation, bounded by a deadline, never retried.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use super::error::RelayError;
use super::token::SignedToken;

/// Command payload POSTed to the endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload {
    pub command: String,
    pub args: String,
}

/// One outbound request: the freshly signed token plus the payload. Built per
/// invocation; nothing persists between calls.
#[derive(Debug)]
pub struct WebhookRequest {
    pub token: SignedToken,
    pub payload: WebhookPayload,
}

/// Accepted relay outcome. The body is the endpoint's response text,
/// unaltered; rendering it is the formatter's job so the raw text survives
/// for logging either way.
#[derive(Debug)]
pub struct RelayResponse {
    pub status: u16,
    pub body: String,
}

/// HTTP client for the automation endpoint.
pub struct WebhookRelay {
    client: Client,
    url: String,
}

impl WebhookRelay {
    /// Build the relay with the request deadline baked into the client.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url: url.into() })
    }

    /// Send one request and report the outcome. Exactly one network call: on
    /// failure the caller tells the user, not the transport.
    pub async fn relay(&self, request: &WebhookRequest) -> Result<RelayResponse, RelayError> {
        tracing::info!("Relaying '{}' to {}", request.payload.command, self.url);

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", request.token.as_str()))
            .header("Content-Type", "application/json")
            .json(&request.payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(RelayError::Rejected { status: status.as_u16(), body });
        }

        tracing::debug!("Webhook answered {} with {} body bytes", status, body.len());
        Ok(RelayResponse { status: status.as_u16(), body })
    }
}
