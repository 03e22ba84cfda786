//! # Domain Traits
//!
//! Abstract interface for the chat platform. The gateway SDK stays behind
//! this seam so the relay core can be driven by a test double.

use async_trait::async_trait;

/// One reply channel on the chat platform, bound to a single conversation.
///
/// Errors come back as strings: callers log and drop them, because a reply
/// channel going away mid-invocation is not a process failure.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a markdown message to the bound channel.
    async fn reply(&self, content: &str) -> Result<(), String>;

    /// Upload a small text document with a caption message.
    async fn send_document(
        &self,
        filename: &str,
        content: &[u8],
        caption: &str,
    ) -> Result<(), String>;

    /// Raise the typing indicator while a slow call is in flight.
    async fn typing(&self) -> Result<(), String>;

    /// Identifier of the bound channel, for logs.
    fn channel_id(&self) -> String;
}
