//! # Domain Types
//!
//! Core data structures passed between the layers.

/// One parsed command, created from an inbound message and consumed
/// synchronously by the router. Nothing about it outlives the invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    /// Original message text, prefix included.
    pub raw: String,
    /// Command name with the prefix stripped, lowercased.
    pub name: String,
    /// Remainder after the command name; empty when absent.
    pub args: String,
    /// Opaque identifier of the invoking user.
    pub sender: String,
}

impl CommandInvocation {
    /// Parse an inbound message into an invocation.
    ///
    /// Returns `None` for messages that do not start with the prefix or that
    /// carry no command name after it; those are ordinary chatter and the
    /// router never sees them.
    pub fn parse(prefix: &str, message: &str, sender: &str) -> Option<Self> {
        let trimmed = message.trim();
        let rest = trimmed.strip_prefix(prefix)?.trim_start();
        if rest.is_empty() {
            return None;
        }

        let (name, args) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (rest, ""),
        };

        Some(Self {
            raw: trimmed.to_string(),
            name: name.to_lowercase(),
            args: args.to_string(),
            sender: sender.to_string(),
        })
    }
}
