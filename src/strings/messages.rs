//! # Messages
//!
//! Constant strings and format functions for messages sent to the channel.

pub const AUTH_DENIED: &str = "🚫 **Authorization Denied**.";
pub const UNKNOWN_COMMAND: &str = "❓ Unknown command. Try `help`.";
pub const PONG: &str = "🏓 Pong!";
pub const ACTION_OK: &str = "✅ Action completed successfully.";
pub const RELAY_UNREACHABLE: &str =
    "❌ The automation endpoint could not be reached. Please try again.";
pub const LONG_RESPONSE_CAPTION: &str = "📄 The response is too long, here it is as a file:";

pub fn relay_rejected(status: u16) -> String {
    format!("❌ The automation endpoint rejected the command (status {status}).")
}

pub fn internal_error(reason: &str) -> String {
    format!("❌ Internal error: {reason}.")
}
