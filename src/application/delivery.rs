//! # Response Delivery
//!
//! Chat messages are capped at 2000 characters. Short responses go out as a
//! single message, medium ones are split on line boundaries, and anything
//! longer arrives as a text attachment instead of a wall of messages.

use crate::domain::traits::ChatProvider;
use crate::strings::messages;

/// Hard per-message limit imposed by the chat platform.
pub const MESSAGE_LIMIT: usize = 2000;
/// Above this length the response becomes a file instead of a message burst.
pub const ATTACHMENT_THRESHOLD: usize = 4000;
/// Filename used for attached responses.
const ATTACHMENT_NAME: &str = "response.txt";

/// How a response of a given length reaches the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryPlan {
    Single,
    Chunks(Vec<String>),
    Attachment,
}

/// Decide how `content` should be delivered. Lengths count characters, which
/// is what the platform limit counts.
pub fn plan(content: &str) -> DeliveryPlan {
    let length = content.chars().count();
    if length <= MESSAGE_LIMIT {
        DeliveryPlan::Single
    } else if length > ATTACHMENT_THRESHOLD {
        DeliveryPlan::Attachment
    } else {
        DeliveryPlan::Chunks(split_on_lines(content, MESSAGE_LIMIT))
    }
}

/// Send `content` to the channel according to its plan. Empty content becomes
/// a generic success notice so a command never finishes silently.
pub async fn deliver(chat: &impl ChatProvider, content: &str) -> Result<(), String> {
    if content.is_empty() {
        return chat.reply(messages::ACTION_OK).await;
    }

    match plan(content) {
        DeliveryPlan::Single => chat.reply(content).await,
        DeliveryPlan::Chunks(chunks) => {
            for chunk in &chunks {
                chat.reply(chunk).await?;
            }
            Ok(())
        }
        DeliveryPlan::Attachment => {
            chat.send_document(ATTACHMENT_NAME, content.as_bytes(), messages::LONG_RESPONSE_CAPTION)
                .await
        }
    }
}

/// Split `content` into chunks of at most `limit` characters, preferring line
/// boundaries. A single line longer than `limit` is hard-split.
fn split_on_lines(content: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in content.split('\n') {
        let line_len = line.chars().count();

        if line_len > limit {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            let mut piece = String::new();
            let mut piece_len = 0usize;
            for ch in line.chars() {
                if piece_len == limit {
                    chunks.push(std::mem::take(&mut piece));
                    piece_len = 0;
                }
                piece.push(ch);
                piece_len += 1;
            }
            // The tail stays open so following lines can share its chunk.
            current = piece;
            current_len = piece_len;
            continue;
        }

        let needed = if current.is_empty() { line_len } else { current_len + 1 + line_len };
        if needed > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current.is_empty() {
            current.push_str(line);
            current_len = line_len;
        } else {
            current.push('\n');
            current.push_str(line);
            current_len += 1 + line_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
