//! Inbound message model and the polling source seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BotError;

/// One inbound message addressed to the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Delivery-unique message id, used for deduplication.
    pub id: String,
    /// Author handle.
    pub author: String,
    /// Raw message text, bot address prefix included.
    pub text: String,
}

/// A polling source of inbound messages.
///
/// Delivery is at-least-once across polls: the same message may appear in
/// any number of batches. Batches arrive newest-first; the bot processes
/// them in reverse so older submissions keep their order.
#[async_trait]
pub trait MentionSource: Send {
    /// Fetch the current batch of messages.
    async fn poll(&mut self) -> Result<Vec<InboundMessage>, BotError>;
}

/// Remove the bot's address prefix from a message, leaving only the code.
///
/// Only the first occurrence is removed; surrounding whitespace is
/// trimmed.
pub fn strip_bot_prefix(text: &str, prefix: &str) -> String {
    text.replacen(prefix, "", 1).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_bot_prefix() {
        assert_eq!(strip_bot_prefix("@artree (+ i j)", "@artree"), "(+ i j)");
        assert_eq!(strip_bot_prefix("(+ i j) @artree", "@artree"), "(+ i j)");
        assert_eq!(strip_bot_prefix("(+ i j)", "@artree"), "(+ i j)");
    }

    #[test]
    fn test_strip_removes_only_first_occurrence() {
        assert_eq!(
            strip_bot_prefix("@artree (+ i j) @artree", "@artree"),
            "(+ i j) @artree"
        );
    }
}
