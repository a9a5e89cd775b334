use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identity::unix_millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// Best-effort identifier for a bot reply, derived from the clock.
///
/// Unique within one session only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hands out strictly increasing millisecond ids.
#[derive(Debug, Default)]
pub(super) struct IdClock {
    last: u64,
}

impl IdClock {
    pub(super) fn next(&mut self) -> MessageId {
        self.last = unix_millis().max(self.last + 1);
        MessageId(self.last.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageMetadata {
    pub confidence: Option<f64>,
    pub category: Option<String>,
    pub message_id: Option<MessageId>,
    pub is_error: bool,
    /// Locally generated notice (thank-you line), not a chatbot reply.
    pub is_system: bool,
}

/// One transcript entry. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub metadata: MessageMetadata,
}

impl Message {
    fn new(text: impl Into<String>, sender: Sender, metadata: MessageMetadata) -> Self {
        Self {
            text: text.into(),
            sender,
            timestamp: Utc::now(),
            metadata,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Sender::User, MessageMetadata::default())
    }

    pub fn bot_reply(
        text: impl Into<String>,
        confidence: f64,
        category: impl Into<String>,
        message_id: MessageId,
    ) -> Self {
        Self::new(
            text,
            Sender::Bot,
            MessageMetadata {
                confidence: Some(confidence),
                category: Some(category.into()),
                message_id: Some(message_id),
                ..MessageMetadata::default()
            },
        )
    }

    pub fn bot_error(text: impl Into<String>) -> Self {
        Self::new(
            text,
            Sender::Bot,
            MessageMetadata {
                is_error: true,
                ..MessageMetadata::default()
            },
        )
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(
            text,
            Sender::Bot,
            MessageMetadata {
                is_system: true,
                ..MessageMetadata::default()
            },
        )
    }

    pub fn message_id(&self) -> Option<&MessageId> {
        self.metadata.message_id.as_ref()
    }

    /// Whether inline like/dislike applies to this message.
    pub const fn is_rateable(&self) -> bool {
        matches!(self.sender, Sender::Bot)
            && !self.metadata.is_error
            && !self.metadata.is_system
            && self.metadata.message_id.is_some()
    }

    /// Local wall-clock time as `HH:MM`.
    pub fn time_label(&self) -> String {
        self.timestamp
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_clock_is_strictly_increasing() {
        let mut clock = IdClock::default();
        let ids: Vec<u64> = (0..50)
            .map(|_| clock.next().as_str().parse().unwrap_or_default())
            .collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_only_plain_bot_replies_are_rateable() {
        let reply = Message::bot_reply("Hi", 0.9, "greeting", MessageId::new("1"));
        assert!(reply.is_rateable());
        assert!(!Message::user("Hello").is_rateable());
        assert!(!Message::bot_error("Sorry").is_rateable());
        assert!(!Message::system("Thanks").is_rateable());
    }

    #[test]
    fn test_bot_reply_metadata() {
        let reply = Message::bot_reply("Hi", 0.4, "unknown", MessageId::new("42"));
        assert_eq!(reply.sender, Sender::Bot);
        assert_eq!(reply.metadata.confidence, Some(0.4));
        assert_eq!(reply.metadata.category.as_deref(), Some("unknown"));
        assert_eq!(reply.message_id().map(MessageId::as_str), Some("42"));
        assert!(!reply.metadata.is_error);
    }

    #[test]
    fn test_time_label_shape() {
        let label = Message::user("x").time_label();
        assert_eq!(label.len(), 5);
        assert_eq!(label.as_bytes()[2], b':');
    }
}
