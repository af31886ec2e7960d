//! Chat messages and the append-only message log.

use std::fmt;

use chrono::{DateTime, Local};
use serde::Serialize;

/// Unique, monotonically increasing message identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who produced a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum Origin {
    User,
    Service(String),
}

impl Origin {
    pub fn is_user(&self) -> bool {
        matches!(self, Origin::User)
    }

    pub fn service(&self) -> Option<&str> {
        match self {
            Origin::User => None,
            Origin::Service(name) => Some(name),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Origin::User => "user",
            Origin::Service(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub text: String,
    pub origin: Origin,
    pub timestamp: DateTime<Local>,
}

/// Append-only ordered sequence of messages.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    next_id: u64,
    messages: Vec<ChatMessage>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, origin: Origin, text: impl Into<String>) -> &ChatMessage {
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id: MessageId(self.next_id),
            text: text.into(),
            origin,
            timestamp: Local::now(),
        });
        &self.messages[self.messages.len() - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}
