use crate::mode::Mode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Details of the backend reply an assistant message came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseMetadata {
    pub model: String,
    pub execution_time_seconds: f64,
    pub total_tokens: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// The whole reply body exactly as received.
    pub raw_payload: String,
}

/// One exchanged message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    role: Role,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<ResponseMetadata>,
    created_at: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            metadata: None,
            created_at: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>, metadata: ResponseMetadata) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            metadata: Some(metadata),
            created_at: Utc::now(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn metadata(&self) -> Option<&ResponseMetadata> {
        self.metadata.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Ordered, per-mode message history.
///
/// Insertion order is chronological order and is what chat requests replay.
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    summary: Vec<Message>,
    chat: Vec<Message>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, mode: Mode, message: Message) {
        self.partition_mut(mode).push(message);
    }

    /// Order-preserving copy of one mode's history.
    pub fn snapshot(&self, mode: Mode) -> Vec<Message> {
        self.messages(mode).to_vec()
    }

    pub fn messages(&self, mode: Mode) -> &[Message] {
        match mode {
            Mode::Summary => &self.summary,
            Mode::Chat => &self.chat,
        }
    }

    /// Empty one mode's history. Usage totals live elsewhere and are untouched.
    pub fn clear(&mut self, mode: Mode) {
        self.partition_mut(mode).clear();
    }

    pub fn len(&self, mode: Mode) -> usize {
        self.messages(mode).len()
    }

    pub fn is_empty(&self, mode: Mode) -> bool {
        self.messages(mode).is_empty()
    }

    pub fn last_assistant(&self, mode: Mode) -> Option<&Message> {
        self.messages(mode)
            .iter()
            .rev()
            .find(|m| m.role() == Role::Assistant)
    }

    fn partition_mut(&mut self, mode: Mode) -> &mut Vec<Message> {
        match mode {
            Mode::Summary => &mut self.summary,
            Mode::Chat => &mut self.chat,
        }
    }
}
