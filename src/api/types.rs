use crate::conversation::{Message, Role};
use crate::usage::UsageDelta;
use serde::{Deserialize, Serialize};

/// A message as sent on the wire: role and text only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: Role,
    pub content: String,
}

impl WireMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role(),
            content: message.content().to_string(),
        }
    }
}

/// Body of `POST /chat` and `POST /summarize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummitRequest {
    pub content: Vec<WireMessage>,
    #[serde(rename = "respondInLanguage")]
    pub respond_in_language: Option<String>,
}

/// Fields shared by both reply shapes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplyDetails {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub execution_time: Option<f64>,
    #[serde(default)]
    pub usage: Option<UsageDelta>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(flatten)]
    pub details: ReplyDetails,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryReply {
    pub summary: String,
    #[serde(flatten)]
    pub details: ReplyDetails,
}

/// A decoded reply, tagged by the endpoint that produced it.
#[derive(Debug, Clone)]
pub enum BackendReply {
    Chat(ChatReply),
    Summary(SummaryReply),
}

impl BackendReply {
    pub fn text(&self) -> &str {
        match self {
            BackendReply::Chat(reply) => &reply.response,
            BackendReply::Summary(reply) => &reply.summary,
        }
    }

    pub fn details(&self) -> &ReplyDetails {
        match self {
            BackendReply::Chat(reply) => &reply.details,
            BackendReply::Summary(reply) => &reply.details,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
