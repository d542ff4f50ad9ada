use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interaction style of a session.
///
/// `Summary` is stateless: every request carries only the newest user text.
/// `Chat` is stateful: every request resends the whole chat history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Summary,
    #[default]
    Chat,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Summary, Mode::Chat];

    /// Path segment of the backend endpoint serving this mode.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Mode::Summary => "summarize",
            Mode::Chat => "chat",
        }
    }

    /// Reply field holding the generated text for this mode.
    pub fn content_field(&self) -> &'static str {
        match self {
            Mode::Summary => "summary",
            Mode::Chat => "response",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Summary => "Summary",
            Mode::Chat => "Chat",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Summary => "summary",
            Mode::Chat => "chat",
        })
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "summary" | "summarize" => Ok(Mode::Summary),
            "chat" => Ok(Mode::Chat),
            other => Err(format!(
                "unknown mode '{}' (expected 'chat' or 'summary')",
                other
            )),
        }
    }
}
