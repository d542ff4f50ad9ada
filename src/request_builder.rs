use crate::api::{SummitRequest, WireMessage};
use crate::conversation::Message;
use crate::error::{Result, SummitError};
use crate::mode::Mode;

pub const DEFAULT_MAX_INPUT_LENGTH: usize = 20_000;

/// Trim `text` and check it against the input rules.
///
/// Length is counted in characters of the trimmed text.
pub fn validate_input(text: &str, max_input_length: usize) -> Result<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SummitError::EmptyInput);
    }

    let length = trimmed.chars().count();
    if length > max_input_length {
        return Err(SummitError::InputTooLong {
            length,
            max: max_input_length,
        });
    }

    Ok(trimmed)
}

/// Assembles the outbound payload for one submission.
pub struct RequestBuilder<'a> {
    mode: Mode,
    history: &'a [Message],
    user_text: &'a str,
    max_input_length: usize,
    respond_in_language: Option<&'a str>,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(mode: Mode, history: &'a [Message], user_text: &'a str) -> Self {
        Self {
            mode,
            history,
            user_text,
            max_input_length: DEFAULT_MAX_INPUT_LENGTH,
            respond_in_language: None,
        }
    }

    pub fn max_input_length(mut self, max_input_length: usize) -> Self {
        self.max_input_length = max_input_length;
        self
    }

    pub fn respond_in_language(mut self, language: Option<&'a str>) -> Self {
        self.respond_in_language = language;
        self
    }

    /// Chat requests replay the whole history followed by the new message.
    /// Summary requests carry the new message alone.
    pub fn build(self) -> Result<SummitRequest> {
        let text = validate_input(self.user_text, self.max_input_length)?;

        let content = match self.mode {
            Mode::Chat => self
                .history
                .iter()
                .map(WireMessage::from)
                .chain(std::iter::once(WireMessage::user(text)))
                .collect(),
            Mode::Summary => vec![WireMessage::user(text)],
        };

        Ok(SummitRequest {
            content,
            respond_in_language: self
                .respond_in_language
                .map(str::trim)
                .filter(|lang| !lang.is_empty())
                .map(str::to_string),
        })
    }
}
