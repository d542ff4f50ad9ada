//! Turns raw backend replies into conversation messages.
//!
//! Chat and summarize endpoints answer with different shapes. This is the only
//! place that knows about the difference; everything downstream sees a
//! [`Message`] with [`ResponseMetadata`] attached.

use crate::api::{BackendReply, ChatReply, SummaryReply};
use crate::conversation::{Message, ResponseMetadata};
use crate::error::{Result, SummitError};
use crate::mode::Mode;
use crate::usage::UsageDelta;
use serde_json::Value;

const UNKNOWN_MODEL: &str = "unknown";

/// A reply reduced to what the session needs.
#[derive(Debug, Clone)]
pub struct NormalizedReply {
    pub message: Message,
    pub usage: UsageDelta,
}

/// Decode `raw` as the reply shape expected for `mode`.
pub fn parse_reply(mode: Mode, raw: &str) -> Result<BackendReply> {
    let value: Value = serde_json::from_str(raw)?;

    let field = mode.content_field();
    match value.get(field) {
        Some(Value::String(_)) => {}
        Some(other) => {
            return Err(SummitError::UnrecognizedResponseShape {
                mode,
                detail: format!("'{}' is not a string (got {})", field, type_name(other)),
            })
        }
        None => {
            return Err(SummitError::UnrecognizedResponseShape {
                mode,
                detail: format!("missing '{}' field", field),
            })
        }
    }

    let reply = match mode {
        Mode::Chat => serde_json::from_value::<ChatReply>(value).map(BackendReply::Chat),
        Mode::Summary => serde_json::from_value::<SummaryReply>(value).map(BackendReply::Summary),
    };

    reply.map_err(|e| SummitError::UnrecognizedResponseShape {
        mode,
        detail: e.to_string(),
    })
}

pub fn normalize(mode: Mode, raw: &str) -> Result<NormalizedReply> {
    let reply = parse_reply(mode, raw)?;
    let details = reply.details();
    let usage = details.usage.unwrap_or_default();

    let execution_time_seconds = match details.execution_time {
        Some(seconds) if seconds.is_finite() && seconds >= 0.0 => seconds,
        Some(seconds) => {
            tracing::warn!(execution_time = seconds, "Ignoring invalid execution time");
            0.0
        }
        None => 0.0,
    };

    let metadata = ResponseMetadata {
        model: details
            .model
            .clone()
            .unwrap_or_else(|| UNKNOWN_MODEL.to_string()),
        execution_time_seconds,
        total_tokens: u64::try_from(usage.total_tokens).unwrap_or(0),
        stop_reason: details.stop_reason.clone(),
        message_id: details.message_id.clone(),
        raw_payload: raw.to_string(),
    };

    Ok(NormalizedReply {
        message: Message::assistant(reply.text(), metadata),
        usage,
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Role;
    use crate::error::ErrorKind;

    const CHAT_REPLY: &str = r#"{"response": "hi", "model": "m1", "execution_time": 0.5, "usage": {"input_tokens": 1, "output_tokens": 1, "total_tokens": 2}}"#;

    #[test]
    fn test_chat_reply() {
        let normalized = normalize(Mode::Chat, CHAT_REPLY).unwrap();

        assert_eq!(normalized.message.role(), Role::Assistant);
        assert_eq!(normalized.message.content(), "hi");
        let metadata = normalized.message.metadata().unwrap();
        assert_eq!(metadata.model, "m1");
        assert_eq!(metadata.execution_time_seconds, 0.5);
        assert_eq!(metadata.total_tokens, 2);
        assert_eq!(metadata.raw_payload, CHAT_REPLY);
        assert_eq!(normalized.usage, UsageDelta::new(1, 1, 2));
    }

    #[test]
    fn test_summary_reply() {
        let raw = r#"{"summary": "short", "model": "m2", "execution_time": 1.25, "usage": {"input_tokens": 40, "output_tokens": 8, "total_tokens": 48}, "source": "https://example.com"}"#;

        let normalized = normalize(Mode::Summary, raw).unwrap();

        assert_eq!(normalized.message.content(), "short");
        assert_eq!(normalized.usage.total_tokens, 48);
        // Unextracted fields survive in the raw payload.
        assert!(normalized
            .message
            .metadata()
            .unwrap()
            .raw_payload
            .contains("https://example.com"));
    }

    #[test]
    fn test_field_must_match_mode() {
        let err = normalize(Mode::Summary, CHAT_REPLY).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnrecognizedResponseShape);

        let err = normalize(Mode::Chat, r#"{"summary": "s"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnrecognizedResponseShape);
    }

    #[test]
    fn test_non_string_content_rejected() {
        let err = normalize(Mode::Chat, r#"{"response": 42}"#).unwrap_err();
        assert!(matches!(
            err,
            SummitError::UnrecognizedResponseShape { mode: Mode::Chat, .. }
        ));
    }

    #[test]
    fn test_non_object_reply_rejected() {
        let err = normalize(Mode::Chat, r#"["hi"]"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnrecognizedResponseShape);
    }

    #[test]
    fn test_malformed_json_is_transport_failure() {
        let err = normalize(Mode::Chat, "<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, SummitError::Json(_)));
        assert_eq!(err.kind(), ErrorKind::TransportFailure);
    }

    #[test]
    fn test_missing_details_use_defaults() {
        let normalized = normalize(Mode::Chat, r#"{"response": "bare"}"#).unwrap();

        let metadata = normalized.message.metadata().unwrap();
        assert_eq!(metadata.model, "unknown");
        assert_eq!(metadata.execution_time_seconds, 0.0);
        assert_eq!(metadata.total_tokens, 0);
        assert_eq!(normalized.usage, UsageDelta::default());
    }

    #[test]
    fn test_backend_extras_kept() {
        let raw = r#"{"response": "ok", "role": "assistant", "model": "m", "stop_reason": "end_turn", "message_id": "msg_01", "usage": {"input_tokens": 2, "output_tokens": 3, "total_tokens": 5}}"#;

        let normalized = normalize(Mode::Chat, raw).unwrap();
        let metadata = normalized.message.metadata().unwrap();
        assert_eq!(metadata.stop_reason.as_deref(), Some("end_turn"));
        assert_eq!(metadata.message_id.as_deref(), Some("msg_01"));
    }

    #[test]
    fn test_negative_execution_time_clamped() {
        let normalized =
            normalize(Mode::Chat, r#"{"response": "x", "execution_time": -3.0}"#).unwrap();
        assert_eq!(
            normalized.message.metadata().unwrap().execution_time_seconds,
            0.0
        );
    }

    #[test]
    fn test_negative_usage_passed_through_for_validation() {
        let normalized = normalize(
            Mode::Chat,
            r#"{"response": "x", "usage": {"input_tokens": -1, "output_tokens": 0, "total_tokens": -1}}"#,
        )
        .unwrap();

        assert!(normalized.usage.validate().is_err());
        assert_eq!(normalized.message.metadata().unwrap().total_tokens, 0);
    }
}
