use super::guard::InFlightGuard;
use super::state::{lock_state, SessionState};
use crate::api::{SummitRequest, Transport};
use crate::config::SessionConfig;
use crate::conversation::Message;
use crate::error::{Result, SummitError};
use crate::mode::Mode;
use crate::request_builder::{validate_input, RequestBuilder};
use crate::response_handler::{self, NormalizedReply};
use std::sync::Mutex;

/// Drives a session: validates input, talks to the transport and records the
/// outcome.
///
/// At most one submission runs at a time. A second `submit` while one is in
/// flight fails immediately with [`SummitError::Busy`]; so do `switch_mode`,
/// `clear` and `reset`. State changes happen either before the transport call
/// (the optimistic user message) or after it resolves, never across it.
pub struct SessionController<T: Transport> {
    transport: T,
    config: SessionConfig,
    state: Mutex<SessionState>,
}

impl<T: Transport> SessionController<T> {
    pub fn new(transport: T, config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let state = SessionState::new(config.initial_mode, config.respond_in_language.clone());

        Ok(Self {
            transport,
            config,
            state: Mutex::new(state),
        })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Read-only snapshot of the whole session.
    pub fn state(&self) -> SessionState {
        lock_state(&self.state).clone()
    }

    pub fn current_mode(&self) -> Mode {
        lock_state(&self.state).current_mode
    }

    pub fn is_in_flight(&self) -> bool {
        lock_state(&self.state).in_flight
    }

    /// Send `text` in the current mode and return the assistant's reply.
    ///
    /// The user message is appended before the request goes out and stays in
    /// history even if the submission fails. The assistant message and the
    /// usage delta are recorded together or not at all.
    pub async fn submit(&self, text: &str) -> Result<Message> {
        let (_guard, mode, request) = self.begin_submission(text)?;

        let outcome = match self.transport.send(mode, &request).await {
            Ok(raw) => response_handler::normalize(mode, &raw)
                .and_then(|reply| self.complete_submission(mode, reply)),
            Err(e) => Err(e),
        };

        if let Err(ref e) = outcome {
            tracing::warn!(
                mode = %mode,
                kind = ?e.kind(),
                error = %e,
                "Submission failed"
            );
        }

        outcome
    }

    fn begin_submission(&self, text: &str) -> Result<(InFlightGuard<'_>, Mode, SummitRequest)> {
        let mut state = lock_state(&self.state);
        if state.in_flight {
            tracing::debug!("Rejected submit while a request is in flight");
            return Err(SummitError::Busy);
        }

        let mode = state.current_mode;
        let user_text = validate_input(text, self.config.max_input_length)?.to_string();
        let request = RequestBuilder::new(mode, state.conversations.messages(mode), &user_text)
            .max_input_length(self.config.max_input_length)
            .respond_in_language(state.respond_in_language.as_deref())
            .build()?;

        state
            .conversations
            .append(mode, Message::user(user_text.as_str()));
        state.pending_input = Some(user_text);
        let guard = InFlightGuard::engage(&self.state, &mut state);

        tracing::debug!(
            mode = %mode,
            messages = request.content.len(),
            "Submitting request"
        );

        Ok((guard, mode, request))
    }

    fn complete_submission(&self, mode: Mode, reply: NormalizedReply) -> Result<Message> {
        let mut state = lock_state(&self.state);

        // Validates the delta; nothing below runs if it is rejected.
        let totals = state.usage.apply_usage(mode, reply.usage)?;
        state.conversations.append(mode, reply.message.clone());
        state.pending_input = None;

        tracing::debug!(
            mode = %mode,
            total_tokens = totals.total_tokens,
            "Submission completed"
        );

        Ok(reply.message)
    }

    /// Make `mode` the target of later submissions. Both modes keep their
    /// history and usage.
    pub fn switch_mode(&self, mode: Mode) -> Result<()> {
        let mut state = lock_state(&self.state);
        if state.in_flight {
            return Err(SummitError::Busy);
        }

        if state.current_mode != mode {
            tracing::info!(from = %state.current_mode, to = %mode, "Switched mode");
            state.current_mode = mode;
        }
        Ok(())
    }

    /// Empty one mode's history. Usage totals are kept.
    pub fn clear(&self, mode: Mode) -> Result<()> {
        let mut state = lock_state(&self.state);
        if state.in_flight {
            return Err(SummitError::Busy);
        }

        state.conversations.clear(mode);
        tracing::info!(mode = %mode, "Cleared conversation");
        Ok(())
    }

    /// Clear both conversations and zero both usage buckets.
    pub fn reset(&self) -> Result<()> {
        let mut state = lock_state(&self.state);
        if state.in_flight {
            return Err(SummitError::Busy);
        }

        state.reset();
        tracing::info!("Reset session");
        Ok(())
    }

    pub fn set_language(&self, language: Option<String>) {
        let language = language
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        lock_state(&self.state).respond_in_language = language;
    }
}
