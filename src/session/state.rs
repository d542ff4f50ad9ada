use crate::conversation::{ConversationStore, Message};
use crate::mode::Mode;
use crate::usage::{UsageAccumulator, UsageTotals};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Everything a front end needs to render a session.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Mode that receives the next submission
    pub current_mode: Mode,
    /// Message history, one partition per mode
    pub conversations: ConversationStore,
    /// Token totals, one bucket per mode
    pub usage: UsageAccumulator,
    /// True while a submission awaits its reply
    pub in_flight: bool,
    /// Text of the latest submission until it succeeds
    pub pending_input: Option<String>,
    /// Language tag sent as `respondInLanguage`
    pub respond_in_language: Option<String>,
}

impl SessionState {
    pub fn new(current_mode: Mode, respond_in_language: Option<String>) -> Self {
        Self {
            current_mode,
            conversations: ConversationStore::new(),
            usage: UsageAccumulator::new(),
            in_flight: false,
            pending_input: None,
            respond_in_language,
        }
    }

    pub fn conversation(&self, mode: Mode) -> &[Message] {
        self.conversations.messages(mode)
    }

    pub fn current_conversation(&self) -> &[Message] {
        self.conversation(self.current_mode)
    }

    pub fn usage_totals(&self, mode: Mode) -> UsageTotals {
        self.usage.totals(mode)
    }

    /// Clear both conversations and zero both usage buckets.
    pub fn reset(&mut self) {
        for mode in Mode::ALL {
            self.conversations.clear(mode);
            self.usage.reset(mode);
        }
        self.pending_input = None;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Mode::default(), None)
    }
}

/// Lock the shared state. Every critical section is short and panic-free, so
/// a poisoned lock still holds consistent data.
pub(crate) fn lock_state(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
