use super::state::{lock_state, SessionState};
use std::sync::Mutex;

/// Clears `in_flight` on drop, so the flag is released on every exit path,
/// including when the submitting future is dropped before it resolves.
pub(crate) struct InFlightGuard<'a> {
    state: &'a Mutex<SessionState>,
}

impl<'a> InFlightGuard<'a> {
    /// Mark the session in flight. The caller holds `locked`, the guard of
    /// `state`, and has already checked that no submission is running.
    pub(crate) fn engage(state: &'a Mutex<SessionState>, locked: &mut SessionState) -> Self {
        debug_assert!(!locked.in_flight);
        locked.in_flight = true;
        Self { state }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        lock_state(self.state).in_flight = false;
    }
}
