//! Chorded "hold A, then tap B" gestures.
//!
//! Coordination is peer-to-peer: button B carries a non-owning link to its
//! predecessor A (an index into the shared [`ButtonBank`]).  When B
//! confirms a release while A is still held, B claims A by moving it to
//! CombinationWaitForEnd and redirects itself to CombinationPush.  A then
//! waits out its own release without firing any of its callbacks.
//! Nothing is claimed while the poll handler takes no chords.
//!
//! [`ButtonBank`]: crate::button::ButtonBank

use crate::button::{ButtonId, ButtonState};
use crate::fsm::State;

/// Link from a button to the predecessor that must be held for a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombinationLink {
    predecessor: ButtonId,
}

impl CombinationLink {
    pub const fn new(predecessor: ButtonId) -> Self {
        Self { predecessor }
    }

    pub const fn predecessor(&self) -> ButtonId {
        self.predecessor
    }
}

/// Try to claim `predecessor` for a chord.
///
/// Succeeds if the predecessor is physically held (WaitForEnd, which this
/// call moves to CombinationWaitForEnd) or was already claimed by an
/// earlier tap.  Must run under the guard.
pub(crate) fn claim(predecessor: &ButtonState) -> bool {
    match predecessor.state() {
        Some(State::CombinationWaitForEnd) => true,
        Some(State::WaitForEnd) => {
            predecessor.set_state(State::CombinationWaitForEnd);
            true
        }
        _ => false,
    }
}
