//! The shared per-button cell.
//!
//! One `ButtonState` per physical button, statically allocated for the
//! life of the program.  Fields are partitioned by writer:
//!
//! | Field                 | Written by                                   |
//! |-----------------------|----------------------------------------------|
//! | `interrupt_timestamp` | edge interrupt only                          |
//! | `state`               | poller, except the arming move to PushDelay  |
//! | `loop_timestamp`      | poller only                                  |
//! | `push_count`          | poller only                                  |
//!
//! Every field is an atomic with plain loads and stores (no
//! read-modify-write instructions, so this builds on cores without CAS).
//! Atomicity of multi-field updates comes from the guard, not from the
//! atomics: the poller writes only inside a guard section, and the edge
//! handler is the interrupt those sections mask.

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

use crate::fsm::State;
use crate::ports::Tick;

pub struct ButtonState {
    state: AtomicU8,
    interrupt_timestamp: AtomicU32,
    loop_timestamp: AtomicU32,
    push_count: AtomicU8,
    initialized: AtomicBool,
}

/// A consistent copy of every field, taken under the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// `None` if the tag is corrupt; see `raw_state`.
    pub state: Option<State>,
    pub raw_state: u8,
    pub push_count: u8,
    pub interrupt_timestamp: Tick,
    pub loop_timestamp: Tick,
    pub initialized: bool,
}

impl Default for ButtonState {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonState {
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(State::WaitForInterrupt as u8),
            interrupt_timestamp: AtomicU32::new(0),
            loop_timestamp: AtomicU32::new(0),
            push_count: AtomicU8::new(0),
            initialized: AtomicBool::new(false),
        }
    }

    // ── Interrupt side ────────────────────────────────────────

    /// Edge-interrupt transition.  Call from the wired EXTI handler.
    ///
    /// Arms a press cycle if the button is idle or inside a repeat window;
    /// any other state ignores the edge (bounce and re-entrancy filter).
    /// O(1), never blocks, never calls back.  Returns whether a cycle was
    /// armed.
    pub fn on_edge(&self, now: Tick) -> bool {
        let accepts = State::from_raw(self.state.load(Ordering::Acquire))
            .is_some_and(State::accepts_edge);
        if accepts {
            self.interrupt_timestamp.store(now, Ordering::Relaxed);
            self.state.store(State::PushDelay as u8, Ordering::Release);
        }
        accepts
    }

    // ── Readers ───────────────────────────────────────────────

    /// Current state, or `None` if the tag is corrupt.
    pub fn state(&self) -> Option<State> {
        State::from_raw(self.raw_state())
    }

    pub fn raw_state(&self) -> u8 {
        self.state.load(Ordering::Acquire)
    }

    pub fn push_count(&self) -> u8 {
        self.push_count.load(Ordering::Relaxed)
    }

    pub fn interrupt_timestamp(&self) -> Tick {
        self.interrupt_timestamp.load(Ordering::Acquire)
    }

    pub fn loop_timestamp(&self) -> Tick {
        self.loop_timestamp.load(Ordering::Relaxed)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Copy every field.  Consistent only when taken under the guard.
    pub fn snapshot(&self) -> Snapshot {
        let raw_state = self.raw_state();
        Snapshot {
            state: State::from_raw(raw_state),
            raw_state,
            push_count: self.push_count(),
            interrupt_timestamp: self.interrupt_timestamp(),
            loop_timestamp: self.loop_timestamp(),
            initialized: self.is_initialized(),
        }
    }

    // ── Poll side (guard held) ────────────────────────────────

    pub(crate) fn set_state(&self, state: State) {
        self.state.store(state as u8, Ordering::Release);
    }

    pub(crate) fn set_push_count(&self, count: u8) {
        self.push_count.store(count, Ordering::Relaxed);
    }

    pub(crate) fn set_loop_timestamp(&self, now: Tick) {
        self.loop_timestamp.store(now, Ordering::Relaxed);
    }

    /// Claim the slot for a first initialisation.  Returns `false` if it
    /// was already initialised (nothing is touched in that case).
    pub(crate) fn initialize(&self) -> bool {
        if self.is_initialized() {
            return false;
        }
        self.set_push_count(0);
        self.set_loop_timestamp(0);
        self.interrupt_timestamp.store(0, Ordering::Relaxed);
        self.set_state(State::WaitForInterrupt);
        self.initialized.store(true, Ordering::Release);
        true
    }

    /// Dispatch committed: clear the count and start the cool-down.
    pub(crate) fn finalize(&self, now: Tick) {
        self.set_push_count(0);
        self.set_loop_timestamp(now);
        self.set_state(State::CoolDown);
    }

    /// Drop the in-progress gesture and return to idle.
    pub(crate) fn abandon_cycle(&self) {
        self.set_push_count(0);
        self.set_state(State::WaitForInterrupt);
    }

    #[cfg(test)]
    pub(crate) fn store_raw_state(&self, raw: u8) {
        self.state.store(raw, Ordering::Release);
    }
}
