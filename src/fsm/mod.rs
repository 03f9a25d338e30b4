//! Per-button gesture state machine.
//!
//! ```text
//!            edge (ISR)                 settle, pressed
//!  WaitForInterrupt ──▶ PushDelay ─────────────────────▶ WaitForEnd
//!        ▲   ▲              │ settle, idle (glitch)          │ idle
//!        │   └──────────────┤                                ▼
//!        │                  │                          ReleaseDelay
//!        │                  ▼                     settle, idle │ (pressed: back to WaitForEnd)
//!        │            WaitForRepeat ◀──────────────────────────┤
//!        │              │   ▲ edge (ISR) re-arms PushDelay     │ count cap / 2nd push
//!        │       window │                                      ▼
//!        │      expired ▼                                  RepeatPush
//!        │          SinglePush ──┐                             │
//!        │                       ▼                             │
//!        └──── cool-down ──── CoolDown ◀───────────────────────┘
//!
//!  Combination overlay (this button B, predecessor A):
//!    B: ReleaseDelay ──[A held]──▶ CombinationPush ──▶ CoolDown
//!    A: WaitForEnd ──[claimed by B]──▶ CombinationWaitForEnd ──▶ CombinationRelease ──▶ CoolDown
//! ```
//!
//! Each poll performs at most one transition.  Handlers live in
//! [`states`]; the engine that commits their result under the guard is
//! [`Button::poll`](crate::button::Button::poll).

pub mod context;
pub mod states;

use crate::error::ButtonFault;
use crate::events::Gesture;

/// Highest value `push_count` can reach.
pub const MAX_PUSH_COUNT: u8 = 7;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all button states.  Stored as a raw `u8` tag in
/// [`ButtonState`](crate::button::ButtonState).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum State {
    WaitForInterrupt = 0,
    PushDelay = 1,
    WaitForEnd = 2,
    WaitForRepeat = 3,
    SinglePush = 4,
    RepeatPush = 5,
    ReleaseDelay = 6,
    CoolDown = 7,
    CombinationPush = 8,
    CombinationWaitForEnd = 9,
    CombinationRelease = 10,
}

impl State {
    /// Total number of states.
    pub const COUNT: usize = 11;

    /// Decode a raw tag.  `None` means the tag is corrupt.
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::WaitForInterrupt),
            1 => Some(Self::PushDelay),
            2 => Some(Self::WaitForEnd),
            3 => Some(Self::WaitForRepeat),
            4 => Some(Self::SinglePush),
            5 => Some(Self::RepeatPush),
            6 => Some(Self::ReleaseDelay),
            7 => Some(Self::CoolDown),
            8 => Some(Self::CombinationPush),
            9 => Some(Self::CombinationWaitForEnd),
            10 => Some(Self::CombinationRelease),
            _ => None,
        }
    }

    pub const fn raw(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::WaitForInterrupt => "WaitForInterrupt",
            Self::PushDelay => "PushDelay",
            Self::WaitForEnd => "WaitForEnd",
            Self::WaitForRepeat => "WaitForRepeat",
            Self::SinglePush => "SinglePush",
            Self::RepeatPush => "RepeatPush",
            Self::ReleaseDelay => "ReleaseDelay",
            Self::CoolDown => "CoolDown",
            Self::CombinationPush => "CombinationPush",
            Self::CombinationWaitForEnd => "CombinationWaitForEnd",
            Self::CombinationRelease => "CombinationRelease",
        }
    }

    /// States in which an edge may start (or extend) a press cycle.
    pub const fn accepts_edge(self) -> bool {
        matches!(self, Self::WaitForInterrupt | Self::WaitForRepeat)
    }

    /// States belonging to the combination overlay.
    pub const fn is_combination(self) -> bool {
        matches!(
            self,
            Self::CombinationPush | Self::CombinationWaitForEnd | Self::CombinationRelease
        )
    }
}

/// Name of a raw tag, for diagnostics.
pub fn raw_name(raw: u8) -> &'static str {
    State::from_raw(raw).map_or("<corrupt>", State::name)
}

// ---------------------------------------------------------------------------
// Handler result
// ---------------------------------------------------------------------------

/// What one handler invocation asks the engine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Nothing to do this poll.
    Stay,
    /// Commit a transition to the given state.
    Enter(State),
    /// Release the scoped guard and check the repeat window under the
    /// always guard.
    RepeatWindow,
    /// Release the scoped guard, deliver the gesture, then finalize into
    /// CoolDown under a fresh scoped guard.
    Dispatch(Gesture),
    /// A fault was detected; handled per the fault policy.
    Fault(ButtonFault),
}
