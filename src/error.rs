//! Error types for the button gesture engine.
//!
//! A single `Error` enum that every configuration-time operation returns.
//! All variants are `Copy` so they can be passed around without
//! allocation.  Poll and interrupt entry points never return errors; their
//! faults are handled inside the instance according to the configured
//! [`FaultPolicy`](crate::config::FaultPolicy).

use core::fmt;

use crate::button::ButtonId;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration is invalid and was rejected before the instance ran.
    Config(&'static str),
    /// A runtime fault surfaced by a configuration-time call.
    Fault(ButtonFault),
    /// A button id does not name a slot in the bank.
    UnknownButton(ButtonId),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Fault(e) => write!(f, "fault: {e}"),
            Self::UnknownButton(id) => write!(f, "unknown button {id}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Button faults
// ---------------------------------------------------------------------------

/// Faults detected while initialising or polling one button.
///
/// Under `FaultPolicy::Strict` every fault traps; under
/// `FaultPolicy::Permissive` each has a local recovery (see the variants).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonFault {
    /// `init` was called on an already-initialised slot.  Permissive:
    /// the second call is ignored and the slot keeps running.
    Reinitialized,
    /// The state tag holds a value outside the enumeration.  Permissive:
    /// the poll cycle is skipped.
    CorruptState(u8),
    /// A press outlived the stuck-press ceiling.  Permissive: the
    /// instance is forced back to idle and the gesture is lost.
    StuckInput,
}

impl fmt::Display for ButtonFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reinitialized => write!(f, "already initialised"),
            Self::CorruptState(raw) => write!(f, "corrupt state tag {raw}"),
            Self::StuckInput => write!(f, "press held past safety ceiling"),
        }
    }
}

impl From<ButtonFault> for Error {
    fn from(e: ButtonFault) -> Self {
        Self::Fault(e)
    }
}

impl From<postcard::Error> for Error {
    fn from(_: postcard::Error) -> Self {
        Self::Config("config blob could not be encoded or decoded")
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
