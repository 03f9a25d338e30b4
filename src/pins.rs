//! Pin descriptors: which input line a button sits on and which edge arms it.
//!
//! GPIO mode, pull resistors and the external-interrupt line routing are
//! set up by the integrator; this module only carries what the gesture
//! engine needs to interpret the pin: the line (for diagnostics and
//! build-time validation) and the trigger polarity, from which the idle
//! level follows.
//!
//! | Trigger  | Wiring                   | Idle level | Pressed level |
//! |----------|--------------------------|------------|---------------|
//! | Rising   | switch to VCC, pull-down | Low        | High          |
//! | Falling  | switch to GND, pull-up   | High       | Low           |

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of external-interrupt lines a descriptor may name (0–15).
pub const LINE_COUNT: u8 = 16;

/// Instantaneous logic level of an input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }
}

/// Edge that arms the debounce sequence.
///
/// Exactly one edge: both-edges and no-edge selections are not
/// representable and are rejected by [`Trigger::from_edges`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    Rising,
    Falling,
}

impl Trigger {
    /// Build a trigger from a raw edge selection.
    pub const fn from_edges(rising: bool, falling: bool) -> Result<Self> {
        match (rising, falling) {
            (true, false) => Ok(Self::Rising),
            (false, true) => Ok(Self::Falling),
            (true, true) => Err(Error::Config("both-edges trigger is not supported")),
            (false, false) => Err(Error::Config("a trigger edge must be selected")),
        }
    }

    /// Level observed while the button is not pressed.
    pub const fn idle_level(self) -> Level {
        match self {
            Self::Rising => Level::Low,
            Self::Falling => Level::High,
        }
    }
}

/// Static description of one physical button input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinDescriptor {
    label: &'static str,
    line: u8,
    trigger: Trigger,
}

impl PinDescriptor {
    /// Describe a button on `line` armed by `trigger`.
    ///
    /// Panics when `line` is outside the supported range; in a `const`
    /// item this is a compile error:
    ///
    /// ```
    /// use edgeclick::pins::{PinDescriptor, Trigger};
    /// const MODE: PinDescriptor = PinDescriptor::new("mode", 4, Trigger::Falling);
    /// ```
    ///
    /// ```compile_fail
    /// use edgeclick::pins::{PinDescriptor, Trigger};
    /// const BAD: PinDescriptor = PinDescriptor::new("bad", 16, Trigger::Falling);
    /// ```
    pub const fn new(label: &'static str, line: u8, trigger: Trigger) -> Self {
        assert!(line < LINE_COUNT, "interrupt line out of range");
        Self {
            label,
            line,
            trigger,
        }
    }

    /// Fallible variant of [`PinDescriptor::new`] for runtime-assembled
    /// descriptors.
    pub const fn try_new(label: &'static str, line: u8, trigger: Trigger) -> Result<Self> {
        if line >= LINE_COUNT {
            return Err(Error::Config("interrupt line out of range"));
        }
        Ok(Self {
            label,
            line,
            trigger,
        })
    }

    pub const fn label(&self) -> &'static str {
        self.label
    }

    pub const fn line(&self) -> u8 {
        self.line
    }

    pub const fn trigger(&self) -> Trigger {
        self.trigger
    }

    pub const fn idle_level(&self) -> Level {
        self.trigger.idle_level()
    }
}
