//! Port traits: the boundary between the gesture engine and the firmware.
//!
//! ```text
//!   TickSource ──▶ ┌──────────────┐ ──▶ GestureHandler
//!   InputPin   ──▶ │    Button    │      (callbacks, queue, log)
//!   Edge ISR   ──▶ └──────────────┘
//! ```
//!
//! The pin reader is `embedded_hal::digital::InputPin`; the tick source
//! and the callback set are defined here.

use crate::button::ButtonId;

/// One unit of the monotonic counter driving all timing.
pub type Tick = u32;

/// `true` once more than `threshold` ticks have passed since `since`.
///
/// Wraparound-tolerant across one counter wrap.  This is the only time
/// comparison the state machine uses.
#[inline]
pub const fn exceeded(now: Tick, since: Tick, threshold: Tick) -> bool {
    now.wrapping_sub(since) > threshold
}

// ───────────────────────────────────────────────────────────────
// Tick source
// ───────────────────────────────────────────────────────────────

/// Free-running monotonic counter at a fixed, known rate.
pub trait TickSource {
    fn now(&self) -> Tick;
}

impl<T: TickSource + ?Sized> TickSource for &T {
    fn now(&self) -> Tick {
        (**self).now()
    }
}

// ───────────────────────────────────────────────────────────────
// Gesture callbacks
// ───────────────────────────────────────────────────────────────

/// Receives classified gestures.
///
/// Every method has an empty default, so an implementation only
/// overrides the gestures it cares about; the rest are skipped silently.
/// Callbacks run with the button's guard released.
pub trait GestureHandler {
    /// A single press released before the long-push minimum.
    fn on_short_push(&mut self, _button: ButtonId) {}

    /// A single press held past the long-push minimum.  `held` carries
    /// the hold duration in ticks when hold reporting is enabled.
    fn on_long_push(&mut self, _button: ButtonId, _held: Option<Tick>) {}

    /// Two or more presses inside the repeat window.
    fn on_repeat_push(&mut self, _button: ButtonId, _count: u8) {}

    /// This button was tapped while its linked predecessor was held.
    fn on_combination(&mut self, _button: ButtonId, _predecessor: ButtonId) {}

    /// Whether chords are delivered at all.  When `false` a linked button
    /// never claims its predecessor, and both keep their own gestures.
    fn handles_combination(&self) -> bool {
        true
    }
}

impl<H: GestureHandler + ?Sized> GestureHandler for &mut H {
    fn on_short_push(&mut self, button: ButtonId) {
        (**self).on_short_push(button);
    }

    fn on_long_push(&mut self, button: ButtonId, held: Option<Tick>) {
        (**self).on_long_push(button, held);
    }

    fn on_repeat_push(&mut self, button: ButtonId, count: u8) {
        (**self).on_repeat_push(button, count);
    }

    fn on_combination(&mut self, button: ButtonId, predecessor: ButtonId) {
        (**self).on_combination(button, predecessor);
    }

    fn handles_combination(&self) -> bool {
        (**self).handles_combination()
    }
}

/// Plain function-pointer callback slots.  `None` slots are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Callbacks {
    pub short_push: Option<fn()>,
    pub long_push: Option<fn(Option<Tick>)>,
    pub repeat_push: Option<fn(u8)>,
    pub combination: Option<fn()>,
}

impl Callbacks {
    pub const fn new(
        short_push: Option<fn()>,
        long_push: Option<fn(Option<Tick>)>,
        repeat_push: Option<fn(u8)>,
    ) -> Self {
        Self {
            short_push,
            long_push,
            repeat_push,
            combination: None,
        }
    }

    #[must_use]
    pub const fn with_combination(mut self, combination: fn()) -> Self {
        self.combination = Some(combination);
        self
    }
}

impl GestureHandler for Callbacks {
    fn on_short_push(&mut self, _button: ButtonId) {
        if let Some(cb) = self.short_push {
            cb();
        }
    }

    fn on_long_push(&mut self, _button: ButtonId, held: Option<Tick>) {
        if let Some(cb) = self.long_push {
            cb(held);
        }
    }

    fn on_repeat_push(&mut self, _button: ButtonId, count: u8) {
        if let Some(cb) = self.repeat_push {
            cb(count);
        }
    }

    fn on_combination(&mut self, _button: ButtonId, _predecessor: ButtonId) {
        if let Some(cb) = self.combination {
            cb();
        }
    }

    fn handles_combination(&self) -> bool {
        self.combination.is_some()
    }
}
