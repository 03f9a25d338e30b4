//! Classified gestures and a fixed-capacity gesture queue.
//!
//! Gestures are produced by the poll-side classifier and handed to a
//! [`GestureHandler`].  Firmware that prefers to act on gestures later
//! (outside the poll call) can use [`GestureQueue`] as the handler and
//! drain it from its main loop.
//!
//! ```text
//! ┌─────────────┐     ┌───────────────┐     ┌──────────────┐
//! │ Button A    │────▶│               │     │              │
//! │ Button B    │────▶│ GestureQueue  │────▶│  Main Loop   │
//! │ ...         │────▶│ (heapless)    │     │  (consumer)  │
//! └─────────────┘     └───────────────┘     └──────────────┘
//! ```

use heapless::spsc::Queue;
use log::warn;

use crate::button::ButtonId;
use crate::ports::{GestureHandler, Tick};

/// A finalized gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Single press shorter than the long-push minimum.
    ShortPush,
    /// Single press longer than the long-push minimum.
    LongPush { held: Option<Tick> },
    /// `count` presses inside the repeat window.
    RepeatPush { count: u8 },
    /// Tapped while `predecessor` was held.
    Combination { predecessor: ButtonId },
}

impl Gesture {
    /// Invoke the matching callback on `handler`.
    pub fn deliver<H: GestureHandler + ?Sized>(self, button: ButtonId, handler: &mut H) {
        match self {
            Self::ShortPush => handler.on_short_push(button),
            Self::LongPush { held } => handler.on_long_push(button, held),
            Self::RepeatPush { count } => handler.on_repeat_push(button, count),
            Self::Combination { predecessor } => handler.on_combination(button, predecessor),
        }
    }
}

/// A gesture tagged with the button that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureEvent {
    pub button: ButtonId,
    pub gesture: Gesture,
}

// ── Fixed-capacity queue ──────────────────────────────────────
//
// Holds up to `N - 1` events.  When full, new events are dropped and
// counted; the oldest pending gestures are kept.

pub struct GestureQueue<const N: usize> {
    queue: Queue<GestureEvent, N>,
    dropped: u32,
}

impl<const N: usize> Default for GestureQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> GestureQueue<N> {
    pub const fn new() -> Self {
        Self {
            queue: Queue::new(),
            dropped: 0,
        }
    }

    /// Queue one event.  Returns `false` if the queue is full (event dropped).
    pub fn push(&mut self, event: GestureEvent) -> bool {
        if self.queue.enqueue(event).is_err() {
            self.dropped = self.dropped.saturating_add(1);
            warn!(
                "gesture queue full, dropped {:?} from button {}",
                event.gesture, event.button
            );
            return false;
        }
        true
    }

    /// Pop the oldest pending event.
    pub fn pop(&mut self) -> Option<GestureEvent> {
        self.queue.dequeue()
    }

    /// Drain all pending events into a callback, in FIFO order.
    pub fn drain(&mut self, mut handler: impl FnMut(GestureEvent)) {
        while let Some(event) = self.pop() {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of events dropped because the queue was full.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl<const N: usize> GestureHandler for GestureQueue<N> {
    fn on_short_push(&mut self, button: ButtonId) {
        self.push(GestureEvent {
            button,
            gesture: Gesture::ShortPush,
        });
    }

    fn on_long_push(&mut self, button: ButtonId, held: Option<Tick>) {
        self.push(GestureEvent {
            button,
            gesture: Gesture::LongPush { held },
        });
    }

    fn on_repeat_push(&mut self, button: ButtonId, count: u8) {
        self.push(GestureEvent {
            button,
            gesture: Gesture::RepeatPush { count },
        });
    }

    fn on_combination(&mut self, button: ButtonId, predecessor: ButtonId) {
        self.push(GestureEvent {
            button,
            gesture: Gesture::Combination { predecessor },
        });
    }
}
