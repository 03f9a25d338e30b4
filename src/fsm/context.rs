//! Per-poll context threaded through every state handler.
//!
//! Built by the engine inside the scoped guard: the tick and pin level
//! are sampled once, so every handler in a poll sees the same "now".

use crate::button::{ButtonId, ButtonState};
use crate::config::{Options, Thresholds};
use crate::pins::Level;
use crate::ports::{Tick, exceeded};

/// The predecessor side of a combination link, resolved for one poll.
#[derive(Clone, Copy)]
pub struct Predecessor<'s> {
    pub id: ButtonId,
    pub cell: &'s ButtonState,
}

/// Everything a state handler reads; the button cell is the only thing it
/// writes.
pub struct PollContext<'s> {
    pub id: ButtonId,
    pub cell: &'s ButtonState,
    /// Tick sampled at the start of the poll.
    pub now: Tick,
    /// Pin level sampled at the start of the poll; `None` if the read failed.
    pub level: Option<Level>,
    /// Level of the pin while the button is not pressed.
    pub idle: Level,
    pub thresholds: Thresholds,
    pub options: Options,
    /// Linked predecessor, present only when combinations are enabled.
    pub predecessor: Option<Predecessor<'s>>,
}

impl PollContext<'_> {
    /// `Some(true)` if the pin reads idle, `None` if it could not be read.
    pub fn is_idle(&self) -> Option<bool> {
        self.level.map(|l| l == self.idle)
    }

    /// Ticks since the press cycle was armed.
    pub fn since_interrupt(&self) -> Tick {
        self.now.wrapping_sub(self.cell.interrupt_timestamp())
    }

    pub fn interrupt_window_exceeded(&self, threshold: Tick) -> bool {
        exceeded(self.now, self.cell.interrupt_timestamp(), threshold)
    }

    pub fn loop_window_exceeded(&self, threshold: Tick) -> bool {
        exceeded(self.now, self.cell.loop_timestamp(), threshold)
    }
}
