//! Log-based gesture sink.
//!
//! Implements [`GestureHandler`] by writing every gesture to the `log`
//! facade (serial console on firmware, stderr logger on host).  Handy as
//! a default handler during bring-up.

use log::info;

use crate::button::ButtonId;
use crate::ports::{GestureHandler, Tick};

/// Handler that logs every gesture.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogGestureSink;

impl LogGestureSink {
    pub fn new() -> Self {
        Self
    }
}

impl GestureHandler for LogGestureSink {
    fn on_short_push(&mut self, button: ButtonId) {
        info!("GESTURE | button={} | short", button);
    }

    fn on_long_push(&mut self, button: ButtonId, held: Option<Tick>) {
        match held {
            Some(ticks) => info!("GESTURE | button={} | long held={}t", button, ticks),
            None => info!("GESTURE | button={} | long", button),
        }
    }

    fn on_repeat_push(&mut self, button: ButtonId, count: u8) {
        info!("GESTURE | button={} | repeat x{}", button, count);
    }

    fn on_combination(&mut self, button: ButtonId, predecessor: ButtonId) {
        info!("GESTURE | button={} | chord after {}", button, predecessor);
    }
}
