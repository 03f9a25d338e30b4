//! Host time adapter.
//!
//! [`HostClock`] implements [`TickSource`] on top of `std::time::Instant`
//! for simulation and host-side testing.  The tick rate is chosen at
//! construction and should match `ButtonConfig::tick_hz`.  The counter
//! wraps at `u32::MAX`, like a hardware tick register.

use std::time::Instant;

use crate::error::{Error, Result};
use crate::ports::{Tick, TickSource};

/// Monotonic tick source backed by the host clock.
pub struct HostClock {
    start: Instant,
    tick_hz: u32,
}

impl Default for HostClock {
    fn default() -> Self {
        Self {
            start: Instant::now(),
            tick_hz: crate::config::DEFAULT_TICK_HZ,
        }
    }
}

impl HostClock {
    pub fn new(tick_hz: u32) -> Result<Self> {
        if tick_hz == 0 {
            return Err(Error::Config("tick rate must be non-zero"));
        }
        Ok(Self {
            start: Instant::now(),
            tick_hz,
        })
    }

    pub fn tick_hz(&self) -> u32 {
        self.tick_hz
    }
}

impl TickSource for HostClock {
    fn now(&self) -> Tick {
        let ticks = self.start.elapsed().as_micros() * u128::from(self.tick_hz) / 1_000_000;
        // Truncation is the wrap.
        ticks as Tick
    }
}
