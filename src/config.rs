//! Button timing and feature configuration.
//!
//! All tunable parameters for the gesture engine.  Durations are given in
//! milliseconds and converted once, at initialisation, into ticks of the
//! configured tick source.  The config can be kept in flash as a postcard
//! blob via [`ButtonConfig::to_slice`] / [`ButtonConfig::from_bytes`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ports::Tick;

pub const DEFAULT_TICK_HZ: u32 = 1000;
pub const DEFAULT_PUSH_SETTLE_MS: u32 = 40;
pub const DEFAULT_RELEASE_SETTLE_MS: u32 = 40;
pub const DEFAULT_LONG_PUSH_MIN_MS: u32 = 1000;
pub const DEFAULT_REPEAT_WINDOW_MS: u32 = 300;
pub const DEFAULT_COOL_DOWN_MS: u32 = 0;
pub const DEFAULT_STUCK_PRESS_CEILING_MS: u32 = 60_000;

/// Upper bound on the encoded size of a [`ButtonConfig`] blob.
pub const CONFIG_BLOB_MAX: usize = 64;

/// What the instance does when it detects a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FaultPolicy {
    /// Trap (panic) so the fault is diagnosed during development.
    Strict,
    /// Recover locally and keep the instance live.
    #[default]
    Permissive,
}

/// Shared configuration for every button in a bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonConfig {
    // --- Tick source ---
    /// Rate of the monotonic tick counter.
    pub tick_hz: u32,

    // --- Debounce ---
    /// Time a press must persist after the edge before it is trusted.
    pub push_settle_ms: u32,
    /// Time a release must persist before it is trusted.
    pub release_settle_ms: u32,

    // --- Gesture windows ---
    /// A hold longer than this is reported as a long push.
    pub long_push_min_ms: u32,
    /// Maximum gap between releases still counted as one multi-click.
    pub repeat_window_ms: u32,
    /// Dead time after a gesture is dispatched.
    pub cool_down_ms: u32,

    // --- Safety ---
    /// A press held longer than this is treated as a stuck input.
    pub stuck_press_ceiling_ms: u32,

    // --- Features ---
    /// Allow per-button overrides of long-push, repeat-window and cool-down.
    pub per_instance_thresholds: bool,
    /// Pass the hold duration to the long-push callback.
    pub report_hold_duration: bool,
    /// Count up to 7 clicks instead of stopping at 2.
    pub multi_click: bool,
    /// Enable chorded "hold A, tap B" gestures.
    pub combination: bool,

    pub fault_policy: FaultPolicy,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            tick_hz: DEFAULT_TICK_HZ,

            push_settle_ms: DEFAULT_PUSH_SETTLE_MS,
            release_settle_ms: DEFAULT_RELEASE_SETTLE_MS,

            long_push_min_ms: DEFAULT_LONG_PUSH_MIN_MS,
            repeat_window_ms: DEFAULT_REPEAT_WINDOW_MS,
            cool_down_ms: DEFAULT_COOL_DOWN_MS,

            stuck_press_ceiling_ms: DEFAULT_STUCK_PRESS_CEILING_MS,

            per_instance_thresholds: true,
            report_hold_duration: false,
            multi_click: false,
            combination: false,

            fault_policy: FaultPolicy::Permissive,
        }
    }
}

impl ButtonConfig {
    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.tick_hz == 0 {
            return Err(Error::Config("tick rate must be non-zero"));
        }
        if self.stuck_press_ceiling_ms <= self.long_push_min_ms {
            return Err(Error::Config(
                "stuck-press ceiling must exceed the long-push minimum",
            ));
        }
        if self.stuck_press_ceiling_ms <= self.push_settle_ms {
            return Err(Error::Config(
                "stuck-press ceiling must exceed the push-settle delay",
            ));
        }
        self.thresholds().map(|_| ())
    }

    /// Convert a duration to ticks of this config's tick source.
    pub fn ms_to_ticks(&self, ms: u32) -> Result<Tick> {
        let ticks = u64::from(ms) * u64::from(self.tick_hz) / 1000;
        Tick::try_from(ticks).map_err(|_| Error::Config("duration overflows the tick counter"))
    }

    /// Shared thresholds in ticks.
    pub fn thresholds(&self) -> Result<Thresholds> {
        Ok(Thresholds {
            push_settle: self.ms_to_ticks(self.push_settle_ms)?,
            release_settle: self.ms_to_ticks(self.release_settle_ms)?,
            long_push_min: self.ms_to_ticks(self.long_push_min_ms)?,
            repeat_window: self.ms_to_ticks(self.repeat_window_ms)?,
            cool_down: self.ms_to_ticks(self.cool_down_ms)?,
            stuck_ceiling: self.ms_to_ticks(self.stuck_press_ceiling_ms)?,
        })
    }

    /// Runtime feature switches.
    pub fn options(&self) -> Options {
        Options {
            per_instance_thresholds: self.per_instance_thresholds,
            report_hold_duration: self.report_hold_duration,
            multi_click: self.multi_click,
            combination: self.combination,
            fault_policy: self.fault_policy,
        }
    }

    /// Encode into `buf` as a postcard blob.
    pub fn to_slice<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8]> {
        Ok(postcard::to_slice(self, buf)?)
    }

    /// Decode and validate a postcard blob.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let config: Self = postcard::from_bytes(bytes)?;
        config.validate()?;
        Ok(config)
    }
}

/// Timing thresholds in ticks, resolved once per button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub push_settle: Tick,
    pub release_settle: Tick,
    pub long_push_min: Tick,
    pub repeat_window: Tick,
    pub cool_down: Tick,
    pub stuck_ceiling: Tick,
}

impl Thresholds {
    /// Apply per-instance overrides on top of the shared values.
    pub fn with_overrides(mut self, config: &ButtonConfig, o: &ThresholdOverrides) -> Result<Self> {
        if let Some(ms) = o.long_push_min_ms {
            self.long_push_min = config.ms_to_ticks(ms)?;
            if self.long_push_min >= self.stuck_ceiling {
                return Err(Error::Config(
                    "long-push override must stay below the stuck-press ceiling",
                ));
            }
        }
        if let Some(ms) = o.repeat_window_ms {
            self.repeat_window = config.ms_to_ticks(ms)?;
        }
        if let Some(ms) = o.cool_down_ms {
            self.cool_down = config.ms_to_ticks(ms)?;
        }
        Ok(self)
    }
}

/// Per-button overrides of the three tunable thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThresholdOverrides {
    pub long_push_min_ms: Option<u32>,
    pub repeat_window_ms: Option<u32>,
    pub cool_down_ms: Option<u32>,
}

/// Feature switches copied into each button at initialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub per_instance_thresholds: bool,
    pub report_hold_duration: bool,
    pub multi_click: bool,
    pub combination: bool,
    pub fault_policy: FaultPolicy,
}
