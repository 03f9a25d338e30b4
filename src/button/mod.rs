//! Interrupt-armed, poll-classified button.
//!
//! ## Contexts
//!
//! | Context   | Entry point                     | Does                              |
//! |-----------|---------------------------------|-----------------------------------|
//! | interrupt | [`EdgeHandle::on_interrupt`]    | stamps the edge, arms PushDelay   |
//! | main loop | [`Button::poll`]                | one state transition per call     |
//!
//! Both share one [`ButtonState`] slot in a [`ButtonBank`].  The poller owns
//! the pin and the thresholds; the interrupt side only needs the slot, the
//! tick source and the guard, so it gets a small `Copy`-able handle.
//!
//! ## Poll cycle
//!
//! 1. Scoped guard: sample tick and pin, run the state handler, commit the
//!    returned transition.
//! 2. Repeat window only: always guard, re-check and maybe finalize.
//! 3. Gesture only: deliver to the handler with no guard held, then take
//!    the scoped guard again to commit CoolDown.
//! 4. Faults: trap or recover per [`FaultPolicy`].

mod bank;
mod state;

pub use bank::{ButtonBank, ButtonId};
pub use state::{ButtonState, Snapshot};

use embedded_hal::digital::{Error as _, ErrorKind, InputPin};
use log::{debug, error, info, trace, warn};

use crate::combination::CombinationLink;
use crate::config::{ButtonConfig, FaultPolicy, Options, ThresholdOverrides, Thresholds};
use crate::error::{ButtonFault, Error, Result};
use crate::fsm::context::{PollContext, Predecessor};
use crate::fsm::{State, Step, raw_name, states};
use crate::guard::{CriticalSectionGuard, Guard};
use crate::pins::{Level, PinDescriptor};
use crate::ports::{GestureHandler, TickSource};

/// Permissive-mode recoveries seen by one button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaultCounters {
    /// Presses forced back to idle after the stuck-press ceiling.
    pub stuck_resets: u32,
    /// Poll cycles skipped because the state tag was corrupt.
    pub corrupt_polls: u32,
    /// Poll cycles that could not read the pin.
    pub pin_read_errors: u32,
}

// ═══════════════════════════════════════════════════════════════════════════
//  Poll side
// ═══════════════════════════════════════════════════════════════════════════

pub struct Button<'a, P, C, G = CriticalSectionGuard> {
    id: ButtonId,
    cell: &'a ButtonState,
    bank: &'a [ButtonState],
    pin: P,
    descriptor: PinDescriptor,
    clock: &'a C,
    config: ButtonConfig,
    thresholds: Thresholds,
    options: Options,
    link: Option<CombinationLink>,
    guard: G,
    faults: FaultCounters,
}

impl<'a, P, C> Button<'a, P, C, CriticalSectionGuard>
where
    P: InputPin,
    C: TickSource,
{
    /// Initialise slot `id` of `bank` and take ownership of its pin.
    ///
    /// Fails with `Error::Config` for an invalid config, with
    /// `Error::UnknownButton` if `id` is outside the bank, and with
    /// `Error::Fault(Reinitialized)` if the slot was already initialised
    /// (permissive policy; the strict policy traps instead).
    pub fn init(
        bank: &'a [ButtonState],
        id: ButtonId,
        pin: P,
        descriptor: PinDescriptor,
        clock: &'a C,
        config: &ButtonConfig,
    ) -> Result<Self> {
        Self::init_with_guard(bank, id, pin, descriptor, clock, config, CriticalSectionGuard)
    }
}

impl<'a, P, C, G> Button<'a, P, C, G>
where
    P: InputPin,
    C: TickSource,
    G: Guard,
{
    /// [`Button::init`] with an explicit guard.
    pub fn init_with_guard(
        bank: &'a [ButtonState],
        id: ButtonId,
        pin: P,
        descriptor: PinDescriptor,
        clock: &'a C,
        config: &ButtonConfig,
        guard: G,
    ) -> Result<Self> {
        config.validate()?;
        let thresholds = config.thresholds()?;
        let options = config.options();
        let cell = bank.get(id.index()).ok_or(Error::UnknownButton(id))?;

        if !guard.scoped(|| cell.initialize()) {
            let fault = ButtonFault::Reinitialized;
            if options.fault_policy == FaultPolicy::Strict {
                error!("button {} ({}): {}", id, descriptor.label(), fault);
                panic!("button {} ({}): {}", id, descriptor.label(), fault);
            }
            warn!(
                "button {} ({}): {}, second init ignored",
                id,
                descriptor.label(),
                fault
            );
            return Err(fault.into());
        }

        info!(
            "button {} ({}) on line {}, {:?} edge, {} Hz ticks",
            id,
            descriptor.label(),
            descriptor.line(),
            descriptor.trigger(),
            config.tick_hz
        );

        Ok(Self {
            id,
            cell,
            bank,
            pin,
            descriptor,
            clock,
            config: *config,
            thresholds,
            options,
            link: None,
            guard,
            faults: FaultCounters::default(),
        })
    }

    /// Run at most one state transition.  Call every main-loop iteration.
    ///
    /// Gestures are delivered to `handler` with no guard held.
    pub fn poll<H: GestureHandler + ?Sized>(&mut self, handler: &mut H) {
        let id = self.id;
        let cell = self.cell;
        let clock = self.clock;
        let thresholds = self.thresholds;
        let options = self.options;
        let idle = self.descriptor.idle_level();
        let predecessor = if handler.handles_combination() {
            self.predecessor()
        } else {
            None
        };
        let pin = &mut self.pin;
        let mut read_error: Option<ErrorKind> = None;

        let (from, step) = self.guard.scoped(|| {
            let now = clock.now();
            let level = match pin.is_high() {
                Ok(high) => Some(Level::from(high)),
                Err(e) => {
                    read_error = Some(e.kind());
                    None
                }
            };
            let ctx = PollContext {
                id,
                cell,
                now,
                level,
                idle,
                thresholds,
                options,
                predecessor,
            };

            let from = cell.raw_state();
            let step = states::dispatch(&ctx);
            match step {
                Step::Enter(next) => cell.set_state(next),
                Step::Fault(ButtonFault::StuckInput)
                    if options.fault_policy == FaultPolicy::Permissive =>
                {
                    cell.abandon_cycle();
                }
                _ => {}
            }
            (from, step)
        });

        if let Some(kind) = read_error {
            self.faults.pin_read_errors = self.faults.pin_read_errors.saturating_add(1);
            warn!("button {}: pin read failed: {:?}", id, kind);
        }

        match step {
            Step::Stay => {}
            Step::Enter(next) => {
                debug!("button {}: {} -> {}", id, raw_name(from), next.name());
            }
            Step::RepeatWindow => {
                let closed = self.guard.always(|| {
                    states::close_repeat_window(cell, clock.now(), &thresholds, options)
                });
                if let Some(next) = closed {
                    debug!(
                        "button {}: {} -> {}",
                        id,
                        State::WaitForRepeat.name(),
                        next.name()
                    );
                }
            }
            Step::Dispatch(gesture) => {
                debug!("button {}: {:?}", id, gesture);
                gesture.deliver(id, handler);
                self.guard.scoped(|| cell.finalize(clock.now()));
                debug!(
                    "button {}: {} -> {}",
                    id,
                    raw_name(from),
                    State::CoolDown.name()
                );
            }
            Step::Fault(fault) => self.on_fault(fault),
        }
    }

    fn on_fault(&mut self, fault: ButtonFault) {
        if self.options.fault_policy == FaultPolicy::Strict {
            error!("button {}: {}", self.id, fault);
            panic!("button {}: {}", self.id, fault);
        }

        match fault {
            ButtonFault::StuckInput => {
                self.faults.stuck_resets = self.faults.stuck_resets.saturating_add(1);
                warn!("button {}: {}, forced back to idle", self.id, fault);
            }
            ButtonFault::CorruptState(_) => {
                // Fires every poll until reset; keep it quiet.
                self.faults.corrupt_polls = self.faults.corrupt_polls.saturating_add(1);
                trace!("button {}: {}, cycle skipped", self.id, fault);
            }
            ButtonFault::Reinitialized => {}
        }
    }

    /// Interrupt-side entry point.  Same as calling
    /// [`EdgeHandle::on_interrupt`] on this button's handle.
    pub fn on_interrupt(&self) {
        arm(self.cell, self.clock, &self.guard);
    }

    // ── Combination ──────────────────────────────────────────────

    /// Make `predecessor` the button that must be held for a chord.
    pub fn link_combination(&mut self, predecessor: ButtonId) -> Result<()> {
        if !self.options.combination {
            return Err(Error::Config("combination support is disabled"));
        }
        if predecessor == self.id {
            return Err(Error::Config("a button cannot chord with itself"));
        }
        if self.bank.get(predecessor.index()).is_none() {
            return Err(Error::UnknownButton(predecessor));
        }
        self.link = Some(CombinationLink::new(predecessor));
        info!("button {}: chorded after button {}", self.id, predecessor);
        Ok(())
    }

    pub fn unlink_combination(&mut self) -> Option<CombinationLink> {
        self.link.take()
    }

    fn predecessor(&self) -> Option<Predecessor<'a>> {
        if !self.options.combination {
            return None;
        }
        let id = self.link?.predecessor();
        let cell = self.bank.get(id.index())?;
        Some(Predecessor { id, cell })
    }

    // ── Thresholds ───────────────────────────────────────────────

    /// Replace this button's long-push, repeat-window or cool-down
    /// threshold.  Takes effect from the next poll.
    pub fn override_thresholds(&mut self, overrides: &ThresholdOverrides) -> Result<()> {
        if !self.options.per_instance_thresholds {
            return Err(Error::Config("per-instance thresholds are disabled"));
        }
        self.thresholds = self.thresholds.with_overrides(&self.config, overrides)?;
        debug!("button {}: thresholds now {:?}", self.id, self.thresholds);
        Ok(())
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn id(&self) -> ButtonId {
        self.id
    }

    pub fn descriptor(&self) -> &PinDescriptor {
        &self.descriptor
    }

    pub fn state(&self) -> Option<State> {
        self.cell.state()
    }

    pub fn push_count(&self) -> u8 {
        self.cell.push_count()
    }

    /// Consistent copy of the shared cell.
    pub fn snapshot(&self) -> Snapshot {
        self.guard.scoped(|| self.cell.snapshot())
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn options(&self) -> Options {
        self.options
    }

    pub fn link(&self) -> Option<CombinationLink> {
        self.link
    }

    pub fn faults(&self) -> FaultCounters {
        self.faults
    }

    /// Give the pin back; the slot stays initialised.
    pub fn into_pin(self) -> P {
        self.pin
    }
}

impl<'a, P, C, G> Button<'a, P, C, G>
where
    P: InputPin,
    C: TickSource,
    G: Guard + Clone,
{
    /// Handle for the edge interrupt handler.
    pub fn edge_handle(&self) -> EdgeHandle<'a, C, G> {
        EdgeHandle {
            cell: self.cell,
            clock: self.clock,
            guard: self.guard.clone(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Interrupt side
// ═══════════════════════════════════════════════════════════════════════════

/// What the edge ISR holds: the shared slot, the tick source and the guard.
pub struct EdgeHandle<'a, C, G = CriticalSectionGuard> {
    cell: &'a ButtonState,
    clock: &'a C,
    guard: G,
}

// Manual impls: derive would demand `C: Clone`.
impl<C, G: Clone> Clone for EdgeHandle<'_, C, G> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell,
            clock: self.clock,
            guard: self.guard.clone(),
        }
    }
}

impl<C, G: Copy> Copy for EdgeHandle<'_, C, G> {}

impl<C: TickSource, G: Guard> EdgeHandle<'_, C, G> {
    /// Call from the wired edge interrupt.  O(1), never logs, never calls
    /// back.
    pub fn on_interrupt(&self) {
        arm(self.cell, self.clock, &self.guard);
    }
}

fn arm<C: TickSource + ?Sized, G: Guard>(cell: &ButtonState, clock: &C, guard: &G) {
    guard.always(|| {
        cell.on_edge(clock.now());
    });
}
