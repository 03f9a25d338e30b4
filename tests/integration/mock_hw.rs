//! Mock hardware for integration tests.
//!
//! A settable tick counter, a switch whose level the test controls, and a
//! handler that records every gesture so tests can assert on the full
//! history without real GPIO or timers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use edgeclick::button::{Button, ButtonId};
use edgeclick::events::{Gesture, GestureEvent};
use edgeclick::guard::Guard;
use edgeclick::pins::{Level, PinDescriptor};
use edgeclick::ports::{GestureHandler, Tick, TickSource};
use embedded_hal::digital::{ErrorKind, ErrorType, InputPin};

// ── Clock ─────────────────────────────────────────────────────

/// Tick counter advanced by the test.  `Sync`, so an "interrupt" thread
/// can read it too.
#[derive(Default)]
pub struct MockClock(AtomicU32);

#[allow(dead_code)]
impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(t: Tick) -> Self {
        Self(AtomicU32::new(t))
    }

    pub fn set(&self, t: Tick) {
        self.0.store(t, Ordering::SeqCst);
    }

    pub fn advance(&self, dt: Tick) {
        self.set(self.now().wrapping_add(dt));
    }
}

impl TickSource for MockClock {
    fn now(&self) -> Tick {
        self.0.load(Ordering::SeqCst)
    }
}

// ── Switch ────────────────────────────────────────────────────

/// The pin half, owned by the button.
pub struct MockPin {
    high: Arc<AtomicBool>,
    failing: Arc<AtomicBool>,
}

/// The test half: presses and releases the switch.
#[derive(Clone)]
pub struct PinControl {
    high: Arc<AtomicBool>,
    failing: Arc<AtomicBool>,
    idle: Level,
}

/// A released switch wired the way `descriptor` says.
pub fn mock_pin(descriptor: &PinDescriptor) -> (MockPin, PinControl) {
    let idle = descriptor.idle_level();
    let high = Arc::new(AtomicBool::new(idle == Level::High));
    let failing = Arc::new(AtomicBool::new(false));
    (
        MockPin {
            high: Arc::clone(&high),
            failing: Arc::clone(&failing),
        },
        PinControl {
            high,
            failing,
            idle,
        },
    )
}

#[allow(dead_code)]
impl PinControl {
    pub fn press(&self) {
        self.high.store(self.idle == Level::Low, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.high.store(self.idle == Level::High, Ordering::SeqCst);
    }

    pub fn is_pressed(&self) -> bool {
        self.high.load(Ordering::SeqCst) != (self.idle == Level::High)
    }

    /// Make every read fail until cleared.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl ErrorType for MockPin {
    type Error = ErrorKind;
}

impl InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, ErrorKind> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ErrorKind::Other);
        }
        Ok(self.high.load(Ordering::SeqCst))
    }

    fn is_low(&mut self) -> Result<bool, ErrorKind> {
        self.is_high().map(|h| !h)
    }
}

// ── Recording handler ─────────────────────────────────────────

#[derive(Default)]
pub struct Recorder {
    pub events: Vec<GestureEvent>,
}

#[allow(dead_code)]
impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gestures_of(&self, button: ButtonId) -> Vec<Gesture> {
        self.events
            .iter()
            .filter(|e| e.button == button)
            .map(|e| e.gesture)
            .collect()
    }

    pub fn gestures(&self) -> Vec<Gesture> {
        self.events.iter().map(|e| e.gesture).collect()
    }

    pub fn shorts(&self) -> usize {
        self.count(|g| matches!(g, Gesture::ShortPush))
    }

    pub fn longs(&self) -> usize {
        self.count(|g| matches!(g, Gesture::LongPush { .. }))
    }

    pub fn repeat_counts(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|e| match e.gesture {
                Gesture::RepeatPush { count } => Some(count),
                _ => None,
            })
            .collect()
    }

    pub fn combinations(&self) -> usize {
        self.count(|g| matches!(g, Gesture::Combination { .. }))
    }

    fn count(&self, pred: impl Fn(&Gesture) -> bool) -> usize {
        self.events.iter().filter(|e| pred(&e.gesture)).count()
    }
}

impl GestureHandler for Recorder {
    fn on_short_push(&mut self, button: ButtonId) {
        self.events.push(GestureEvent {
            button,
            gesture: Gesture::ShortPush,
        });
    }

    fn on_long_push(&mut self, button: ButtonId, held: Option<Tick>) {
        self.events.push(GestureEvent {
            button,
            gesture: Gesture::LongPush { held },
        });
    }

    fn on_repeat_push(&mut self, button: ButtonId, count: u8) {
        self.events.push(GestureEvent {
            button,
            gesture: Gesture::RepeatPush { count },
        });
    }

    fn on_combination(&mut self, button: ButtonId, predecessor: ButtonId) {
        self.events.push(GestureEvent {
            button,
            gesture: Gesture::Combination { predecessor },
        });
    }
}

// ── Drivers ───────────────────────────────────────────────────

pub type MockButton<'a, G> = Button<'a, MockPin, MockClock, G>;

/// Press the switch and fire the edge interrupt.
#[allow(dead_code)]
pub fn press<G: Guard>(button: &MockButton<'_, G>, pin: &PinControl) {
    pin.press();
    button.on_interrupt();
}

/// `true` while `now` has not yet reached `until`.  Measured as a signed
/// distance, so a target on the far side of the counter wrap still counts
/// as ahead.
fn before(now: Tick, until: Tick) -> bool {
    (until.wrapping_sub(now) as i32) > 0
}

/// Advance one tick at a time, polling after every step, until the clock
/// reads `until`.
#[allow(dead_code)]
pub fn poll_until<G: Guard, H: GestureHandler>(
    button: &mut MockButton<'_, G>,
    clock: &MockClock,
    handler: &mut H,
    until: Tick,
) {
    while before(clock.now(), until) {
        clock.advance(1);
        button.poll(handler);
    }
}

/// Same as [`poll_until`] for two buttons sharing one clock.
#[allow(dead_code)]
pub fn poll_pair_until<G: Guard, H: GestureHandler>(
    a: &mut MockButton<'_, G>,
    b: &mut MockButton<'_, G>,
    clock: &MockClock,
    handler: &mut H,
    until: Tick,
) {
    while before(clock.now(), until) {
        clock.advance(1);
        a.poll(handler);
        b.poll(handler);
    }
}

/// One click: press, hold for `hold` ticks, release, then keep polling
/// for `gap` ticks.
#[allow(dead_code)]
pub fn click<G: Guard, H: GestureHandler>(
    button: &mut MockButton<'_, G>,
    pin: &PinControl,
    clock: &MockClock,
    handler: &mut H,
    hold: Tick,
    gap: Tick,
) {
    let start = clock.now();
    press(button, pin);
    poll_until(button, clock, handler, start.wrapping_add(hold));
    pin.release();
    poll_until(button, clock, handler, start.wrapping_add(hold + gap));
}
