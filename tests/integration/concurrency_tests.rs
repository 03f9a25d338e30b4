//! Interrupt/poller interleavings.
//!
//! An instrumented guard lets a test land an edge at an exact point of the
//! poll cycle (between the scoped section and the repeat-window section)
//! and observe which sections are held when user code runs.  A threaded
//! stress test then fires edges from a second thread while the poller
//! runs.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use edgeclick::button::{Button, ButtonBank, ButtonId, ButtonState, EdgeHandle};
use edgeclick::config::ButtonConfig;
use edgeclick::events::Gesture;
use edgeclick::fsm::State;
use edgeclick::guard::{CriticalSectionGuard, Guard};
use edgeclick::pins::{PinDescriptor, Trigger};
use edgeclick::ports::{GestureHandler, Tick, TickSource};

use super::mock_hw::{MockClock, Recorder, click, mock_pin, poll_until};

const ID: ButtonId = ButtonId::new(0);
const KEY: PinDescriptor = PinDescriptor::new("key", 5, Trigger::Falling);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Scoped,
    Always,
}

/// Guard that records every section and can inject one edge right before
/// the next `always` section is entered.
#[derive(Clone)]
struct BoundaryGuard<'a> {
    cell: &'a ButtonState,
    clock: &'a MockClock,
    inject_edge: Rc<Cell<bool>>,
    sections: Rc<RefCell<Vec<Section>>>,
    scoped_depth: Rc<Cell<u32>>,
    depth_at_always: Rc<RefCell<Vec<u32>>>,
}

impl<'a> BoundaryGuard<'a> {
    fn new(cell: &'a ButtonState, clock: &'a MockClock) -> Self {
        Self {
            cell,
            clock,
            inject_edge: Rc::new(Cell::new(false)),
            sections: Rc::default(),
            scoped_depth: Rc::new(Cell::new(0)),
            depth_at_always: Rc::default(),
        }
    }
}

impl Guard for BoundaryGuard<'_> {
    fn scoped<R>(&self, f: impl FnOnce() -> R) -> R {
        self.sections.borrow_mut().push(Section::Scoped);
        self.scoped_depth.set(self.scoped_depth.get() + 1);
        let r = critical_section::with(|_| f());
        self.scoped_depth.set(self.scoped_depth.get() - 1);
        r
    }

    fn always<R>(&self, f: impl FnOnce() -> R) -> R {
        if self.inject_edge.replace(false) {
            self.cell.on_edge(self.clock.now());
        }
        self.sections.borrow_mut().push(Section::Always);
        self.depth_at_always.borrow_mut().push(self.scoped_depth.get());
        critical_section::with(|_| f())
    }
}

#[test]
fn edge_at_repeat_window_boundary_wins() {
    let bank: ButtonBank<1> = ButtonBank::new();
    let clock = MockClock::new();
    let (pin, ctl) = mock_pin(&KEY);
    let guard = BoundaryGuard::new(&bank[0], &clock);
    let mut button = Button::init_with_guard(
        &bank,
        ID,
        pin,
        KEY,
        &clock,
        &ButtonConfig::default(),
        guard.clone(),
    )
    .unwrap();
    let mut rec = Recorder::new();

    // Release confirmed at 102; the window is still open at 402.
    click(&mut button, &ctl, &clock, &mut rec, 60, 120);
    poll_until(&mut button, &clock, &mut rec, 402);
    assert_eq!(button.state(), Some(State::WaitForRepeat));

    // At 403 the window has expired, but a second press lands after the
    // scoped section and before the repeat check.
    ctl.press();
    guard.inject_edge.set(true);
    clock.set(403);
    button.poll(&mut rec);

    let snap = button.snapshot();
    assert_eq!(snap.state, Some(State::PushDelay));
    assert_eq!(snap.push_count, 1);
    assert_eq!(snap.interrupt_timestamp, 403);
    assert!(rec.events.is_empty());

    // The second press completes a double click.
    poll_until(&mut button, &clock, &mut rec, 463);
    ctl.release();
    poll_until(&mut button, &clock, &mut rec, 1_000);
    assert_eq!(rec.gestures(), vec![Gesture::RepeatPush { count: 2 }]);
}

#[test]
fn repeat_check_runs_in_its_own_section() {
    let bank: ButtonBank<1> = ButtonBank::new();
    let clock = MockClock::new();
    let (pin, ctl) = mock_pin(&KEY);
    let guard = BoundaryGuard::new(&bank[0], &clock);
    let mut button = Button::init_with_guard(
        &bank,
        ID,
        pin,
        KEY,
        &clock,
        &ButtonConfig::default(),
        guard.clone(),
    )
    .unwrap();
    let mut rec = Recorder::new();

    click(&mut button, &ctl, &clock, &mut rec, 60, 120);
    poll_until(&mut button, &clock, &mut rec, 402);

    guard.sections.borrow_mut().clear();
    guard.depth_at_always.borrow_mut().clear();
    clock.set(403);
    button.poll(&mut rec);

    assert_eq!(button.state(), Some(State::SinglePush));
    assert_eq!(*guard.sections.borrow(), vec![Section::Scoped, Section::Always]);
    assert_eq!(*guard.depth_at_always.borrow(), vec![0]);
}

/// Records the scoped-guard depth at every callback.
struct DepthProbe {
    depth: Rc<Cell<u32>>,
    seen: Vec<u32>,
}

impl GestureHandler for DepthProbe {
    fn on_short_push(&mut self, _button: ButtonId) {
        self.seen.push(self.depth.get());
    }

    fn on_long_push(&mut self, _button: ButtonId, _held: Option<Tick>) {
        self.seen.push(self.depth.get());
    }

    fn on_repeat_push(&mut self, _button: ButtonId, _count: u8) {
        self.seen.push(self.depth.get());
    }
}

#[test]
fn callbacks_run_with_no_guard_held() {
    let bank: ButtonBank<1> = ButtonBank::new();
    let clock = MockClock::new();
    let (pin, ctl) = mock_pin(&KEY);
    let guard = BoundaryGuard::new(&bank[0], &clock);
    let mut button = Button::init_with_guard(
        &bank,
        ID,
        pin,
        KEY,
        &clock,
        &ButtonConfig::default(),
        guard.clone(),
    )
    .unwrap();
    let mut probe = DepthProbe {
        depth: Rc::clone(&guard.scoped_depth),
        seen: Vec::new(),
    };

    click(&mut button, &ctl, &clock, &mut probe, 100, 600);
    click(&mut button, &ctl, &clock, &mut probe, 1500, 600);
    click(&mut button, &ctl, &clock, &mut probe, 60, 120);
    click(&mut button, &ctl, &clock, &mut probe, 60, 600);

    assert_eq!(probe.seen, vec![0, 0, 0]);
}

/// Fires the edge interrupt from inside every callback.
struct Reentrant<'a> {
    edge: EdgeHandle<'a, MockClock, CriticalSectionGuard>,
    shorts: u32,
}

impl GestureHandler for Reentrant<'_> {
    fn on_short_push(&mut self, _button: ButtonId) {
        self.shorts += 1;
        self.edge.on_interrupt();
    }
}

#[test]
fn edge_during_callback_does_not_disturb_finalize() {
    let bank: ButtonBank<1> = ButtonBank::new();
    let clock = MockClock::new();
    let (pin, ctl) = mock_pin(&KEY);
    let mut button = Button::init(&bank, ID, pin, KEY, &clock, &ButtonConfig::default()).unwrap();
    let mut handler = Reentrant {
        edge: button.edge_handle(),
        shorts: 0,
    };

    click(&mut button, &ctl, &clock, &mut handler, 100, 600);
    assert_eq!(handler.shorts, 1);
    assert_eq!(button.state(), Some(State::WaitForInterrupt));
    assert_eq!(button.push_count(), 0);
}

#[test]
fn edges_from_another_thread_keep_the_cell_consistent() {
    let bank: ButtonBank<1> = ButtonBank::new();
    let clock = MockClock::new();
    let (pin, ctl) = mock_pin(&KEY);
    let config = ButtonConfig {
        multi_click: true,
        ..ButtonConfig::default()
    };
    let mut button = Button::init(&bank, ID, pin, KEY, &clock, &config).unwrap();
    let edge = button.edge_handle();
    let stop = AtomicBool::new(false);
    let mut rec = Recorder::new();
    let mut violations = 0u32;

    std::thread::scope(|s| {
        let isr_pin = ctl.clone();
        let stop = &stop;
        s.spawn(move || {
            let mut seed: u32 = 0x1234_5678;
            while !stop.load(Ordering::Relaxed) {
                seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                if seed >> 31 == 0 {
                    isr_pin.press();
                    edge.on_interrupt();
                } else {
                    isr_pin.release();
                }
                std::thread::yield_now();
            }
        });

        for _ in 0..50_000 {
            clock.advance(1);
            button.poll(&mut rec);
            let snap = button.snapshot();
            if snap.state.is_none() || snap.push_count > 7 {
                violations += 1;
            }
        }
        stop.store(true, Ordering::Relaxed);
    });

    assert_eq!(violations, 0);
    for count in rec.repeat_counts() {
        assert!((2..=7).contains(&count), "repeat count {count}");
    }

    ctl.release();
    let end = clock.now() + 2_000;
    poll_until(&mut button, &clock, &mut rec, end);
    let snap = button.snapshot();
    assert_eq!(snap.state, Some(State::WaitForInterrupt));
    assert_eq!(snap.push_count, 0);
}
