//! Fuzz target: button state machine
//!
//! Interprets the input as a stream of switch events, spurious edges and
//! time steps for two chorded buttons, and verifies:
//! - No panics (permissive fault policy)
//! - `push_count` never exceeds 7
//! - The state tag always names a real state
//! - After the input ends and the switches open, both buttons return to
//!   idle with a clear count
//!
//! cargo fuzz run fuzz_gesture_sequence

#![no_main]

use core::cell::Cell;
use core::convert::Infallible;
use std::rc::Rc;

use edgeclick::button::{Button, ButtonBank, ButtonId};
use edgeclick::config::ButtonConfig;
use edgeclick::events::GestureQueue;
use edgeclick::fsm::{MAX_PUSH_COUNT, State};
use edgeclick::pins::{PinDescriptor, Trigger};
use edgeclick::ports::{Tick, TickSource};
use embedded_hal::digital::{ErrorType, InputPin};
use libfuzzer_sys::fuzz_target;

struct Clock(Cell<Tick>);

impl TickSource for Clock {
    fn now(&self) -> Tick {
        self.0.get()
    }
}

/// Active-low switch; the shared cell is `true` while pressed.
struct Switch(Rc<Cell<bool>>);

impl ErrorType for Switch {
    type Error = Infallible;
}

impl InputPin for Switch {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0.get())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.get())
    }
}

const SHIFT: PinDescriptor = PinDescriptor::new("shift", 0, Trigger::Falling);
const KEY: PinDescriptor = PinDescriptor::new("key", 1, Trigger::Falling);

fn step(
    a: &mut Button<'_, Switch, Clock>,
    b: &mut Button<'_, Switch, Clock>,
    clock: &Clock,
    bank: &ButtonBank<2>,
    queue: &mut GestureQueue<32>,
    ticks: u32,
) {
    for _ in 0..ticks {
        clock.0.set(clock.0.get().wrapping_add(1));
        a.poll(queue);
        b.poll(queue);
        for cell in bank.iter() {
            assert!(cell.state().is_some(), "corrupt tag {}", cell.raw_state());
            assert!(cell.push_count() <= MAX_PUSH_COUNT);
        }
    }
    while queue.pop().is_some() {}
}

fuzz_target!(|data: &[u8]| {
    let Some((&flags, ops)) = data.split_first() else {
        return;
    };
    let config = ButtonConfig {
        multi_click: flags & 1 != 0,
        report_hold_duration: flags & 2 != 0,
        combination: true,
        ..ButtonConfig::default()
    };

    let bank: ButtonBank<2> = ButtonBank::new();
    // Start near the top of the counter so long inputs cross the wrap.
    let clock = Clock(Cell::new(u32::MAX - 5_000));
    let levels = [Rc::new(Cell::new(false)), Rc::new(Cell::new(false))];
    let Ok(mut a) = Button::init(
        &bank,
        ButtonId::new(0),
        Switch(Rc::clone(&levels[0])),
        SHIFT,
        &clock,
        &config,
    ) else {
        return;
    };
    let Ok(mut b) = Button::init(
        &bank,
        ButtonId::new(1),
        Switch(Rc::clone(&levels[1])),
        KEY,
        &clock,
        &config,
    ) else {
        return;
    };
    if b.link_combination(ButtonId::new(0)).is_err() {
        return;
    }
    let mut queue: GestureQueue<32> = GestureQueue::new();

    // Two bits pick the button, two the action, four a wait length.
    for &op in ops.iter().take(512) {
        let which = usize::from(op & 1);
        let level = &levels[which];
        match (op >> 1) & 0b11 {
            0 => {
                level.set(true);
                if which == 0 {
                    a.on_interrupt();
                } else {
                    b.on_interrupt();
                }
            }
            1 => level.set(false),
            2 if which == 0 => a.on_interrupt(),
            2 => b.on_interrupt(),
            _ => {}
        }
        let wait = u32::from(op >> 4) * 25;
        step(&mut a, &mut b, &clock, &bank, &mut queue, wait);
    }

    levels[0].set(false);
    levels[1].set(false);
    step(&mut a, &mut b, &clock, &bank, &mut queue, 2_000);
    assert_eq!(a.state(), Some(State::WaitForInterrupt));
    assert_eq!(b.state(), Some(State::WaitForInterrupt));
    assert_eq!(a.push_count(), 0);
    assert_eq!(b.push_count(), 0);
});
