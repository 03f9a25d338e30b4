//! Concrete state handler functions.
//!
//! Each state is one plain `fn(&PollContext) -> Step`: no closures, no
//! dynamic dispatch.  Handlers may update the poll-owned counters and
//! timestamps of the button cell; the state tag itself is committed by
//! the engine from the returned [`Step`].
//!
//! All handlers run inside the scoped guard, except
//! [`close_repeat_window`] which runs inside the always guard.

use super::context::PollContext;
use super::{MAX_PUSH_COUNT, State, Step};
use crate::button::ButtonState;
use crate::combination;
use crate::config::{Options, Thresholds};
use crate::error::ButtonFault;
use crate::events::Gesture;
use crate::ports::{Tick, exceeded};

// ═══════════════════════════════════════════════════════════════════════════
//  Dispatch
// ═══════════════════════════════════════════════════════════════════════════

/// Run the handler for the cell's current state.
pub fn dispatch(ctx: &PollContext<'_>) -> Step {
    let raw = ctx.cell.raw_state();
    let Some(state) = State::from_raw(raw) else {
        return Step::Fault(ButtonFault::CorruptState(raw));
    };

    match state {
        State::WaitForInterrupt => Step::Stay,
        State::PushDelay => push_delay(ctx),
        State::WaitForEnd => wait_for_end(ctx),
        State::ReleaseDelay => release_delay(ctx),
        State::WaitForRepeat => Step::RepeatWindow,
        State::SinglePush => single_push(ctx),
        State::RepeatPush => repeat_push(ctx),
        State::CoolDown => cool_down(ctx),
        State::CombinationPush => combination_push(ctx),
        State::CombinationWaitForEnd => combination_wait_for_end(ctx),
        State::CombinationRelease => combination_release(ctx),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Press debounce
// ═══════════════════════════════════════════════════════════════════════════

fn push_delay(ctx: &PollContext<'_>) -> Step {
    if !ctx.interrupt_window_exceeded(ctx.thresholds.push_settle) {
        return Step::Stay;
    }

    match ctx.is_idle() {
        None => Step::Stay,
        // Glitch: the edge did not hold.
        Some(true) if ctx.cell.push_count() == 0 => Step::Enter(State::WaitForInterrupt),
        Some(true) => Step::Enter(State::WaitForRepeat),
        Some(false) => Step::Enter(State::WaitForEnd),
    }
}

fn wait_for_end(ctx: &PollContext<'_>) -> Step {
    if ctx.is_idle() == Some(true) {
        ctx.cell.set_loop_timestamp(ctx.now);
        return Step::Enter(State::ReleaseDelay);
    }
    if ctx.interrupt_window_exceeded(ctx.thresholds.stuck_ceiling) {
        return Step::Fault(ButtonFault::StuckInput);
    }
    Step::Stay
}

// ═══════════════════════════════════════════════════════════════════════════
//  Release debounce
// ═══════════════════════════════════════════════════════════════════════════

fn release_delay(ctx: &PollContext<'_>) -> Step {
    if !ctx.loop_window_exceeded(ctx.thresholds.release_settle) {
        return Step::Stay;
    }

    match ctx.is_idle() {
        None => Step::Stay,
        Some(false) => Step::Enter(State::WaitForEnd),
        Some(true) => {
            let count = ctx.cell.push_count().saturating_add(1).min(MAX_PUSH_COUNT);
            ctx.cell.set_push_count(count);
            ctx.cell.set_loop_timestamp(ctx.now);

            if let Some(p) = ctx.predecessor {
                if combination::claim(p.cell) {
                    return Step::Enter(State::CombinationPush);
                }
            }

            Step::Enter(after_release(count, ctx.options.multi_click))
        }
    }
}

/// Where a confirmed release with `count` pending pushes goes next.
pub const fn after_release(count: u8, multi_click: bool) -> State {
    let keep_waiting = if multi_click {
        count < MAX_PUSH_COUNT
    } else {
        count == 1
    };
    if keep_waiting {
        State::WaitForRepeat
    } else {
        State::RepeatPush
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Repeat window
// ═══════════════════════════════════════════════════════════════════════════

/// Close the repeat window once it has expired.
///
/// Re-reads the tag: an edge that landed after the scoped guard was
/// released has already moved the cell to PushDelay and wins.
pub fn close_repeat_window(
    cell: &ButtonState,
    now: Tick,
    thresholds: &Thresholds,
    options: Options,
) -> Option<State> {
    if cell.state() != Some(State::WaitForRepeat) {
        return None;
    }
    if !exceeded(now, cell.loop_timestamp(), thresholds.repeat_window) {
        return None;
    }

    let next = if !options.multi_click || cell.push_count() == 1 {
        State::SinglePush
    } else {
        State::RepeatPush
    };
    cell.set_state(next);
    Some(next)
}

// ═══════════════════════════════════════════════════════════════════════════
//  Finalizing states
// ═══════════════════════════════════════════════════════════════════════════

fn single_push(ctx: &PollContext<'_>) -> Step {
    let held = ctx.since_interrupt();
    if held > ctx.thresholds.long_push_min {
        let held = ctx.options.report_hold_duration.then_some(held);
        Step::Dispatch(Gesture::LongPush { held })
    } else {
        Step::Dispatch(Gesture::ShortPush)
    }
}

fn repeat_push(ctx: &PollContext<'_>) -> Step {
    Step::Dispatch(Gesture::RepeatPush {
        count: ctx.cell.push_count(),
    })
}

fn cool_down(ctx: &PollContext<'_>) -> Step {
    if ctx.loop_window_exceeded(ctx.thresholds.cool_down) {
        Step::Enter(State::WaitForInterrupt)
    } else {
        Step::Stay
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Combination overlay
// ═══════════════════════════════════════════════════════════════════════════

fn combination_push(ctx: &PollContext<'_>) -> Step {
    if let Some(p) = ctx.predecessor {
        return Step::Dispatch(Gesture::Combination { predecessor: p.id });
    }
    // Link removed after the claim: finalize without a callback.
    ctx.cell.set_push_count(0);
    ctx.cell.set_loop_timestamp(ctx.now);
    Step::Enter(State::CoolDown)
}

fn combination_wait_for_end(ctx: &PollContext<'_>) -> Step {
    if ctx.is_idle() == Some(true) {
        ctx.cell.set_loop_timestamp(ctx.now);
        return Step::Enter(State::CombinationRelease);
    }
    if ctx.interrupt_window_exceeded(ctx.thresholds.stuck_ceiling) {
        return Step::Fault(ButtonFault::StuckInput);
    }
    Step::Stay
}

fn combination_release(ctx: &PollContext<'_>) -> Step {
    if !ctx.loop_window_exceeded(ctx.thresholds.release_settle) {
        return Step::Stay;
    }

    match ctx.is_idle() {
        None => Step::Stay,
        Some(true) => {
            ctx.cell.set_push_count(0);
            ctx.cell.set_loop_timestamp(ctx.now);
            Step::Enter(State::CoolDown)
        }
        Some(false) => Step::Enter(State::CombinationWaitForEnd),
    }
}
