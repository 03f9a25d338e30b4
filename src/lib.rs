//! EdgeClick: interrupt-armed, poll-classified button gestures.
//!
//! An edge interrupt stamps the press and arms the button; a
//! non-blocking poll from the main loop debounces it and classifies the
//! gesture (short, long, N-click, or "hold A, tap B" chord).  Pins come
//! from `embedded-hal`; mutual exclusion from `critical-section`.
//!
//! ```
//! use core::cell::Cell;
//! use core::convert::Infallible;
//!
//! use edgeclick::button::{Button, ButtonBank, ButtonId};
//! use edgeclick::config::ButtonConfig;
//! use edgeclick::events::{Gesture, GestureQueue};
//! use edgeclick::pins::{PinDescriptor, Trigger};
//! use edgeclick::ports::{Tick, TickSource};
//! use embedded_hal::digital::{ErrorType, InputPin};
//!
//! struct Clock(Cell<Tick>);
//! impl TickSource for Clock {
//!     fn now(&self) -> Tick { self.0.get() }
//! }
//!
//! struct AlwaysReleased;
//! impl ErrorType for AlwaysReleased { type Error = Infallible; }
//! impl InputPin for AlwaysReleased {
//!     fn is_high(&mut self) -> Result<bool, Infallible> { Ok(true) }
//!     fn is_low(&mut self) -> Result<bool, Infallible> { Ok(false) }
//! }
//!
//! static BUTTONS: ButtonBank<1> = ButtonBank::new();
//! const MODE: PinDescriptor = PinDescriptor::new("mode", 4, Trigger::Falling);
//!
//! let clock = Clock(Cell::new(0));
//! let mut mode = Button::init(
//!     &BUTTONS, ButtonId::new(0), AlwaysReleased, MODE, &clock, &ButtonConfig::default(),
//! ).unwrap();
//! let edge = mode.edge_handle();
//! let mut queue: GestureQueue<8> = GestureQueue::new();
//!
//! // A glitch: the edge fires but the pin is idle again once settled.
//! edge.on_interrupt();
//! clock.0.set(41);
//! mode.poll(&mut queue);
//! assert!(queue.is_empty());
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unused_must_use)]

pub mod adapters;
pub mod button;
pub mod combination;
pub mod config;
pub mod error;
pub mod events;
pub mod fsm;
pub mod guard;
pub mod pins;
pub mod ports;

pub use button::{Button, ButtonBank, ButtonId, ButtonState, EdgeHandle, FaultCounters};
pub use config::{ButtonConfig, FaultPolicy, ThresholdOverrides};
pub use error::{ButtonFault, Error, Result};
pub use events::{Gesture, GestureEvent, GestureQueue};
pub use pins::{Level, PinDescriptor, Trigger};
pub use ports::{Callbacks, GestureHandler, Tick, TickSource};
