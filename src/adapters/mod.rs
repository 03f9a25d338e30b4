//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements       | Connects to            |
//! |------------|------------------|------------------------|
//! | `log_sink` | GestureHandler   | `log` facade           |
//! | `time`     | TickSource       | `std::time::Instant`   |

pub mod log_sink;
#[cfg(feature = "std")]
pub mod time;

pub use log_sink::LogGestureSink;
#[cfg(feature = "std")]
pub use time::HostClock;
