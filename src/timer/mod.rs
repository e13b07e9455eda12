//! Countdown timer.
//!
//! - `controller`: countdown state machine and adjustments
//! - `ticker`: cancellable tick and alert-window timers

pub mod controller;
pub mod ticker;

pub use controller::{format_remaining, TickOutcome, TimerController, Wakeup};
pub use ticker::{AlertTimer, Ticker};
