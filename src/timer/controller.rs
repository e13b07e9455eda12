//! Countdown controller for the break timer.
//!
//! This module provides the core timer functionality:
//! - State transitions (Idle → Running → Finished → Idle)
//! - Countdown driven by a cancellable 1-second ticker
//! - Duration adjustment with a lower floor
//! - Event firing for the display and the notification scheduler

use tokio::sync::mpsc;
use tokio::time::Duration;
use tracing::{debug, info, trace};

use super::ticker::{AlertTimer, Ticker};
use crate::types::{CountdownState, TimerConfig, TimerEvent, TimerPhase, TICK_PERIOD_SECONDS};

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer was not running
    Ignored,
    /// Countdown decremented
    Counted { remaining_seconds: u32 },
    /// Countdown expired on this tick
    Expired,
}

/// What woke the controller up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wakeup {
    Tick,
    AlertWindowClosed,
}

/// Renders seconds as zero-padded `MM:SS`.
///
/// Minutes are not wrapped, so an hour renders as `60:00`.
pub fn format_remaining(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

// ============================================================================
// TimerController
// ============================================================================

/// Owns the countdown state and its tick sources.
pub struct TimerController {
    config: TimerConfig,
    state: CountdownState,
    ticker: Ticker,
    alert: AlertTimer,
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl TimerController {
    /// Creates an idle controller holding the configured duration.
    pub fn new(config: TimerConfig, event_tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self {
            state: CountdownState::new(config.duration_seconds),
            ticker: Ticker::new(Duration::from_secs(TICK_PERIOD_SECONDS)),
            alert: AlertTimer::new(Duration::from_secs(config.alert_window_seconds)),
            config,
            event_tx,
        }
    }

    /// Adds `delta_seconds` to the remaining time.
    ///
    /// Decreases only apply while the remaining time is above the minimum
    /// and never take it below the minimum. Returns the remaining seconds
    /// after the adjustment.
    pub fn adjust_duration(&mut self, delta_seconds: i64) -> u32 {
        if self.config.lock_while_running && self.state.is_running {
            debug!(delta_seconds, "Adjustment ignored while running");
            return self.state.remaining_seconds;
        }

        let current = self.state.remaining_seconds;
        let min = self.config.min_seconds;
        let next = if delta_seconds >= 0 {
            let delta = u32::try_from(delta_seconds).unwrap_or(u32::MAX);
            current.saturating_add(delta)
        } else if current > min {
            let delta = u32::try_from(delta_seconds.unsigned_abs()).unwrap_or(u32::MAX);
            current.saturating_sub(delta).max(min)
        } else {
            current
        };

        if next == current {
            debug!(current, delta_seconds, "Adjustment had no effect");
            return current;
        }

        self.state.remaining_seconds = next;
        debug!(from = current, to = next, "Duration adjusted");
        self.emit(TimerEvent::Adjusted {
            remaining_seconds: next,
        });
        next
    }

    /// Adds one adjustment step.
    pub fn increase(&mut self) -> u32 {
        self.adjust_duration(i64::from(self.config.adjust_step_seconds))
    }

    /// Removes one adjustment step, respecting the minimum.
    pub fn decrease(&mut self) -> u32 {
        self.adjust_duration(-i64::from(self.config.adjust_step_seconds))
    }

    /// Starts the countdown.
    ///
    /// Returns false (and does nothing) if it is already running.
    pub fn start(&mut self) -> bool {
        if self.state.is_running {
            debug!("Start ignored, already running");
            return false;
        }

        self.state.is_running = true;
        self.ticker.arm();
        info!(
            remaining = %format_remaining(self.state.remaining_seconds),
            "Countdown started"
        );
        self.emit(TimerEvent::Started {
            remaining_seconds: self.state.remaining_seconds,
        });
        true
    }

    /// Stops the countdown and rearms it to the configured duration.
    ///
    /// Stopping never pauses: the remaining time is always reset.
    pub fn stop(&mut self) {
        let was_running = self.state.is_running;
        self.state.is_running = false;
        self.ticker.cancel();
        self.state.remaining_seconds = self.config.duration_seconds;

        info!(was_running, "Countdown stopped and reset");
        self.emit(TimerEvent::Stopped {
            remaining_seconds: self.state.remaining_seconds,
        });
    }

    /// Start/stop button semantics. Returns whether the timer now runs.
    pub fn toggle(&mut self) -> bool {
        if self.state.is_running {
            self.stop();
            false
        } else {
            self.start()
        }
    }

    /// Advances the countdown by one tick.
    pub fn on_tick(&mut self) -> TickOutcome {
        if !self.state.is_running {
            trace!("Tick ignored, not running");
            return TickOutcome::Ignored;
        }

        if self.state.remaining_seconds > 0 {
            self.state.remaining_seconds -= 1;
            self.emit(TimerEvent::Tick {
                remaining_seconds: self.state.remaining_seconds,
            });
            return TickOutcome::Counted {
                remaining_seconds: self.state.remaining_seconds,
            };
        }

        info!("Countdown expired");
        self.state.is_finished = true;
        self.alert.arm();
        self.emit(TimerEvent::Expired);
        self.stop();
        TickOutcome::Expired
    }

    /// Closes the finished alert. Returns true if it was open.
    pub fn clear_alert(&mut self) -> bool {
        self.alert.cancel();
        if !self.state.is_finished {
            return false;
        }
        self.state.is_finished = false;
        debug!("Alert window closed");
        self.emit(TimerEvent::AlertCleared);
        true
    }

    /// Waits for the next tick or the end of the alert window.
    ///
    /// Pending forever while nothing is armed. Cancel-safe.
    pub async fn next_wakeup(&mut self) -> Wakeup {
        tokio::select! {
            _ = self.ticker.tick() => Wakeup::Tick,
            _ = self.alert.expired() => Wakeup::AlertWindowClosed,
        }
    }

    /// Applies a wakeup returned by [`Self::next_wakeup`].
    pub fn handle_wakeup(&mut self, wakeup: Wakeup) -> TickOutcome {
        match wakeup {
            Wakeup::Tick => self.on_tick(),
            Wakeup::AlertWindowClosed => {
                self.clear_alert();
                TickOutcome::Ignored
            }
        }
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> CountdownState {
        self.state
    }

    pub fn phase(&self) -> TimerPhase {
        self.state.phase()
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.state.remaining_seconds
    }

    /// Returns true while the repeating tick is armed.
    pub fn is_tick_armed(&self) -> bool {
        self.ticker.is_armed()
    }

    fn emit(&self, event: TimerEvent) {
        if self.event_tx.send(event).is_err() {
            trace!(?event, "No observer for timer event");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
