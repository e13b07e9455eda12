//! Core data types for the break timer.
//!
//! This module defines the data structures used for:
//! - Countdown state observed by the presentation layer
//! - Timer configuration with validation
//! - Timer events emitted on every state change

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Duration the countdown is rearmed to on construction and on every stop.
pub const DEFAULT_DURATION_SECONDS: u32 = 1500;

/// Floor for downward duration adjustments.
pub const MIN_DURATION_SECONDS: u32 = 60;

/// Amount added or removed by a single increase/decrease.
pub const ADJUST_STEP_SECONDS: u32 = 60;

/// How long the finished alert stays visible before clearing itself.
pub const ALERT_WINDOW_SECONDS: u64 = 10;

/// Period of the countdown tick.
pub const TICK_PERIOD_SECONDS: u64 = 1;

// ============================================================================
// TimerPhase
// ============================================================================

/// Represents the current phase of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// Waiting to be started
    #[default]
    Idle,
    /// Counting down
    Running,
    /// Countdown expired; the alert window is open
    Finished,
}

impl TimerPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Idle => "idle",
            TimerPhase::Running => "running",
            TimerPhase::Finished => "finished",
        }
    }
}

// ============================================================================
// TimerConfig
// ============================================================================

/// Errors raised when validating a [`TimerConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("duration must be at least {min} seconds (got {got})")]
    DurationTooShort { min: u32, got: u32 },

    #[error("adjust step must be greater than zero")]
    ZeroStep,

    #[error("alert window must be greater than zero")]
    ZeroAlertWindow,
}

/// Configuration for the countdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Initial and reset duration in seconds
    pub duration_seconds: u32,
    /// Lowest value a downward adjustment may produce
    pub min_seconds: u32,
    /// Step used by increase/decrease
    pub adjust_step_seconds: u32,
    /// Seconds the finished alert stays up
    pub alert_window_seconds: u64,
    /// Ignore duration adjustments while the countdown runs
    pub lock_while_running: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            duration_seconds: DEFAULT_DURATION_SECONDS,
            min_seconds: MIN_DURATION_SECONDS,
            adjust_step_seconds: ADJUST_STEP_SECONDS,
            alert_window_seconds: ALERT_WINDOW_SECONDS,
            lock_while_running: false,
        }
    }
}

impl TimerConfig {
    /// Creates a new configuration with the specified duration in minutes.
    pub fn with_minutes(mut self, minutes: u32) -> Self {
        self.duration_seconds = minutes.saturating_mul(60);
        self
    }

    /// Creates a new configuration with the specified running-state guard.
    pub fn with_lock_while_running(mut self, lock: bool) -> Self {
        self.lock_while_running = lock;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.duration_seconds < self.min_seconds {
            return Err(ConfigError::DurationTooShort {
                min: self.min_seconds,
                got: self.duration_seconds,
            });
        }
        if self.adjust_step_seconds == 0 {
            return Err(ConfigError::ZeroStep);
        }
        if self.alert_window_seconds == 0 {
            return Err(ConfigError::ZeroAlertWindow);
        }
        Ok(())
    }
}

// ============================================================================
// CountdownState
// ============================================================================

/// Snapshot of the countdown as seen by observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownState {
    /// Seconds left before expiry
    pub remaining_seconds: u32,
    /// Whether the tick source is armed
    pub is_running: bool,
    /// Set at expiry, cleared when the alert window closes
    pub is_finished: bool,
}

impl CountdownState {
    /// Creates an idle state holding `remaining_seconds`.
    pub fn new(remaining_seconds: u32) -> Self {
        Self {
            remaining_seconds,
            is_running: false,
            is_finished: false,
        }
    }

    /// Returns the phase derived from the flags.
    pub fn phase(&self) -> TimerPhase {
        if self.is_running {
            TimerPhase::Running
        } else if self.is_finished {
            TimerPhase::Finished
        } else {
            TimerPhase::Idle
        }
    }
}

// ============================================================================
// TimerEvent
// ============================================================================

/// Events emitted by the controller for observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimerEvent {
    /// Countdown started
    Started { remaining_seconds: u32 },
    /// Countdown stopped and rearmed
    Stopped { remaining_seconds: u32 },
    /// One second elapsed
    Tick { remaining_seconds: u32 },
    /// Duration changed by increase/decrease
    Adjusted { remaining_seconds: u32 },
    /// Countdown reached zero
    Expired,
    /// Alert window closed
    AlertCleared,
}

// ============================================================================
// Tests
// ============================================================================
