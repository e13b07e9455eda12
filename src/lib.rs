//! EyeSaver Library
//!
//! This library provides the core functionality for the EyeSaver break timer.
//! It includes:
//! - Countdown controller with start/stop/adjust and expiry handling
//! - Notification scheduler with a native macOS backend and a desktop
//!   backend for other platforms
//! - CLI command parsing, display utilities and the interactive session
//! - Type definitions for configuration, state and events

pub mod cli;
pub mod notification;
pub mod timer;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{ConfigError, CountdownState, TimerConfig, TimerEvent, TimerPhase};

pub use timer::{format_remaining, TickOutcome, TimerController, Wakeup};

pub use notification::{
    HostNotificationCenter, MockNotificationSubmitter, MockPermissionRequester,
    NotificationError, NotificationRequest, NotificationScheduler, NotificationSubmitter,
    PermissionRequester, PermissionState,
};
