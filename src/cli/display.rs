//! Display utilities for the break timer CLI.
//!
//! This module provides formatted output for:
//! - The countdown clock
//! - The "Eye Break" alert
//! - Status and notification permission
//! - Error messages

use std::io::{self, Write};

use crate::notification::{PermissionState, EXPIRY_BODY};
use crate::timer::format_remaining;
use crate::types::{CountdownState, TimerEvent};

/// Heading of the in-app alert shown on expiry.
pub const ALERT_TITLE: &str = "Eye Break";

/// How session output is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Human,
    /// One JSON object per event
    Json,
}

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the greeting and key help.
    pub fn show_banner(state: &CountdownState) {
        println!("EyeSaver  {}", format_remaining(state.remaining_seconds));
        Self::show_help();
    }

    pub fn show_help() {
        println!("  s / Enter  start or stop (stop resets the clock)");
        println!("  + / -      add or remove a minute");
        println!("  b          ask for notification permission");
        println!("  ?          status");
        println!("  q          quit");
    }

    /// Renders one timer event.
    pub fn show_event(event: &TimerEvent, mode: OutputMode) {
        match mode {
            OutputMode::Json => match serde_json::to_string(event) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::warn!(error = %e, "Failed to serialize event"),
            },
            OutputMode::Human => {
                if let TimerEvent::Tick { remaining_seconds } = event {
                    print!("\r  {}  ", format_remaining(*remaining_seconds));
                    let _ = io::stdout().flush();
                } else if let Some(text) = Self::describe_event(event) {
                    println!("\r{}", text);
                }
            }
        }
    }

    /// Human text for an event. Ticks are drawn in place and have none.
    pub fn describe_event(event: &TimerEvent) -> Option<String> {
        match event {
            TimerEvent::Started { remaining_seconds } => {
                Some(format!("> Started  {}", format_remaining(*remaining_seconds)))
            }
            TimerEvent::Stopped { remaining_seconds } => Some(format!(
                "[] Stopped  reset to {}",
                format_remaining(*remaining_seconds)
            )),
            TimerEvent::Adjusted { remaining_seconds } => {
                Some(format!("   {}", format_remaining(*remaining_seconds)))
            }
            TimerEvent::Expired => Some(format!("\n*** {} ***\n{}\n", ALERT_TITLE, EXPIRY_BODY)),
            TimerEvent::AlertCleared => Some("   (alert cleared)".to_string()),
            TimerEvent::Tick { .. } => None,
        }
    }

    /// Shows the current state.
    pub fn show_status(state: &CountdownState, permission: PermissionState, mode: OutputMode) {
        match mode {
            OutputMode::Json => {
                let value = serde_json::json!({
                    "state": state.phase().as_str(),
                    "remaining_seconds": state.remaining_seconds,
                    "is_running": state.is_running,
                    "is_finished": state.is_finished,
                    "notifications": Self::permission_label(permission),
                });
                println!("{}", value);
            }
            OutputMode::Human => {
                println!("\rEyeSaver status");
                println!("─────────────────────────────");
                println!("State:         {}", state.phase().as_str());
                println!("Remaining:     {}", format_remaining(state.remaining_seconds));
                println!("Notifications: {}", Self::permission_label(permission));
            }
        }
    }

    /// Shows the outcome of a permission request.
    pub fn show_permission(permission: PermissionState) {
        match permission {
            PermissionState::Granted => println!("\r   Notifications enabled"),
            PermissionState::Denied => {
                println!("\r   Notifications denied; the in-app alert still works")
            }
            PermissionState::Unknown => {
                println!("\r   Could not determine notification permission")
            }
        }
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    pub fn permission_label(permission: PermissionState) -> &'static str {
        match permission {
            PermissionState::Unknown => "unknown",
            PermissionState::Granted => "granted",
            PermissionState::Denied => "denied",
        }
    }
}
