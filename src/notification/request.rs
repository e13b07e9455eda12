//! Notification request creation.
//!
//! Requests are plain data; each host center turns them into its own
//! native representation.

use std::time::Duration;

use uuid::Uuid;

/// Title of the expiry notification.
pub const EXPIRY_TITLE: &str = "Timer Finished";

/// Body of the expiry notification and of the in-app alert.
pub const EXPIRY_BODY: &str = "Take a break and let your eyes relax!";

/// Delay between expiry and delivery of the notification.
pub const EXPIRY_TRIGGER_DELAY: Duration = Duration::from_secs(1);

/// Permission kinds asked from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationOptions {
    pub alert: bool,
    pub badge: bool,
    pub sound: bool,
}

impl AuthorizationOptions {
    /// Alerts, badges and sounds.
    pub const ALL: Self = Self {
        alert: true,
        badge: true,
        sound: true,
    };
}

/// A one-shot notification to hand to the host.
///
/// Hosts always play their default sound with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    /// Unique per request
    pub identifier: String,
    pub title: String,
    pub body: String,
    /// Fires once, this long after submission
    pub trigger_delay: Duration,
}

impl NotificationRequest {
    /// Creates a request with a fresh UUID identifier.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>, trigger_delay: Duration) -> Self {
        Self {
            identifier: Uuid::new_v4().to_string(),
            title: title.into(),
            body: body.into(),
            trigger_delay,
        }
    }

    /// The fixed "take a break" request sent when the countdown expires.
    #[must_use]
    pub fn expiry() -> Self {
        Self::new(EXPIRY_TITLE, EXPIRY_BODY, EXPIRY_TRIGGER_DELAY)
    }
}
