//! Notification system error types.

use thiserror::Error;

/// Errors that can occur in the notification system.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The host failed to answer the permission request.
    #[error("failed to request notification permission: {0}")]
    AuthorizationFailed(String),

    /// The host rejected the notification request.
    #[error("failed to schedule notification: {0}")]
    SendFailed(String),

    /// The notification backend could not be set up.
    #[error("failed to initialize notifications: {0}")]
    InitializationFailed(String),
}

impl NotificationError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::AuthorizationFailed(_) => {
                "Allow notifications for this app in the system notification settings"
            }
            Self::SendFailed(_) => "Check that the notification service is running",
            Self::InitializationFailed(_) => "Restart the application from a desktop session",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NotificationError::InitializationFailed("no main thread".to_string());
        assert_eq!(
            err.to_string(),
            "failed to initialize notifications: no main thread"
        );

        let err = NotificationError::SendFailed("dbus closed".to_string());
        assert!(err.to_string().contains("dbus closed"));
    }

    #[test]
    fn test_suggestion() {
        let err = NotificationError::AuthorizationFailed("x".into());
        assert!(err.suggestion().contains("notification settings"));
    }
}
