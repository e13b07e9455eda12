//! Desktop notification backend for non-macOS hosts.
//!
//! Freedesktop and Windows toast notifications have no permission
//! handshake and no delayed trigger, so authorization always succeeds
//! and the trigger delay is waited out before showing.

use notify_rust::Notification;
use tracing::debug;

use super::error::NotificationError;
use super::request::{AuthorizationOptions, NotificationRequest};
use super::{NotificationSubmitter, PermissionRequester};

/// Application name shown by the notification daemon.
const APP_NAME: &str = "EyeSaver";

/// Desktop notification center backed by notify-rust.
#[derive(Debug, Clone)]
pub struct DesktopNotificationCenter {
    app_name: String,
}

impl DesktopNotificationCenter {
    pub fn new() -> Result<Self, NotificationError> {
        Ok(Self {
            app_name: APP_NAME.to_string(),
        })
    }

    fn build(&self, request: &NotificationRequest) -> Notification {
        let mut notification = Notification::new();
        notification
            .summary(&request.title)
            .body(&request.body)
            .appname(&self.app_name);
        notification
    }
}

impl PermissionRequester for DesktopNotificationCenter {
    async fn request_authorization(
        &self,
        options: AuthorizationOptions,
    ) -> Result<bool, NotificationError> {
        debug!(?options, "Desktop notifications need no permission");
        Ok(true)
    }
}

impl NotificationSubmitter for DesktopNotificationCenter {
    async fn add(&self, request: &NotificationRequest) -> Result<(), NotificationError> {
        let notification = self.build(request);
        tokio::time::sleep(request.trigger_delay).await;

        // show() blocks on the session bus
        tokio::task::spawn_blocking(move || {
            notification.show().map(|_| ()).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| NotificationError::SendFailed(e.to_string()))?
        .map_err(NotificationError::SendFailed)
    }
}
