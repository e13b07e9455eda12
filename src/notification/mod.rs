//! System notification support.
//!
//! This module provides:
//!
//! - `PermissionRequester` / `NotificationSubmitter`: the host seams
//! - `NotificationScheduler`: permission tracking and the expiry alert
//! - A native macOS backend (`UNUserNotificationCenter` via objc2)
//! - A desktop backend for every other OS (notify-rust)
//! - Mocks for tests
//!
//! # Example
//!
//! ```rust,ignore
//! use eyesaver::notification::{HostNotificationCenter, NotificationScheduler};
//!
//! let center = HostNotificationCenter::new()?;
//! let scheduler = NotificationScheduler::new(center.clone(), center);
//! scheduler.request_permission().await;
//! scheduler.schedule_expiry_notification().await;
//! ```
//!
//! # Requirements (macOS)
//!
//! The binary must run on the main thread of a bundled, code-signed
//! process for `UNUserNotificationCenter` to accept requests:
//! ```bash
//! codesign --force --deep --sign - target/release/eyesaver
//! ```

#[cfg(target_os = "macos")]
mod center;
#[cfg(target_os = "macos")]
mod delegate;
#[cfg(not(target_os = "macos"))]
mod desktop;
pub mod error;
mod request;

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tracing::{debug, info, warn};

pub use self::error::NotificationError;
pub use self::request::{
    AuthorizationOptions, NotificationRequest, EXPIRY_BODY, EXPIRY_TITLE, EXPIRY_TRIGGER_DELAY,
};

#[cfg(target_os = "macos")]
pub use self::center::MacNotificationCenter as HostNotificationCenter;
#[cfg(not(target_os = "macos"))]
pub use self::desktop::DesktopNotificationCenter as HostNotificationCenter;

// ============================================================================
// Host seams
// ============================================================================

/// Asks the host for permission to show notifications.
#[allow(async_fn_in_trait)]
pub trait PermissionRequester {
    /// Resolves to whether the user granted the permission.
    async fn request_authorization(
        &self,
        options: AuthorizationOptions,
    ) -> Result<bool, NotificationError>;
}

/// Hands notification requests to the host.
#[allow(async_fn_in_trait)]
pub trait NotificationSubmitter {
    async fn add(&self, request: &NotificationRequest) -> Result<(), NotificationError>;
}

/// Permission as last reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionState {
    #[default]
    Unknown,
    Granted,
    Denied,
}

// ============================================================================
// NotificationScheduler
// ============================================================================

/// Tracks notification permission and schedules the expiry alert.
///
/// Every host failure is logged and swallowed; nothing here affects the
/// countdown.
pub struct NotificationScheduler<P, S> {
    permissions: P,
    submitter: S,
    permission: Cell<PermissionState>,
}

impl<P, S> NotificationScheduler<P, S>
where
    P: PermissionRequester,
    S: NotificationSubmitter,
{
    pub fn new(permissions: P, submitter: S) -> Self {
        Self {
            permissions,
            submitter,
            permission: Cell::new(PermissionState::Unknown),
        }
    }

    /// Returns the last known permission state.
    pub fn permission(&self) -> PermissionState {
        self.permission.get()
    }

    /// Requests alert, badge and sound permission.
    ///
    /// On error the previous state is kept. Repeated calls are harmless.
    pub async fn request_permission(&self) -> PermissionState {
        match self
            .permissions
            .request_authorization(AuthorizationOptions::ALL)
            .await
        {
            Ok(true) => {
                info!("Notification permission granted");
                self.permission.set(PermissionState::Granted);
            }
            Ok(false) => {
                warn!("Notification permission denied");
                self.permission.set(PermissionState::Denied);
            }
            Err(e) => {
                warn!(error = %e, hint = e.suggestion(), "Error requesting notification permission");
            }
        }
        self.permission.get()
    }

    /// Submits the one-shot "take a break" notification.
    ///
    /// Returns the request identifier when the host accepted it.
    pub async fn schedule_expiry_notification(&self) -> Option<String> {
        let request = NotificationRequest::expiry();

        if self.permission.get() == PermissionState::Denied {
            debug!("Permission denied earlier, submitting anyway");
        }

        match self.submitter.add(&request).await {
            Ok(()) => {
                info!(id = %request.identifier, "Expiry notification scheduled");
                Some(request.identifier)
            }
            Err(e) => {
                warn!(error = %e, "Error scheduling notification");
                None
            }
        }
    }

    pub fn permissions(&self) -> &P {
        &self.permissions
    }

    pub fn submitter(&self) -> &S {
        &self.submitter
    }
}

// ============================================================================
// Mocks
// ============================================================================

#[derive(Debug)]
pub struct MockPermissionRequester {
    granted: AtomicBool,
    should_fail: AtomicBool,
    requests: Mutex<Vec<AuthorizationOptions>>,
}

impl MockPermissionRequester {
    /// Creates a mock that grants every request.
    #[must_use]
    pub fn new() -> Self {
        Self {
            granted: AtomicBool::new(true),
            should_fail: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn set_granted(&self, granted: bool) {
        self.granted.store(granted, Ordering::SeqCst);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    #[must_use]
    pub fn requests(&self) -> Vec<AuthorizationOptions> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockPermissionRequester {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionRequester for MockPermissionRequester {
    async fn request_authorization(
        &self,
        options: AuthorizationOptions,
    ) -> Result<bool, NotificationError> {
        self.requests.lock().unwrap().push(options);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::AuthorizationFailed(
                "Mock failure".to_string(),
            ));
        }
        Ok(self.granted.load(Ordering::SeqCst))
    }
}

#[derive(Debug, Default)]
pub struct MockNotificationSubmitter {
    submitted: Mutex<Vec<NotificationRequest>>,
    should_fail: AtomicBool,
}

impl MockNotificationSubmitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Requests seen so far, including failed ones.
    #[must_use]
    pub fn submitted(&self) -> Vec<NotificationRequest> {
        self.submitted.lock().unwrap().clone()
    }

    #[must_use]
    pub fn submission_count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

impl NotificationSubmitter for MockNotificationSubmitter {
    async fn add(&self, request: &NotificationRequest) -> Result<(), NotificationError> {
        self.submitted.lock().unwrap().push(request.clone());
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        Ok(())
    }
}
