//! UNUserNotificationCenter backend.

use std::cell::RefCell;

use block2::RcBlock;
use objc2::rc::Retained;
use objc2::runtime::{Bool, ProtocolObject};
use objc2::MainThreadMarker;
use objc2_foundation::{NSError, NSString};
use objc2_user_notifications::{
    UNAuthorizationOptions, UNMutableNotificationContent, UNNotificationRequest,
    UNNotificationSound, UNNotificationTrigger, UNTimeIntervalNotificationTrigger,
    UNUserNotificationCenter, UNUserNotificationCenterDelegate,
};
use tokio::sync::oneshot;
use tracing::debug;

use super::delegate::NotificationDelegate;
use super::error::NotificationError;
use super::request::{AuthorizationOptions, NotificationRequest};
use super::{NotificationSubmitter, PermissionRequester};

/// Native macOS notification center.
///
/// Holds the delegate that lets banners show while the process is frontmost.
#[derive(Clone)]
pub struct MacNotificationCenter {
    _delegate: Retained<NotificationDelegate>,
}

impl MacNotificationCenter {
    /// Installs the presentation delegate.
    ///
    /// # Errors
    ///
    /// Returns `InitializationFailed` when not called on the main thread.
    pub fn new() -> Result<Self, NotificationError> {
        let mtm = MainThreadMarker::new().ok_or_else(|| {
            NotificationError::InitializationFailed(
                "notifications must be initialized on the main thread".to_string(),
            )
        })?;

        let delegate = NotificationDelegate::new(mtm);
        let protocol = ProtocolObject::from_retained(delegate.clone());
        let protocol: &ProtocolObject<dyn UNUserNotificationCenterDelegate> = &protocol;
        Self::current().setDelegate(Some(protocol));

        Ok(Self {
            _delegate: delegate,
        })
    }

    fn current() -> Retained<UNUserNotificationCenter> {
        UNUserNotificationCenter::currentNotificationCenter()
    }

    fn native_options(options: AuthorizationOptions) -> UNAuthorizationOptions {
        let mut native = UNAuthorizationOptions::empty();
        if options.alert {
            native |= UNAuthorizationOptions::Alert;
        }
        if options.badge {
            native |= UNAuthorizationOptions::Badge;
        }
        if options.sound {
            native |= UNAuthorizationOptions::Sound;
        }
        native
    }

    fn native_request(request: &NotificationRequest) -> Retained<UNNotificationRequest> {
        let content = unsafe { UNMutableNotificationContent::new() };
        unsafe {
            content.setTitle(&NSString::from_str(&request.title));
            content.setBody(&NSString::from_str(&request.body));
            content.setSound(Some(&UNNotificationSound::defaultSound()));
        }

        // UNTimeIntervalNotificationTrigger rejects non-positive intervals
        let seconds = request.trigger_delay.as_secs_f64().max(0.1);
        let trigger = unsafe {
            UNTimeIntervalNotificationTrigger::triggerWithTimeInterval_repeats(seconds, false)
        };
        let trigger: &UNNotificationTrigger = &trigger;

        let identifier = NSString::from_str(&request.identifier);
        UNNotificationRequest::requestWithIdentifier_content_trigger(
            &identifier,
            &content,
            Some(trigger),
        )
    }
}

impl PermissionRequester for MacNotificationCenter {
    async fn request_authorization(
        &self,
        options: AuthorizationOptions,
    ) -> Result<bool, NotificationError> {
        let (tx, rx) = oneshot::channel::<Result<bool, NotificationError>>();

        let cb = RefCell::new(Some(tx));
        let block = RcBlock::new(move |granted: Bool, error: *mut NSError| {
            if let Some(sender) = cb.borrow_mut().take() {
                let result = match unsafe { error.as_ref() } {
                    Some(err) => Err(NotificationError::AuthorizationFailed(
                        err.localizedDescription().to_string(),
                    )),
                    None => Ok(granted.as_bool()),
                };
                let _ = sender.send(result);
            }
        });

        debug!(?options, "Requesting notification authorization");
        let native = Self::native_options(options);
        Self::current().requestAuthorizationWithOptions_completionHandler(native, &block);

        rx.await
            .map_err(|_| NotificationError::AuthorizationFailed("Channel closed".to_string()))?
    }
}

impl NotificationSubmitter for MacNotificationCenter {
    async fn add(&self, request: &NotificationRequest) -> Result<(), NotificationError> {
        let native = Self::native_request(request);
        let (tx, rx) = oneshot::channel::<Result<(), NotificationError>>();

        let cb = RefCell::new(Some(tx));
        let block = RcBlock::new(move |error: *mut NSError| {
            if let Some(sender) = cb.borrow_mut().take() {
                let result = match unsafe { error.as_ref() } {
                    Some(err) => Err(NotificationError::SendFailed(
                        err.localizedDescription().to_string(),
                    )),
                    None => Ok(()),
                };
                let _ = sender.send(result);
            }
        });

        Self::current().addNotificationRequest_withCompletionHandler(&native, Some(&block));

        rx.await
            .map_err(|_| NotificationError::SendFailed("Channel closed".to_string()))?
    }
}
