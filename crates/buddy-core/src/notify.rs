//! Notification sink port.
//!
//! Surfaces the outcome of a submission to the user (a toast in a browser,
//! a styled line in the terminal). No queueing and no retry: a new
//! notification replaces whatever was shown before.

use std::sync::Mutex;

/// Shown after a successful create or update.
pub const SUCCESS_MESSAGE: &str = "Success.";

/// Shown after any failed submission. Backend error detail is never surfaced.
pub const FAILURE_MESSAGE: &str = "Something went wrong";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

/// Presentational sink for submission outcomes.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: &str);
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self, kind: NotificationKind, message: &str) {
        (**self).notify(kind, message)
    }
}

/// In-memory sink that keeps only the most recent notification.
#[derive(Debug, Default)]
pub struct LatestNotification {
    current: Mutex<Option<Notification>>,
}

impl LatestNotification {
    pub fn new() -> Self {
        Self::default()
    }

    /// The notification currently on display, if any.
    pub fn current(&self) -> Option<Notification> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Dismiss the current notification.
    pub fn dismiss(&self) {
        *self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}

impl Notifier for LatestNotification {
    fn notify(&self, kind: NotificationKind, message: &str) {
        *self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(Notification {
            kind,
            message: message.to_string(),
        });
    }
}
