//! Notification sinks
//!
//! Workflows report every outcome through a [`Notifier`]; the front-end
//! decides how to show it.

use parking_lot::Mutex;
use shared::Notification;

/// Receives user-facing notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Keeps notifications in memory, newest last
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    items: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.items.lock().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.items.lock().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.items.lock().push(notification);
    }
}
