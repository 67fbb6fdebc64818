//! Recording notification dispatcher for tests.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use crate::project::{
    domain::EmployeeId,
    ports::{Notification, NotificationDispatcher, NotificationError},
};

/// Dispatcher that records sent notifications and can simulate failures
/// for chosen recipients.
#[derive(Debug, Clone, Default)]
pub struct RecordingDispatcher {
    sent: Arc<RwLock<Vec<Notification>>>,
    failing: Arc<RwLock<HashSet<EmployeeId>>>,
}

impl RecordingDispatcher {
    /// Creates a dispatcher that delivers everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every send to the given recipient fail.
    pub fn fail_for(&self, recipient: EmployeeId) {
        if let Ok(mut failing) = self.failing.write() {
            failing.insert(recipient);
        }
    }

    /// Returns the notifications delivered so far.
    #[must_use]
    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .read()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        let failing = self
            .failing
            .read()
            .map_err(|err| NotificationError::delivery(std::io::Error::other(err.to_string())))?;
        if failing.contains(&notification.recipient) {
            return Err(NotificationError::delivery(std::io::Error::other(
                "simulated delivery failure",
            )));
        }
        drop(failing);
        self.sent
            .write()
            .map_err(|err| NotificationError::delivery(std::io::Error::other(err.to_string())))?
            .push(notification.clone());
        Ok(())
    }
}
