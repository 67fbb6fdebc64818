//! Dispatch port for user-facing notifications.

use crate::project::domain::EmployeeId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// A rendered user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Receiving employee.
    pub recipient: EmployeeId,
    /// Message title.
    pub title: String,
    /// Message body.
    pub body: String,
}

/// Best-effort delivery of user-facing messages.
///
/// Callers treat every failure as non-fatal: dispatch errors are logged
/// and never abort the surrounding mutation.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Delivers one notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError`] when delivery fails; callers swallow
    /// and log it.
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError>;
}

/// Errors returned by notification dispatch implementations.
#[derive(Debug, Clone, Error)]
#[error("notification delivery failed: {0}")]
pub struct NotificationError(pub Arc<dyn std::error::Error + Send + Sync>);

impl NotificationError {
    /// Wraps a delivery error.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }
}
