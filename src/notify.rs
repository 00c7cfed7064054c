use crate::error::AppResult;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

const NOTIFICATIONS_KEY: &str = "NOTIFICATIONS";

/// How long a screen keeps its snackbar up.
pub const SCREEN_AUTO_HIDE_MS: u64 = 3000;
pub const REPORTS_AUTO_HIDE_MS: u64 = 6000;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

/// A transient snackbar message.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub auto_hide_ms: u64,
}

impl Notification {
    pub fn success(message: impl Into<String>, auto_hide_ms: u64) -> Self {
        Notification {
            message: message.into(),
            severity: Severity::Success,
            auto_hide_ms,
        }
    }

    pub fn error(message: impl Into<String>, auto_hide_ms: u64) -> Self {
        Notification {
            message: message.into(),
            severity: Severity::Error,
            auto_hide_ms,
        }
    }
}

/// Queue a notification on the caller's session.
pub async fn push(session: &Session, notification: Notification) -> AppResult<()> {
    let mut queue: Vec<Notification> = session
        .get(NOTIFICATIONS_KEY)
        .await?
        .unwrap_or_default();
    tracing::debug!("Notify: {}", notification.message);
    queue.push(notification);
    session.insert(NOTIFICATIONS_KEY, queue).await?;
    Ok(())
}

/// Take every queued notification, oldest first.
pub async fn drain(session: &Session) -> AppResult<Vec<Notification>> {
    let queue: Option<Vec<Notification>> = session.remove(NOTIFICATIONS_KEY).await?;
    Ok(queue.unwrap_or_default())
}
