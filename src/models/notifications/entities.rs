use serde::{Deserialize, Serialize};

/// How long a toast stays visible when the caller does not say otherwise.
pub const DEFAULT_NOTIFICATION_DURATION_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
    Warning,
}

// One toast. `duration_ms` counts from `created_at`; expired toasts are
// pruned on access rather than by a timer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub level: NotificationLevel,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub duration_ms: u64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Notification {
    pub fn is_expired(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        let elapsed = now.signed_duration_since(self.created_at);
        elapsed.num_milliseconds() >= self.duration_ms as i64
    }
}
