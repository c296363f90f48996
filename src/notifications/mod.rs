//! Notification center: the toast surface the grading engine raises its
//! warnings and errors through.

use std::sync::RwLock;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::models::notifications::entities::{
    DEFAULT_NOTIFICATION_DURATION_MS, Notification, NotificationLevel,
};

#[derive(Default)]
pub struct NotificationCenter {
    toasts: RwLock<Vec<Notification>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_success(&self, title: impl Into<String>, description: impl Into<String>) -> String {
        self.push(NotificationLevel::Success, title.into(), description.into(), None)
    }

    pub fn show_error(&self, title: impl Into<String>, description: impl Into<String>) -> String {
        self.push(NotificationLevel::Error, title.into(), description.into(), None)
    }

    pub fn show_info(&self, title: impl Into<String>, description: impl Into<String>) -> String {
        self.push(NotificationLevel::Info, title.into(), description.into(), None)
    }

    pub fn show_warning(&self, title: impl Into<String>, description: impl Into<String>) -> String {
        self.push(NotificationLevel::Warning, title.into(), description.into(), None)
    }

    pub fn push(
        &self,
        level: NotificationLevel,
        title: String,
        description: String,
        duration_ms: Option<u64>,
    ) -> String {
        let toast = Notification {
            id: Uuid::new_v4().to_string(),
            level,
            title,
            description: if description.is_empty() {
                None
            } else {
                Some(description)
            },
            duration_ms: duration_ms.unwrap_or(DEFAULT_NOTIFICATION_DURATION_MS),
            created_at: chrono::Utc::now(),
        };

        match level {
            NotificationLevel::Success => info!("{}: {:?}", toast.title, toast.description),
            NotificationLevel::Error => error!("{}: {:?}", toast.title, toast.description),
            NotificationLevel::Info => debug!("{}: {:?}", toast.title, toast.description),
            NotificationLevel::Warning => warn!("{}: {:?}", toast.title, toast.description),
        }

        let id = toast.id.clone();
        self.toasts
            .write()
            .expect("Notification lock poisoned")
            .push(toast);
        id
    }

    /// Currently visible toasts. Expired ones are pruned here, so callers
    /// polling this get auto-dismissal without a timer.
    pub fn active(&self) -> Vec<Notification> {
        let now = chrono::Utc::now();
        let mut toasts = self.toasts.write().expect("Notification lock poisoned");
        toasts.retain(|t| !t.is_expired(now));
        toasts.clone()
    }

    pub fn dismiss(&self, id: &str) {
        self.toasts
            .write()
            .expect("Notification lock poisoned")
            .retain(|t| t.id != id);
    }

    pub fn clear_all(&self) {
        self.toasts
            .write()
            .expect("Notification lock poisoned")
            .clear();
    }
}
