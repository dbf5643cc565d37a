use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

/// トースト相当のユーザー向け通知
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncNotification {
    pub level: NotificationLevel,
    pub message: String,
}

impl SyncNotification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

pub trait SyncNotifier: Send + Sync {
    fn notify(&self, notification: SyncNotification);
}
