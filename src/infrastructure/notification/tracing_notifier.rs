use crate::application::ports::{NotificationLevel, SyncNotification, SyncNotifier};
use tracing::{info, warn};

/// トースト表示の代わりにログへ流す通知先
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl SyncNotifier for TracingNotifier {
    fn notify(&self, notification: SyncNotification) {
        match notification.level {
            NotificationLevel::Success | NotificationLevel::Info => {
                info!(target: "checklist_sync::notify", "{}", notification.message)
            }
            NotificationLevel::Error => {
                warn!(target: "checklist_sync::notify", "{}", notification.message)
            }
        }
    }
}
